use std::fs::File;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use clap::{Parser, Subcommand};
use hound::WavSpec;
use log::info;
use uuid::Uuid;

use soundwires_core::{ModulationProfile, Receiver, Transmitter, DEFAULT_SAMPLE_RATE};

#[derive(Parser)]
#[command(name = "soundwires")]
#[command(about = "BFSK audio modem: framed byte payloads over two tones")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a payload into a BFSK WAV file
    Send {
        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        /// Input payload file
        #[arg(long, value_name = "FILE", required_unless_present = "text")]
        input: Option<PathBuf>,

        /// Inline text payload instead of an input file
        #[arg(long, conflicts_with = "input")]
        text: Option<String>,

        #[command(flatten)]
        channel: ChannelArgs,

        /// Output sample rate in Hz
        #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,

        /// Tone amplitude, 0.0 to 1.0
        #[arg(long, default_value_t = 0.4)]
        amplitude: f32,
    },

    /// Decode every valid frame found in a BFSK WAV file
    Recv {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        #[command(flatten)]
        channel: ChannelArgs,

        /// Directory to write each recovered payload into (one file per frame)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// List the built-in modulation profiles
    Profiles,
}

#[derive(clap::Args)]
struct ChannelArgs {
    /// Built-in profile id (see `profiles`)
    #[arg(long, default_value = "audible")]
    profile: String,

    /// Override the symbol-0 tone in Hz
    #[arg(long)]
    f0: Option<f32>,

    /// Override the symbol-1 tone in Hz
    #[arg(long)]
    f1: Option<f32>,

    /// Override the symbol interval in milliseconds
    #[arg(long = "bit-ms")]
    bit_ms: Option<f32>,
}

impl ChannelArgs {
    fn resolve(&self) -> Result<ModulationProfile, Box<dyn std::error::Error>> {
        let mut profile = ModulationProfile::by_id(&self.profile)
            .ok_or_else(|| format!("unknown profile '{}', see `profiles`", self.profile))?;
        if let Some(f0) = self.f0 {
            profile.f0 = f0;
        }
        if let Some(f1) = self.f1 {
            profile.f1 = f1;
        }
        if let Some(bit_ms) = self.bit_ms {
            profile.bit_duration_ms = bit_ms;
        }
        profile.validate()?;
        Ok(profile)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Send {
            output,
            input,
            text,
            channel,
            sample_rate,
            amplitude,
        } => send_command(input, &output, text, &channel, sample_rate, amplitude)?,
        Commands::Recv {
            input,
            channel,
            out,
        } => recv_command(&input, &channel, out)?,
        Commands::Profiles => profiles_command(),
    }

    Ok(())
}

fn send_command(
    input: Option<PathBuf>,
    output: &PathBuf,
    text: Option<String>,
    channel: &ChannelArgs,
    sample_rate: u32,
    amplitude: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    let payload = match (text, input) {
        (Some(text), _) => text.into_bytes(),
        (None, Some(path)) => std::fs::read(&path)?,
        (None, None) => unreachable!("clap enforces input or --text"),
    };
    println!("Payload: {}", format_bytes(payload.len()));

    let profile = channel.resolve()?;
    let transmitter = Transmitter::new(profile.clone(), sample_rate)?.with_amplitude(amplitude);
    let samples = transmitter.encode(&payload)?;
    info!(
        "synthesized {} samples at {} ms/bit",
        samples.len(),
        profile.bit_duration_ms
    );

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let file = File::create(output)?;
    let mut writer = hound::WavWriter::new(file, spec)?;
    for sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped * 32767.0) as i16)?;
    }
    writer.finalize()?;

    println!(
        "Wrote {} ({} Hz, f0={} Hz, f1={} Hz)",
        output.display(),
        sample_rate,
        profile.f0,
        profile.f1
    );
    Ok(())
}

fn recv_command(
    input: &PathBuf,
    channel: &ChannelArgs,
    out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(input)?;
    let mut reader = hound::WavReader::new(file)?;
    let spec = reader.spec();
    println!(
        "Read WAV: {} Hz, {} channels, {} bits",
        spec.sample_rate, spec.channels, spec.bits_per_sample
    );
    if spec.channels != 1 {
        return Err(format!("expected mono input, got {} channels", spec.channels).into());
    }

    let samples: Vec<f32> = match spec.bits_per_sample {
        16 => {
            let int_samples: Result<Vec<i16>, _> = reader.samples::<i16>().collect();
            int_samples?
                .into_iter()
                .map(|s| s as f32 / 32768.0)
                .collect()
        }
        32 => {
            let float_samples: Result<Vec<f32>, _> = reader.samples::<f32>().collect();
            float_samples?
        }
        other => {
            return Err(format!("unsupported bit depth: {other}").into());
        }
    };
    info!("extracted {} samples", samples.len());

    let profile = channel.resolve()?;
    let mut receiver = Receiver::new(profile, spec.sample_rate)?;
    let frames = receiver.decode(&samples);

    if let Some(dir) = &out {
        std::fs::create_dir_all(dir)?;
    }

    if frames.is_empty() {
        println!(
            "No frames recovered ({} symbol decisions observed)",
            receiver.session().bits_seen()
        );
        return Ok(());
    }

    for payload in &frames {
        print_message_card(payload);
        if let Some(dir) = &out {
            let path = dir.join(format!("{}.bin", Uuid::new_v4()));
            std::fs::write(&path, payload)?;
            println!("  saved: {}", path.display());
        }
    }
    println!(
        "Recovered {} frame(s) from {} symbol decisions",
        frames.len(),
        receiver.session().bits_seen()
    );
    Ok(())
}

fn profiles_command() {
    for profile in ModulationProfile::builtin() {
        println!(
            "{:<12} {:<18} f0={:<7} f1={:<7} bit={} ms",
            profile.id, profile.label, profile.f0, profile.f1, profile.bit_duration_ms
        );
    }
}

/// One card per received message: id, arrival time, size, text preview and a
/// base64 excerpt for binary payloads.
fn print_message_card(payload: &[u8]) {
    let received_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let preview_len = payload.len().min(200);
    let excerpt_len = payload.len().min(512);

    println!("message {}", Uuid::new_v4());
    println!("  received_at: {received_at} (unix)");
    println!("  size: {}", format_bytes(payload.len()));
    println!(
        "  preview: {}",
        String::from_utf8_lossy(&payload[..preview_len])
    );
    println!("  base64: {}", BASE64.encode(&payload[..excerpt_len]));
}

fn format_bytes(value: usize) -> String {
    if value < 1024 {
        format!("{value} B")
    } else if value < 1024 * 1024 {
        format!("{:.1} KB", value as f32 / 1024.0)
    } else {
        format!("{:.1} MB", value as f32 / (1024.0 * 1024.0))
    }
}
