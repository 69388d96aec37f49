//! BFSK audio modem for framed data transfer over two tones
//!
//! Payloads travel in self-delimiting frames: a fixed 24-bit signature
//! (alternating preamble plus HDLC-style sync marker), a big-endian length,
//! the payload bytes and a CRC-16 over the payload. The receive side folds a
//! stream of per-symbol tone decisions into a bit buffer and scans it for
//! complete frames, tolerating noise, truncation and false signature matches.

pub mod bits;
pub mod demod;
pub mod error;
pub mod framing;
pub mod modulator;
pub mod profile;
pub mod receiver;
pub mod scanner;
pub mod session;
pub mod transmitter;

pub use demod::{band_power, decide, frequency_to_bin, BfskDemodulator};
pub use error::{ModemError, Result};
pub use framing::{build_frame, crc16};
pub use modulator::{BfskModulator, ToneStep};
pub use profile::ModulationProfile;
pub use receiver::Receiver;
pub use scanner::{extract_frames, extract_frames_with_limit, ScanResult};
pub use session::{ReceiverSession, Snapshot};
pub use transmitter::Transmitter;

/// Alternating preamble, transmitted first to help the receiver settle.
pub const PREAMBLE_BITS: [u8; 16] = [1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0];

/// Sync marker terminating the preamble.
pub const SYNC_BITS: [u8; 8] = [0, 1, 1, 1, 1, 1, 1, 0];

/// Preamble and sync marker concatenated: the exact bit pattern the scanner
/// searches for. The pattern has no self-overlap at any shift, so one genuine
/// signature can never start inside another.
pub const FRAME_SIGNATURE: [u8; 24] = [
    1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, // preamble
    0, 1, 1, 1, 1, 1, 1, 0, // sync
];

/// Width of the frame signature in bits.
pub const SIGNATURE_BITS: usize = FRAME_SIGNATURE.len();

/// Width of the length field in bits (unsigned big-endian).
pub const LENGTH_BITS: usize = 32;

/// Width of the checksum field in bits (CRC-16 over the payload, big-endian).
pub const CHECKSUM_BITS: usize = 16;

/// Receive-side ceiling on the decoded length field. A length above this is
/// treated as a false signature match, never as a real frame.
pub const MAX_PAYLOAD_BYTES: usize = 1 << 20;

/// Sample rate used by the CLI when synthesizing and analyzing WAV audio.
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Analysis transform size matching the browser front end's analyser node.
pub const DEFAULT_FFT_SIZE: usize = 4096;
