use std::fs;
use std::path::PathBuf;

use soundwires_core::{
    ModulationProfile, DEFAULT_FFT_SIZE, FRAME_SIGNATURE, MAX_PAYLOAD_BYTES, SIGNATURE_BITS,
};

fn main() {
    let web_constants_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("web/src/constants/modem.ts");

    let signature: String = FRAME_SIGNATURE
        .iter()
        .map(|bit| if *bit == 1 { '1' } else { '0' })
        .collect();

    let profiles: Vec<String> = ModulationProfile::builtin()
        .into_iter()
        .map(|p| {
            format!(
                "  {{ id: \"{}\", label: \"{}\", f0: {}, f1: {}, bitDurationMs: {} }}",
                p.id, p.label, p.f0, p.f1, p.bit_duration_ms
            )
        })
        .collect();

    let content = format!(
        r#"// AUTO-GENERATED FILE - DO NOT EDIT MANUALLY
// Generated from core/src/lib.rs constants
// Run `cargo run --manifest-path tools/Cargo.toml` to regenerate

export const MAX_PAYLOAD_BYTES = {}
export const FRAME_SIGNATURE = "{}"
export const SIGNATURE_BITS = {}
export const FFT_SIZE = {}

export const PROFILES = [
{}
]
"#,
        MAX_PAYLOAD_BYTES,
        signature,
        SIGNATURE_BITS,
        DEFAULT_FFT_SIZE,
        profiles.join(",\n")
    );

    fs::write(&web_constants_path, content).expect("Failed to write web constants file");

    println!("Generated: {}", web_constants_path.display());
}
