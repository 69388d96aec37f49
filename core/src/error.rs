use thiserror::Error;

/// Reportable failures only. In-stream anomalies (noise, checksum mismatches,
/// truncated frames) are handled inside the scanner and never surface here.
#[derive(Debug, Error)]
pub enum ModemError {
    #[error("payload of {0} bytes exceeds the receive-side maximum")]
    PayloadTooLarge(usize),

    #[error("invalid modulation profile: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ModemError>;
