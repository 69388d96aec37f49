//! Named channel configurations.
//!
//! A profile selects the two tone frequencies and the symbol duration. The
//! framing format is independent of the profile: any receiver scanning with
//! the right tones can decode any sender's frames.

use crate::error::{ModemError, Result};

/// BFSK channel parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ModulationProfile {
    pub id: String,
    pub label: String,
    /// Tone for symbol 0, in Hz.
    pub f0: f32,
    /// Tone for symbol 1, in Hz.
    pub f1: f32,
    /// Symbol interval in milliseconds.
    pub bit_duration_ms: f32,
}

impl ModulationProfile {
    /// Speaker-friendly tones, 12.5 bits/sec.
    pub fn audible() -> Self {
        Self {
            id: "audible".into(),
            label: "Audible BFSK".into(),
            f0: 1200.0,
            f1: 2200.0,
            bit_duration_ms: 80.0,
        }
    }

    /// Near-ultrasonic tones, inaudible to most adults.
    pub fn ultrasonic() -> Self {
        Self {
            id: "ultrasonic".into(),
            label: "Ultrasonic BFSK".into(),
            f0: 18_000.0,
            f1: 19_000.0,
            bit_duration_ms: 60.0,
        }
    }

    pub fn builtin() -> Vec<Self> {
        vec![Self::audible(), Self::ultrasonic()]
    }

    /// Look up a built-in profile by its id.
    pub fn by_id(id: &str) -> Option<Self> {
        Self::builtin().into_iter().find(|p| p.id == id)
    }

    /// Reject configurations the modulator or demodulator cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.f0.is_finite() && self.f0 > 0.0) || !(self.f1.is_finite() && self.f1 > 0.0) {
            return Err(ModemError::InvalidConfig(format!(
                "tone frequencies must be positive (f0={}, f1={})",
                self.f0, self.f1
            )));
        }
        if self.f0 == self.f1 {
            return Err(ModemError::InvalidConfig(
                "tones for symbol 0 and symbol 1 must differ".into(),
            ));
        }
        if !(self.bit_duration_ms.is_finite() && self.bit_duration_ms > 0.0) {
            return Err(ModemError::InvalidConfig(format!(
                "bit duration must be positive, got {} ms",
                self.bit_duration_ms
            )));
        }
        Ok(())
    }

    /// Symbol interval in seconds.
    pub fn bit_duration_secs(&self) -> f32 {
        self.bit_duration_ms / 1000.0
    }

    /// Number of audio samples covering one symbol interval.
    pub fn samples_per_bit(&self, sample_rate: u32) -> usize {
        (sample_rate as f32 * self.bit_duration_secs()).round() as usize
    }
}
