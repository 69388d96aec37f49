//! Send-side modulation: bits to tone schedules or synthesized audio.
//!
//! The schedule form matches how the browser front end drives an oscillator:
//! every bit becomes one `(time offset, frequency)` instruction, computed up
//! front and played in a single uninterrupted pass. The synthesized form is
//! the same signal rendered to PCM for WAV output and for tests.

use std::f32::consts::PI;

use crate::error::{ModemError, Result};
use crate::profile::ModulationProfile;

/// Attack/decay applied to the whole burst to avoid clicks at the edges.
const EDGE_FADE_SECS: f32 = 0.02;

/// One oscillator instruction: retune to `frequency_hz` at `offset_secs`
/// from the start of the transmission and hold for one symbol interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneStep {
    pub offset_secs: f32,
    pub frequency_hz: f32,
}

/// BFSK modulator for a fixed profile and output sample rate.
pub struct BfskModulator {
    profile: ModulationProfile,
    sample_rate: f32,
    amplitude: f32,
}

impl BfskModulator {
    pub fn new(profile: ModulationProfile, sample_rate: u32) -> Result<Self> {
        profile.validate()?;
        // A symbol interval shorter than one sample renders nothing.
        if profile.samples_per_bit(sample_rate) == 0 {
            return Err(ModemError::InvalidConfig(format!(
                "symbol interval of {} ms spans no samples at {} Hz",
                profile.bit_duration_ms, sample_rate
            )));
        }
        Ok(Self {
            profile,
            sample_rate: sample_rate as f32,
            amplitude: 0.4,
        })
    }

    /// Override the output amplitude (default 0.4, clamped to [0, 1]).
    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude.clamp(0.0, 1.0);
        self
    }

    pub fn profile(&self) -> &ModulationProfile {
        &self.profile
    }

    pub fn samples_per_bit(&self) -> usize {
        self.profile.samples_per_bit(self.sample_rate as u32)
    }

    /// Precompute the oscillator schedule for a bit sequence. Offsets are
    /// consecutive multiples of the symbol interval, in transmission order.
    pub fn schedule(&self, bits: &[u8]) -> Vec<ToneStep> {
        let bit_duration = self.profile.bit_duration_secs();
        bits.iter()
            .enumerate()
            .map(|(i, &bit)| ToneStep {
                offset_secs: i as f32 * bit_duration,
                frequency_hz: if bit & 1 == 1 {
                    self.profile.f1
                } else {
                    self.profile.f0
                },
            })
            .collect()
    }

    /// Render a bit sequence to PCM samples: one phase-continuous sine burst
    /// per bit at the symbol's tone, with a raised-cosine fade at the edges
    /// of the whole transmission.
    pub fn synthesize(&self, bits: &[u8]) -> Vec<f32> {
        let spb = self.samples_per_bit();
        let mut samples = Vec::with_capacity(bits.len() * spb);
        let mut phase = 0.0f32;

        for &bit in bits {
            let frequency = if bit & 1 == 1 {
                self.profile.f1
            } else {
                self.profile.f0
            };
            let step = 2.0 * PI * frequency / self.sample_rate;
            for _ in 0..spb {
                samples.push(phase.sin() * self.amplitude);
                phase += step;
                if phase >= 2.0 * PI {
                    phase -= 2.0 * PI;
                }
            }
        }

        let fade = (EDGE_FADE_SECS * self.sample_rate).round() as usize;
        apply_edge_fade(&mut samples, fade);
        samples
    }
}

/// Raised-cosine ramp over the first and last `fade_len` samples.
fn apply_edge_fade(samples: &mut [f32], fade_len: usize) {
    let fade = fade_len.min(samples.len() / 2);
    for i in 0..fade {
        let progress = i as f32 / fade as f32;
        let gain = (PI * progress / 2.0).sin().powi(2);
        samples[i] *= gain;
        let tail = samples.len() - 1 - i;
        samples[tail] *= gain;
    }
}
