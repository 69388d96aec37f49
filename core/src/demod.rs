//! Receive-side demodulation: tone energy estimation and the bit decision.
//!
//! Two entry points cover the two receiver shapes. A live receiver that
//! already has a magnitude spectrum (e.g. an analyser node snapshot) uses
//! [`frequency_to_bin`], [`band_power`] and [`decide`] directly. The offline
//! WAV path uses [`BfskDemodulator`], which estimates the same two band
//! powers per symbol interval with a Goertzel filter instead of a full FFT.

use std::f32::consts::PI;

use crate::error::{ModemError, Result};
use crate::profile::ModulationProfile;

/// Decide the bit for one symbol interval from the two tone powers.
/// Returns 1 iff `power1 > power0`; ties resolve to 0. Pure.
pub fn decide(power0: f32, power1: f32) -> u8 {
    if power1 > power0 {
        1
    } else {
        0
    }
}

/// Index of the spectrum bin nearest `frequency`.
pub fn frequency_to_bin(frequency: f32, sample_rate: f32, fft_size: usize) -> usize {
    let bin_size = sample_rate / fft_size as f32;
    (frequency / bin_size).round() as usize
}

/// Mean magnitude over the bin at `index` and its two immediate neighbours,
/// clamped to the valid bin range. The 3-bin window smooths single-bin noise;
/// any monotone estimator around the target bin would be conformant.
pub fn band_power(magnitudes: &[f32], index: usize) -> f32 {
    if magnitudes.is_empty() {
        return 0.0;
    }
    let start = index.saturating_sub(1).min(magnitudes.len() - 1);
    let end = (index + 1).min(magnitudes.len() - 1);
    let window = &magnitudes[start..=end];
    window.iter().sum::<f32>() / window.len() as f32
}

/// Goertzel power at DFT bin `k` of an `n`-sample window.
fn goertzel_power(samples: &[f32], k: usize) -> f32 {
    let n = samples.len() as f32;
    let omega = 2.0 * PI * k as f32 / n;
    let coeff = 2.0 * omega.cos();

    let mut q1 = 0.0f32;
    let mut q2 = 0.0f32;
    for &sample in samples {
        let q0 = coeff * q1 - q2 + sample;
        q2 = q1;
        q1 = q0;
    }

    let real = q1 - q2 * omega.cos();
    let imag = q2 * omega.sin();
    real * real + imag * imag
}

/// BFSK demodulator for a fixed profile and input sample rate.
pub struct BfskDemodulator {
    profile: ModulationProfile,
    sample_rate: f32,
}

impl BfskDemodulator {
    pub fn new(profile: ModulationProfile, sample_rate: u32) -> Result<Self> {
        profile.validate()?;
        // A symbol interval shorter than one sample has no window to analyze.
        if profile.samples_per_bit(sample_rate) == 0 {
            return Err(ModemError::InvalidConfig(format!(
                "symbol interval of {} ms spans no samples at {} Hz",
                profile.bit_duration_ms, sample_rate
            )));
        }
        Ok(Self {
            profile,
            sample_rate: sample_rate as f32,
        })
    }

    pub fn profile(&self) -> &ModulationProfile {
        &self.profile
    }

    pub fn samples_per_bit(&self) -> usize {
        self.profile.samples_per_bit(self.sample_rate as u32)
    }

    /// Estimate the energy near both tones over one analysis window. The
    /// window should span one symbol interval; the Goertzel bins adapt to
    /// whatever window length is supplied.
    pub fn band_powers(&self, window: &[f32]) -> (f32, f32) {
        (
            self.band_power_at(window, self.profile.f0),
            self.band_power_at(window, self.profile.f1),
        )
    }

    /// Reduce one symbol interval's samples to a single bit decision.
    pub fn demodulate_symbol(&self, window: &[f32]) -> u8 {
        let (power0, power1) = self.band_powers(window);
        decide(power0, power1)
    }

    /// Demodulate a sample buffer into bits, one per full symbol interval.
    /// A trailing partial interval is ignored.
    pub fn demodulate(&self, samples: &[f32]) -> Vec<u8> {
        let spb = self.samples_per_bit();
        samples
            .chunks_exact(spb)
            .map(|window| self.demodulate_symbol(window))
            .collect()
    }

    fn band_power_at(&self, window: &[f32], frequency: f32) -> f32 {
        if window.is_empty() {
            return 0.0;
        }
        let center = frequency_to_bin(frequency, self.sample_rate, window.len());
        let max_bin = window.len() / 2;
        let start = center.saturating_sub(1);
        let end = (center + 1).min(max_bin);

        let mut total = 0.0f32;
        let mut count = 0u32;
        for k in start..=end {
            total += goertzel_power(window, k);
            count += 1;
        }
        total / count.max(1) as f32
    }
}
