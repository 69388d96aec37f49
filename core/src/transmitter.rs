//! Send-side facade: payload in, frame bits, tone schedule or PCM out.

use crate::error::{ModemError, Result};
use crate::framing::build_frame;
use crate::modulator::{BfskModulator, ToneStep};
use crate::profile::ModulationProfile;
use crate::MAX_PAYLOAD_BYTES;

/// One-shot frame transmitter for a fixed profile. Stateless between calls
/// and safe to share across threads.
pub struct Transmitter {
    modulator: BfskModulator,
}

impl Transmitter {
    pub fn new(profile: ModulationProfile, sample_rate: u32) -> Result<Self> {
        Ok(Self {
            modulator: BfskModulator::new(profile, sample_rate)?,
        })
    }

    /// Override the synthesis amplitude.
    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.modulator = self.modulator.with_amplitude(amplitude);
        self
    }

    pub fn profile(&self) -> &ModulationProfile {
        self.modulator.profile()
    }

    /// Frame the payload and render it to PCM samples.
    ///
    /// Payloads above the protocol ceiling are refused here: any conforming
    /// receiver would discard the resulting frame as a false positive, so
    /// transmitting it could only waste air time.
    pub fn encode(&self, payload: &[u8]) -> Result<Vec<f32>> {
        Ok(self.modulator.synthesize(&self.frame_bits(payload)?))
    }

    /// Frame the payload and precompute the oscillator schedule for it.
    pub fn schedule(&self, payload: &[u8]) -> Result<Vec<ToneStep>> {
        Ok(self.modulator.schedule(&self.frame_bits(payload)?))
    }

    /// The raw transmittable bit sequence for one payload.
    pub fn frame_bits(&self, payload: &[u8]) -> Result<Vec<u8>> {
        if payload.len() > MAX_PAYLOAD_BYTES {
            return Err(ModemError::PayloadTooLarge(payload.len()));
        }
        Ok(build_frame(payload))
    }
}
