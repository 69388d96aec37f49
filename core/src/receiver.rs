//! Receive-side facade: PCM samples in, validated payloads out.
//!
//! Buffers incoming samples, carves them into symbol intervals, reduces each
//! interval to one bit with the Goertzel band-power estimate and feeds the
//! session. Usable both for live streaming (repeated [`push_samples`] calls
//! of arbitrary block size) and for whole-file decoding.
//!
//! [`push_samples`]: Receiver::push_samples

use crate::demod::BfskDemodulator;
use crate::error::Result;
use crate::profile::ModulationProfile;
use crate::session::ReceiverSession;

pub struct Receiver {
    demodulator: BfskDemodulator,
    session: ReceiverSession,
    pending_samples: Vec<f32>,
}

impl Receiver {
    pub fn new(profile: ModulationProfile, sample_rate: u32) -> Result<Self> {
        Ok(Self {
            demodulator: BfskDemodulator::new(profile.clone(), sample_rate)?,
            session: ReceiverSession::new(profile)?,
            pending_samples: Vec::new(),
        })
    }

    /// Feed a block of samples of any size; returns every frame completed by
    /// the symbol intervals the block filled. Leftover samples shorter than
    /// one interval are held for the next call.
    pub fn push_samples(&mut self, samples: &[f32]) -> Vec<Vec<u8>> {
        self.pending_samples.extend_from_slice(samples);

        let spb = self.demodulator.samples_per_bit();
        let mut frames = Vec::new();
        let mut consumed = 0;
        while self.pending_samples.len() - consumed >= spb {
            let window = &self.pending_samples[consumed..consumed + spb];
            let (power0, power1) = self.demodulator.band_powers(window);
            frames.extend(self.session.push_powers(power0, power1));
            consumed += spb;
        }
        self.pending_samples.drain(..consumed);
        frames
    }

    /// Decode a complete recording in one call.
    pub fn decode(&mut self, samples: &[f32]) -> Vec<Vec<u8>> {
        self.push_samples(samples)
    }

    pub fn session(&self) -> &ReceiverSession {
        &self.session
    }

    /// Discard buffered samples and session state, keeping the profile.
    pub fn reset(&mut self) {
        self.pending_samples.clear();
        self.session.reset();
    }
}
