use std::collections::VecDeque;

use wasm_bindgen::prelude::*;

use soundwires_core::{ModulationProfile, Receiver, Snapshot, Transmitter};

fn profile_by_id(id: &str) -> Result<ModulationProfile, JsValue> {
    ModulationProfile::by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("unknown modulation profile '{id}'")))
}

#[wasm_bindgen]
pub struct WasmTransmitter {
    inner: Transmitter,
}

#[wasm_bindgen]
impl WasmTransmitter {
    #[wasm_bindgen(constructor)]
    pub fn new(profile_id: &str, sample_rate: u32) -> Result<WasmTransmitter, JsValue> {
        let profile = profile_by_id(profile_id)?;
        Transmitter::new(profile, sample_rate)
            .map(|inner| WasmTransmitter { inner })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Frame the payload and render it to audio samples.
    /// Takes a Uint8Array and returns a Float32Array.
    #[wasm_bindgen]
    pub fn encode(&self, payload: &[u8]) -> Result<Vec<f32>, JsValue> {
        self.inner
            .encode(payload)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Frame the payload and return the oscillator schedule as a flat
    /// Float32Array of `[offset_secs, frequency_hz, ...]` pairs, ready for
    /// `OscillatorNode.frequency.setValueAtTime` calls.
    #[wasm_bindgen]
    pub fn schedule(&self, payload: &[u8]) -> Result<Vec<f32>, JsValue> {
        let steps = self
            .inner
            .schedule(payload)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mut flat = Vec::with_capacity(steps.len() * 2);
        for step in steps {
            flat.push(step.offset_secs);
            flat.push(step.frequency_hz);
        }
        Ok(flat)
    }
}

#[wasm_bindgen]
pub struct WasmReceiver {
    inner: Receiver,
    completed: VecDeque<Vec<u8>>,
}

#[wasm_bindgen]
impl WasmReceiver {
    #[wasm_bindgen(constructor)]
    pub fn new(profile_id: &str, sample_rate: u32) -> Result<WasmReceiver, JsValue> {
        let profile = profile_by_id(profile_id)?;
        Receiver::new(profile, sample_rate)
            .map(|inner| WasmReceiver {
                inner,
                completed: VecDeque::new(),
            })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Feed a block of microphone samples; returns how many frames are now
    /// ready to collect with `next_frame`.
    #[wasm_bindgen]
    pub fn push_samples(&mut self, samples: &[f32]) -> u32 {
        self.completed.extend(self.inner.push_samples(samples));
        self.completed.len() as u32
    }

    /// Pop the oldest completed frame, if any. Returns a Uint8Array.
    #[wasm_bindgen]
    pub fn next_frame(&mut self) -> Option<Vec<u8>> {
        self.completed.pop_front()
    }

    #[wasm_bindgen]
    pub fn bits_seen(&self) -> u32 {
        self.inner.session().bits_seen() as u32
    }

    /// Signal meter for the UI: band power delta of the latest decision.
    #[wasm_bindgen]
    pub fn last_power_delta(&self) -> f32 {
        self.inner.session().last_power_delta()
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.completed.clear();
        self.inner.reset();
    }
}

/// Snapshot-driven session for front ends that already run an analyser node:
/// one call per symbol interval with the magnitude spectrum.
#[wasm_bindgen]
pub struct WasmSession {
    inner: soundwires_core::ReceiverSession,
    completed: VecDeque<Vec<u8>>,
}

#[wasm_bindgen]
impl WasmSession {
    #[wasm_bindgen(constructor)]
    pub fn new(profile_id: &str) -> Result<WasmSession, JsValue> {
        let profile = profile_by_id(profile_id)?;
        soundwires_core::ReceiverSession::new(profile)
            .map(|inner| WasmSession {
                inner,
                completed: VecDeque::new(),
            })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Push one analyser snapshot (`getFloatFrequencyData` output) together
    /// with the context's sample rate and FFT size.
    #[wasm_bindgen]
    pub fn push_snapshot(&mut self, magnitudes: &[f32], sample_rate: f32, fft_size: usize) -> u32 {
        let frames = self.inner.push_snapshot(&Snapshot {
            magnitudes,
            sample_rate,
            fft_size,
        });
        self.completed.extend(frames);
        self.completed.len() as u32
    }

    /// Push one pre-computed pair of band powers instead of a full spectrum.
    #[wasm_bindgen]
    pub fn push_powers(&mut self, power0: f32, power1: f32) -> u32 {
        self.completed.extend(self.inner.push_powers(power0, power1));
        self.completed.len() as u32
    }

    #[wasm_bindgen]
    pub fn next_frame(&mut self) -> Option<Vec<u8>> {
        self.completed.pop_front()
    }

    #[wasm_bindgen]
    pub fn bits_seen(&self) -> u32 {
        self.inner.bits_seen() as u32
    }

    #[wasm_bindgen]
    pub fn last_power_delta(&self) -> f32 {
        self.inner.last_power_delta()
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.completed.clear();
        self.inner.reset();
    }
}
