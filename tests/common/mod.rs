// Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;

use pitchshift::{PitchShiftError, Result, ShiftEngine};

/// Frames the fake engine holds back until flushed
pub const FAKE_LATENCY_FRAMES: usize = 256;

/// Deterministic stand-in for a real shift engine: a delay line that releases
/// audio once more than `FAKE_LATENCY_FRAMES` frames are queued, and
/// everything on flush. Pitch is recorded but not applied.
pub struct FixedLatencyEngine {
    channels: usize,
    queue: VecDeque<f32>,
    flushed: bool,
    pub pitch: f32,
}

impl ShiftEngine for FixedLatencyEngine {
    fn create(_sample_rate: u32, channels: u16) -> Result<Self> {
        if channels > 8 {
            return Err(PitchShiftError::EngineUnavailable(format!(
                "{} channels",
                channels
            )));
        }
        Ok(Self {
            channels: channels as usize,
            queue: VecDeque::new(),
            flushed: false,
            pitch: 0.0,
        })
    }

    fn set_pitch_semitones(&mut self, semitones: f32) {
        self.pitch = semitones;
    }

    fn put_samples(&mut self, samples: &[f32], frames: usize) {
        self.flushed = false;
        self.queue
            .extend(samples[..frames * self.channels].iter().copied());
    }

    fn receive_samples(&mut self, output: &mut [f32], max_frames: usize) -> usize {
        let held = self.queue.len() / self.channels;
        let ready = if self.flushed {
            held
        } else {
            held.saturating_sub(FAKE_LATENCY_FRAMES)
        };
        let frames = ready.min(max_frames);
        for sample in output.iter_mut().take(frames * self.channels) {
            *sample = self.queue.pop_front().unwrap_or(0.0);
        }
        frames
    }

    fn flush(&mut self) {
        self.flushed = true;
    }

    fn clear(&mut self) {
        self.queue.clear();
        self.flushed = false;
    }

    fn buffered_frames(&mut self) -> usize {
        self.queue.len() / self.channels
    }
}

/// Interleaved sine, identical on every channel
pub fn sine(frequency_hz: f32, sample_rate: u32, channels: usize, frames: usize, amplitude: f32) -> Vec<f32> {
    let mut samples = Vec::with_capacity(frames * channels);
    for i in 0..frames {
        let phase = 2.0 * std::f32::consts::PI * frequency_hz * i as f32 / sample_rate as f32;
        let value = amplitude * phase.sin();
        for _ in 0..channels {
            samples.push(value);
        }
    }
    samples
}

pub fn to_i16_bytes(samples: &[f32]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|s| ((s * 32768.0).round().clamp(-32768.0, 32767.0) as i16).to_ne_bytes())
        .collect()
}

pub fn from_i16_bytes(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|b| i16::from_ne_bytes([b[0], b[1]]) as f32 / 32768.0)
        .collect()
}

/// Take one channel out of interleaved samples
pub fn channel(samples: &[f32], channels: usize, index: usize) -> Vec<f32> {
    samples.iter().skip(index).step_by(channels).copied().collect()
}
