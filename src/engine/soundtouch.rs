use ::soundtouch::SoundTouch;

use super::ShiftEngine;
use crate::error::{PitchShiftError, Result};

/// Most channels SoundTouch accepts
pub const MAX_CHANNELS: u16 = 16;

/// SoundTouch-backed pitch shifter (tempo fixed at 1.0)
pub struct SoundTouchEngine {
    st: SoundTouch,
}

// SAFETY: the SoundTouch instance is exclusively owned and holds no
// thread-affine state; it is only ever touched through `&mut self`.
unsafe impl Send for SoundTouchEngine {}

impl ShiftEngine for SoundTouchEngine {
    fn create(sample_rate: u32, channels: u16) -> Result<Self> {
        // SoundTouch throws on these, and a C++ exception must not cross into Rust
        if sample_rate == 0 {
            return Err(PitchShiftError::InvalidSampleRate(0));
        }
        if channels == 0 {
            return Err(PitchShiftError::InvalidChannels(0));
        }
        if channels > MAX_CHANNELS {
            return Err(PitchShiftError::EngineUnavailable(format!(
                "SoundTouch supports at most {} channels, got {}",
                MAX_CHANNELS, channels
            )));
        }
        let mut st = SoundTouch::new();
        st.set_sample_rate(sample_rate);
        st.set_channels(channels as u32);
        st.set_tempo(1.0);
        Ok(Self { st })
    }

    fn set_pitch_semitones(&mut self, semitones: f32) {
        // Fractional semitones, same ratio as SoundTouch's setPitchSemiTones(double)
        self.st.set_pitch(semitones_to_ratio(semitones));
    }

    fn put_samples(&mut self, samples: &[f32], frames: usize) {
        self.st.put_samples(samples, frames);
    }

    fn receive_samples(&mut self, output: &mut [f32], max_frames: usize) -> usize {
        self.st.receive_samples(output, max_frames)
    }

    fn flush(&mut self) {
        self.st.flush();
    }

    fn clear(&mut self) {
        self.st.clear();
    }

    fn buffered_frames(&mut self) -> usize {
        self.st.num_unprocessed_samples() as usize + self.st.num_samples() as usize
    }
}

/// Frequency ratio for a semitone offset
pub fn semitones_to_ratio(semitones: f32) -> f64 {
    2f64.powf(semitones as f64 / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semitone_ratio() {
        assert_eq!(semitones_to_ratio(0.0), 1.0);
        assert!((semitones_to_ratio(12.0) - 2.0).abs() < 1e-12);
        assert!((semitones_to_ratio(-12.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_too_many_channels() {
        assert!(matches!(
            SoundTouchEngine::create(44100, MAX_CHANNELS + 1),
            Err(PitchShiftError::EngineUnavailable(_))
        ));
    }

    #[test]
    fn test_rejects_zero_channels() {
        assert!(matches!(
            SoundTouchEngine::create(44100, 0),
            Err(PitchShiftError::InvalidChannels(0))
        ));
    }

    #[test]
    fn test_rejects_zero_sample_rate() {
        assert!(matches!(
            SoundTouchEngine::create(0, 2),
            Err(PitchShiftError::InvalidSampleRate(0))
        ));
    }

    #[test]
    fn test_silence_in_silence_out() {
        let mut engine = SoundTouchEngine::create(44100, 2).unwrap();
        engine.set_pitch_semitones(3.0);
        let input = vec![0.0f32; 2 * 4096];
        engine.put_samples(&input, 4096);
        engine.flush();
        let mut output = vec![1.0f32; 2 * 8192];
        let received = engine.receive_samples(&mut output, 8192);
        assert!(received > 0);
        assert!(output[..received * 2].iter().all(|s| s.abs() < 1e-6));
    }
}
