use crate::error::{PitchShiftError, Result};

#[cfg(feature = "soundtouch")]
pub mod soundtouch;

#[cfg(feature = "soundtouch")]
pub use self::soundtouch::SoundTouchEngine;

/// Contract every pitch-shifting engine must fulfil
///
/// Samples are interleaved `f32`, and every count is in frames (one sample
/// per channel). Send is required because the engine lives on the audio
/// thread once the host hands the shifter over.
pub trait ShiftEngine: Send + Sized {
    /// Allocate an engine tuned to the given rate and channel count
    fn create(sample_rate: u32, channels: u16) -> Result<Self>;

    /// Applies to samples pushed after this call; audio already buffered
    /// inside the engine keeps the previous pitch
    fn set_pitch_semitones(&mut self, semitones: f32);

    /// Push `frames` frames from `samples` into the engine's input buffer
    fn put_samples(&mut self, samples: &[f32], frames: usize);

    /// Drain up to `max_frames` ready frames into `output`.
    /// Returning fewer frames, or none, is normal while the engine fills up.
    fn receive_samples(&mut self, output: &mut [f32], max_frames: usize) -> usize;

    /// Signal end of stream so all remaining audio becomes receivable
    fn flush(&mut self);

    /// Drop everything buffered, input and output
    fn clear(&mut self);

    /// Frames currently held by the engine (unprocessed plus ready)
    fn buffered_frames(&mut self) -> usize;
}

/// Sole owner of one engine instance
///
/// Dropping the binding destroys the engine, so the lifecycle code never has
/// to track a raw handle. All calls are clamped to whole frames that fit the
/// slices handed in.
pub struct EngineBinding<E: ShiftEngine> {
    engine: E,
    channels: usize,
    sample_rate: u32,
}

impl<E: ShiftEngine> EngineBinding<E> {
    /// Rejects a zero rate or channel count before the engine sees it
    pub fn create(sample_rate: u32, channels: u16) -> Result<Self> {
        if sample_rate == 0 {
            return Err(PitchShiftError::InvalidSampleRate(0));
        }
        if channels == 0 {
            return Err(PitchShiftError::InvalidChannels(0));
        }
        let engine = E::create(sample_rate, channels)?;
        log::debug!(
            "shift engine created ({} Hz, {} channel(s))",
            sample_rate,
            channels
        );
        Ok(Self {
            engine,
            channels: channels as usize,
            sample_rate,
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn set_pitch_semitones(&mut self, semitones: f32) {
        self.engine.set_pitch_semitones(semitones);
    }

    /// Push at most `frames` frames, never reading past `samples`
    pub fn put_samples(&mut self, samples: &[f32], frames: usize) -> usize {
        let frames = frames.min(samples.len() / self.channels);
        if frames > 0 {
            self.engine
                .put_samples(&samples[..frames * self.channels], frames);
        }
        frames
    }

    /// Pull at most `max_frames` frames, never writing past `output`
    pub fn receive_samples(&mut self, output: &mut [f32], max_frames: usize) -> usize {
        let max_frames = max_frames.min(output.len() / self.channels);
        if max_frames == 0 {
            return 0;
        }
        let received = self
            .engine
            .receive_samples(&mut output[..max_frames * self.channels], max_frames);
        received.min(max_frames)
    }

    pub fn flush(&mut self) {
        self.engine.flush();
    }

    pub fn clear(&mut self) {
        self.engine.clear();
    }

    pub fn buffered_frames(&mut self) -> usize {
        self.engine.buffered_frames()
    }
}

impl<E: ShiftEngine> Drop for EngineBinding<E> {
    fn drop(&mut self) {
        log::debug!("shift engine destroyed");
    }
}
