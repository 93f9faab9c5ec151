use crate::codec::{FrameLayout, SampleFormat};
use crate::error::{PitchShiftError, Result};

/// Sample rate used when the host does not supply one
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
/// Channel count used when the host does not supply one
pub const DEFAULT_CHANNELS: u16 = 2;
/// Frames of scratch space preallocated per direction
pub const DEFAULT_MAX_BLOCK_FRAMES: usize = 4096;

/// Stream configuration, fixed for the lifetime of one engine
///
/// Changing any field requires `release` followed by `initialize`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub format: SampleFormat,
    /// Pitch applied right after the engine is created
    pub initial_semitones: f32,
    /// Largest host block (in frames) served without growing scratch buffers
    pub max_block_frames: usize,
}

impl AudioConfig {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            format: SampleFormat::default(),
            initial_semitones: 0.0,
            max_block_frames: DEFAULT_MAX_BLOCK_FRAMES,
        }
    }

    /// Build a config from signed host values, rejecting non-positive ones
    pub fn from_host(sample_rate: i64, channels: i64) -> Result<Self> {
        let sample_rate = u32::try_from(sample_rate)
            .ok()
            .filter(|&sr| sr > 0)
            .ok_or(PitchShiftError::InvalidSampleRate(sample_rate))?;
        let channels = u16::try_from(channels)
            .ok()
            .filter(|&ch| ch > 0)
            .ok_or(PitchShiftError::InvalidChannels(channels))?;
        Ok(Self::new(sample_rate, channels))
    }

    pub fn with_format(mut self, format: SampleFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_initial_semitones(mut self, semitones: f32) -> Self {
        self.initial_semitones = semitones;
        self
    }

    pub fn with_max_block_frames(mut self, frames: usize) -> Self {
        self.max_block_frames = frames;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(PitchShiftError::InvalidSampleRate(0));
        }
        if self.channels == 0 {
            return Err(PitchShiftError::InvalidChannels(0));
        }
        Ok(())
    }

    pub fn layout(&self) -> FrameLayout {
        FrameLayout::new(self.format, self.channels as usize)
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS)
    }
}
