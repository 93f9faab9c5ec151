//! Error type for the pitch-shift pipeline.
//!
//! Only configuration and engine construction can fail. Everything that runs
//! on the audio thread degrades to a no-op or a zero-length result instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PitchShiftError {
    #[error("invalid sample rate {0}: must be greater than zero")]
    InvalidSampleRate(i64),

    #[error("invalid channel count {0}: must be at least one")]
    InvalidChannels(i64),

    #[error("unknown sample format code {0}")]
    InvalidFormat(u32),

    #[error("shift engine unavailable: {0}")]
    EngineUnavailable(String),

    #[cfg(feature = "bounce")]
    #[error("WAV: {0}")]
    Wav(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PitchShiftError {
    /// Status code reported across the C ABI (see `ffi::PITCH_SHIFTER_*`).
    pub fn code(&self) -> i32 {
        match self {
            PitchShiftError::InvalidSampleRate(_) => -2,
            PitchShiftError::InvalidChannels(_) => -3,
            PitchShiftError::InvalidFormat(_) => -4,
            PitchShiftError::EngineUnavailable(_) => -5,
            #[cfg(feature = "bounce")]
            PitchShiftError::Wav(_) => -6,
            PitchShiftError::Io(_) => -6,
        }
    }
}

pub type Result<T> = std::result::Result<T, PitchShiftError>;
