//! Realtime pitch shifting for mobile audio hosts
//!
//! The host hands over raw byte buffers of interleaved audio every callback;
//! [`PitchShifter`] pushes them through a pitch-shifting engine and writes
//! whatever shifted audio is ready back into the host's output buffer.
//!
//! ```no_run
//! # #[cfg(feature = "soundtouch")] {
//! use pitchshift::{AudioConfig, SoundTouchShifter};
//!
//! let mut shifter = SoundTouchShifter::new();
//! shifter.initialize(AudioConfig::new(44100, 2)).unwrap();
//! shifter.set_pitch(3.0);
//!
//! let input = vec![0u8; 1024];
//! let mut output = vec![0u8; 1024];
//! let written = shifter.process(&input, &mut output);
//! assert!(written <= output.len());
//!
//! shifter.release();
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod offline;
pub mod pipeline;
pub mod pitch;
pub mod shifter;
pub mod utils;

// Platform abstraction layer
pub mod platform;

// Offline WAV rendering
#[cfg(feature = "bounce")]
pub mod bounce;

// C bindings (iOS / Android)
#[cfg(feature = "soundtouch")]
pub mod ffi;

pub use codec::{FrameLayout, SampleFormat};
pub use config::AudioConfig;
pub use diagnostics::DiagnosticsSnapshot;
pub use engine::{EngineBinding, ShiftEngine};
pub use error::{PitchShiftError, Result};
pub use lifecycle::LifecycleState;
pub use pitch::PitchHandle;
pub use shifter::PitchShifter;

#[cfg(feature = "soundtouch")]
pub use engine::SoundTouchEngine;
#[cfg(feature = "soundtouch")]
pub use shifter::SoundTouchShifter;
