//! The host-facing pitch shifter
//!
//! `PitchShifter` ties the lifecycle state machine, the pitch parameter and
//! the streaming pipeline together. Out-of-sequence calls never fail: before
//! `initialize` or after `release`, processing returns zero bytes and pitch
//! changes are dropped, so a confused host can never take down its audio
//! thread.

use std::sync::Arc;

use crate::config::AudioConfig;
use crate::diagnostics::{Diagnostics, DiagnosticsSnapshot};
use crate::engine::ShiftEngine;
use crate::error::Result;
use crate::lifecycle::{LifecycleState, Transition};
use crate::pitch::{PitchControl, PitchHandle};
use crate::pipeline::StreamPipeline;

pub struct PitchShifter<E: ShiftEngine> {
    state: LifecycleState,
    /// Present exactly when `state` is `Ready`
    session: Option<Session<E>>,
    pitch: PitchControl,
    diagnostics: Arc<Diagnostics>,
}

struct Session<E: ShiftEngine> {
    config: AudioConfig,
    pipeline: StreamPipeline<E>,
}

/// Pitch shifter backed by SoundTouch
#[cfg(feature = "soundtouch")]
pub type SoundTouchShifter = PitchShifter<crate::engine::SoundTouchEngine>;

impl<E: ShiftEngine> PitchShifter<E> {
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            session: None,
            pitch: PitchControl::new(),
            diagnostics: Arc::new(Diagnostics::new()),
        }
    }

    /// Create the engine for `config` and become ready.
    ///
    /// Calling this while already ready succeeds without touching the running
    /// engine, even if `config` differs; release first to reconfigure. An
    /// invalid `config` is reported in every state.
    pub fn initialize(&mut self, config: AudioConfig) -> Result<()> {
        config.validate()?;
        match self.state.on_initialize() {
            Transition::Ignore => {
                if self.config() != Some(&config) {
                    log::warn!(
                        "initialize ignored: already running with {:?}; release first to apply {:?}",
                        self.config(),
                        config
                    );
                }
                Ok(())
            }
            Transition::Apply(next) => {
                self.diagnostics.reset();
                let pipeline = StreamPipeline::new(&config, self.diagnostics.clone())?;
                log::info!(
                    "pitch shifter ready: {} Hz, {} channel(s), {:?}, {:+.2} semitones",
                    config.sample_rate,
                    config.channels,
                    config.format,
                    config.initial_semitones
                );
                self.pitch.activate(config.initial_semitones);
                self.session = Some(Session { config, pipeline });
                self.state = next;
                Ok(())
            }
        }
    }

    /// Tear down the engine. Safe to call in any state.
    pub fn release(&mut self) {
        if let Transition::Apply(next) = self.state.on_release() {
            self.pitch.deactivate();
            // Dropping the session destroys the engine
            self.session = None;
            self.state = next;
            log::info!("pitch shifter released");
        }
    }

    /// Change the pitch for audio pushed from now on.
    /// Returns `false` when not ready or `semitones` is not finite.
    pub fn set_pitch(&self, semitones: f32) -> bool {
        self.pitch.set_semitones(semitones)
    }

    /// Handle for changing pitch from a control thread without locking
    pub fn pitch_handle(&self) -> PitchHandle {
        self.pitch.handle()
    }

    pub fn pitch(&self) -> f32 {
        self.pitch.semitones()
    }

    /// Feed `input` and write ready audio to `output`.
    /// Returns bytes written, in `0..=output.len()`; 0 when not ready.
    pub fn process(&mut self, input: &[u8], output: &mut [u8]) -> usize {
        match self.session.as_mut() {
            Some(session) => {
                session.pipeline.apply_pitch(&self.pitch);
                session.pipeline.process(input, output)
            }
            None => 0,
        }
    }

    /// Drain remaining audio at end of stream. Call until it returns 0.
    pub fn flush_and_receive(&mut self, output: &mut [u8]) -> usize {
        match self.session.as_mut() {
            Some(session) => {
                session.pipeline.apply_pitch(&self.pitch);
                session.pipeline.flush_and_receive(output)
            }
            None => 0,
        }
    }

    /// Discard everything buffered in the engine, keeping config and pitch
    pub fn reset(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.pipeline.reset();
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// The running engine, when ready
    pub fn engine(&self) -> Option<&E> {
        self.session.as_ref().map(|session| session.pipeline.engine())
    }

    pub fn config(&self) -> Option<&AudioConfig> {
        self.session.as_ref().map(|session| &session.config)
    }

    /// Frames held inside the engine; 0 when not ready
    pub fn buffered_frames(&mut self) -> usize {
        self.session
            .as_mut()
            .map(|session| session.pipeline.buffered_frames())
            .unwrap_or(0)
    }

    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }
}

impl<E: ShiftEngine> Drop for PitchShifter<E> {
    fn drop(&mut self) {
        // Outstanding handles must stop reporting success
        self.pitch.deactivate();
    }
}

impl<E: ShiftEngine> Default for PitchShifter<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PitchShiftError;
    use std::cell::Cell;

    thread_local! {
        static CREATED: Cell<usize> = const { Cell::new(0) };
    }

    /// Silent engine that counts how many times it was created
    struct Counting {
        pitch: f32,
    }

    impl ShiftEngine for Counting {
        fn create(_sample_rate: u32, channels: u16) -> Result<Self> {
            if channels > 8 {
                return Err(PitchShiftError::EngineUnavailable("too wide".into()));
            }
            CREATED.with(|c| c.set(c.get() + 1));
            Ok(Self { pitch: 0.0 })
        }
        fn set_pitch_semitones(&mut self, semitones: f32) {
            self.pitch = semitones;
        }
        fn put_samples(&mut self, _samples: &[f32], _frames: usize) {}
        fn receive_samples(&mut self, _output: &mut [f32], _max_frames: usize) -> usize {
            0
        }
        fn flush(&mut self) {}
        fn clear(&mut self) {}
        fn buffered_frames(&mut self) -> usize {
            0
        }
    }

    #[test]
    fn test_double_initialize_allocates_once() {
        let mut shifter = PitchShifter::<Counting>::new();
        let before = CREATED.with(|c| c.get());
        shifter.initialize(AudioConfig::default()).unwrap();
        shifter.initialize(AudioConfig::default()).unwrap();
        shifter.initialize(AudioConfig::new(8000, 1)).unwrap();
        assert_eq!(CREATED.with(|c| c.get()) - before, 1);
        assert_eq!(shifter.config(), Some(&AudioConfig::default()));
        assert_eq!(shifter.state(), LifecycleState::Ready);
    }

    #[test]
    fn test_invalid_config_reported_while_ready() {
        let mut shifter = PitchShifter::<Counting>::new();
        shifter.initialize(AudioConfig::new(44100, 2)).unwrap();
        assert!(matches!(
            shifter.initialize(AudioConfig::new(0, 0)),
            Err(PitchShiftError::InvalidSampleRate(0))
        ));
        assert!(matches!(
            shifter.initialize(AudioConfig::new(48000, 0)),
            Err(PitchShiftError::InvalidChannels(0))
        ));
        // The running engine is untouched
        assert_eq!(shifter.state(), LifecycleState::Ready);
        assert_eq!(shifter.config(), Some(&AudioConfig::new(44100, 2)));
    }

    #[test]
    fn test_invalid_config_leaves_uninitialized() {
        let mut shifter = PitchShifter::<Counting>::new();
        assert!(shifter.initialize(AudioConfig::new(0, 2)).is_err());
        assert_eq!(shifter.state(), LifecycleState::Uninitialized);
        assert!(shifter.initialize(AudioConfig::new(44100, 9)).is_err());
        assert_eq!(shifter.state(), LifecycleState::Uninitialized);
        assert!(!shifter.set_pitch(1.0));
    }

    #[test]
    fn test_release_then_reinitialize() {
        let mut shifter = PitchShifter::<Counting>::new();
        shifter.initialize(AudioConfig::new(44100, 2)).unwrap();
        shifter.release();
        assert_eq!(shifter.state(), LifecycleState::Released);
        assert!(shifter.config().is_none());
        shifter.release();
        assert_eq!(shifter.state(), LifecycleState::Released);

        shifter.initialize(AudioConfig::new(48000, 1)).unwrap();
        assert_eq!(shifter.config().map(|c| c.sample_rate), Some(48000));
    }

    #[test]
    fn test_pitch_resets_to_configured_default() {
        let mut shifter = PitchShifter::<Counting>::new();
        shifter
            .initialize(AudioConfig::default().with_initial_semitones(-1.0))
            .unwrap();
        assert!(shifter.set_pitch(5.0));
        assert_eq!(shifter.pitch(), 5.0);
        shifter.release();
        assert!(!shifter.set_pitch(7.0));

        shifter.initialize(AudioConfig::default()).unwrap();
        assert_eq!(shifter.pitch(), 0.0);
    }

    #[test]
    fn test_handle_inert_after_drop() {
        let mut shifter = PitchShifter::<Counting>::new();
        shifter.initialize(AudioConfig::default()).unwrap();
        let handle = shifter.pitch_handle();
        assert!(handle.set_semitones(2.0));
        drop(shifter);
        assert!(!handle.is_ready());
        assert!(!handle.set_semitones(3.0));
    }

    #[test]
    fn test_pitch_reaches_engine_on_next_block() {
        let mut shifter = PitchShifter::<Counting>::new();
        shifter.initialize(AudioConfig::default()).unwrap();
        shifter.set_pitch(4.0);
        shifter.process(&[0u8; 16], &mut [0u8; 16]);
        assert_eq!(shifter.engine().map(|e| e.pitch), Some(4.0));
    }

    #[test]
    fn test_not_ready_operations_are_noops() {
        let mut shifter = PitchShifter::<Counting>::new();
        let mut output = [0xAAu8; 64];
        assert_eq!(shifter.process(&[0u8; 64], &mut output), 0);
        assert_eq!(shifter.flush_and_receive(&mut output), 0);
        shifter.reset();
        shifter.release();
        assert_eq!(shifter.buffered_frames(), 0);
        assert!(output.iter().all(|&b| b == 0xAA));
        assert_eq!(shifter.state(), LifecycleState::Uninitialized);
    }
}
