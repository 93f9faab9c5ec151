//! Lock-free pitch parameter shared between control and audio threads
//!
//! A control thread writes the semitone value with release ordering and raises
//! a pending flag; the audio thread picks it up with acquire ordering at the
//! start of the next block. Nothing here blocks or allocates.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct PitchState {
    semitones: AtomicU32,
    pending: AtomicBool,
    ready: AtomicBool,
}

/// Audio-thread side of the pitch parameter
#[derive(Debug)]
pub struct PitchControl {
    state: Arc<PitchState>,
}

/// Cloneable control-thread handle for changing pitch
#[derive(Debug, Clone)]
pub struct PitchHandle {
    state: Arc<PitchState>,
}

impl PitchControl {
    pub fn new() -> Self {
        Self {
            state: Arc::new(PitchState {
                semitones: AtomicU32::new(0.0f32.to_bits()),
                pending: AtomicBool::new(false),
                ready: AtomicBool::new(false),
            }),
        }
    }

    pub fn handle(&self) -> PitchHandle {
        PitchHandle {
            state: self.state.clone(),
        }
    }

    /// Reset to `semitones` and start accepting changes
    pub(crate) fn activate(&self, semitones: f32) {
        let value = if semitones.is_finite() { semitones } else { 0.0 };
        self.state.semitones.store(value.to_bits(), Ordering::Release);
        self.state.pending.store(true, Ordering::Release);
        self.state.ready.store(true, Ordering::Release);
    }

    /// Stop accepting changes; later writes are dropped until `activate`
    pub(crate) fn deactivate(&self) {
        self.state.ready.store(false, Ordering::Release);
        self.state.pending.store(false, Ordering::Release);
    }

    /// Take a pending change, if any
    #[inline]
    pub(crate) fn take_pending(&self) -> Option<f32> {
        if self.state.pending.swap(false, Ordering::Acquire) {
            Some(f32::from_bits(self.state.semitones.load(Ordering::Acquire)))
        } else {
            None
        }
    }

    pub fn set_semitones(&self, semitones: f32) -> bool {
        self.handle().set_semitones(semitones)
    }

    pub fn semitones(&self) -> f32 {
        f32::from_bits(self.state.semitones.load(Ordering::Acquire))
    }
}

impl Default for PitchControl {
    fn default() -> Self {
        Self::new()
    }
}

impl PitchHandle {
    /// Request a new pitch. Returns `false` (and changes nothing) when the
    /// shifter is not ready or the value is not finite.
    pub fn set_semitones(&self, semitones: f32) -> bool {
        if !semitones.is_finite() || !self.state.ready.load(Ordering::Acquire) {
            return false;
        }
        self.state
            .semitones
            .store(semitones.to_bits(), Ordering::Release);
        self.state.pending.store(true, Ordering::Release);
        true
    }

    pub fn semitones(&self) -> f32 {
        f32::from_bits(self.state.semitones.load(Ordering::Acquire))
    }

    pub fn is_ready(&self) -> bool {
        self.state.ready.load(Ordering::Acquire)
    }
}
