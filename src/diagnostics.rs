//! Non-blocking counters readable from any thread

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Diagnostics {
    malformed_buffers: AtomicU64,
    truncated_bytes: AtomicU64,
    frames_pushed: AtomicU64,
    frames_received: AtomicU64,
    scratch_growths: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticsSnapshot {
    /// Input buffers whose length was not a whole number of frames
    pub malformed_buffers: u64,
    /// Bytes dropped from the tail of malformed buffers
    pub truncated_bytes: u64,
    pub frames_pushed: u64,
    pub frames_received: u64,
    /// Times a host block exceeded the preallocated scratch space
    pub scratch_growths: u64,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a malformed buffer. Returns true for the first one since the
    /// last reset, so callers can log once without flooding.
    pub fn record_malformed(&self, truncated: usize) -> bool {
        self.truncated_bytes
            .fetch_add(truncated as u64, Ordering::Relaxed);
        self.malformed_buffers.fetch_add(1, Ordering::Relaxed) == 0
    }

    #[inline]
    pub fn record_pushed(&self, frames: usize) {
        self.frames_pushed.fetch_add(frames as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_received(&self, frames: usize) {
        self.frames_received.fetch_add(frames as u64, Ordering::Relaxed);
    }

    pub fn record_scratch_growth(&self) {
        self.scratch_growths.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.malformed_buffers.store(0, Ordering::Relaxed);
        self.truncated_bytes.store(0, Ordering::Relaxed);
        self.frames_pushed.store(0, Ordering::Relaxed);
        self.frames_received.store(0, Ordering::Relaxed);
        self.scratch_growths.store(0, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            malformed_buffers: self.malformed_buffers.load(Ordering::Relaxed),
            truncated_bytes: self.truncated_bytes.load(Ordering::Relaxed),
            frames_pushed: self.frames_pushed.load(Ordering::Relaxed),
            frames_received: self.frames_received.load(Ordering::Relaxed),
            scratch_growths: self.scratch_growths.load(Ordering::Relaxed),
        }
    }
}
