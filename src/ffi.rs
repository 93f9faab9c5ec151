//! C FFI bindings for the pitch shifter
//!
//! This module exposes the pitch-shift pipeline to C/Swift/Kotlin via
//! C-compatible functions. Designed for integration with iOS and Android
//! audio callbacks: buffers are raw bytes, results are byte counts, and no
//! call ever panics or fails on the audio thread.
//!
//! Threading: every `pitch_shifter_*` function must be called from one thread
//! at a time (normally the audio callback thread). To change pitch from a UI
//! thread, take a separate `PitchControlHandle` with
//! `pitch_shifter_pitch_control`; it shares only an atomic parameter with the
//! shifter, never the shifter itself.

use std::ptr;
use std::slice;

use crate::codec::SampleFormat;
use crate::config::AudioConfig;
use crate::error::{PitchShiftError, Result};
use crate::pitch::PitchHandle;
use crate::shifter::SoundTouchShifter;

/// Opaque pitch shifter handle for FFI
pub struct PitchShifterHandle {
    shifter: SoundTouchShifter,
}

/// Opaque control-thread pitch handle for FFI
pub struct PitchControlHandle {
    pitch: PitchHandle,
}

// =============================================================================
// Status codes (must match the host-side enum)
// =============================================================================

/// Call succeeded
pub const PITCH_SHIFTER_OK: i32 = 0;
/// Handle pointer was null
pub const PITCH_SHIFTER_ERR_NULL_HANDLE: i32 = -1;
/// Sample rate was zero or negative
pub const PITCH_SHIFTER_ERR_INVALID_SAMPLE_RATE: i32 = -2;
/// Channel count was zero, negative or too large
pub const PITCH_SHIFTER_ERR_INVALID_CHANNELS: i32 = -3;
/// Unknown sample format code
pub const PITCH_SHIFTER_ERR_INVALID_FORMAT: i32 = -4;
/// The shift engine could not be created
pub const PITCH_SHIFTER_ERR_ENGINE: i32 = -5;

// =============================================================================
// Sample format codes
// =============================================================================

/// Interleaved signed 16-bit samples, native byte order
pub const PITCH_SHIFTER_FORMAT_I16: u32 = 0;
/// Interleaved 32-bit float samples, native byte order
pub const PITCH_SHIFTER_FORMAT_F32: u32 = 1;

impl PitchShifterHandle {
    fn initialize(&mut self, sample_rate: i32, channels: i32, format: u32) -> Result<()> {
        let format = SampleFormat::from_code(format).ok_or(PitchShiftError::InvalidFormat(format))?;
        let config = AudioConfig::from_host(sample_rate as i64, channels as i64)?.with_format(format);
        self.shifter.initialize(config)
    }
}

fn status(result: Result<()>) -> i32 {
    match result {
        Ok(()) => PITCH_SHIFTER_OK,
        Err(err) => {
            log::error!("initialize failed: {}", err);
            err.code()
        }
    }
}

/// Borrow an input buffer, treating null as empty
unsafe fn input_slice<'a>(ptr: *const u8, len: usize) -> &'a [u8] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        slice::from_raw_parts(ptr, len)
    }
}

/// Borrow an output buffer, treating null as zero capacity
unsafe fn output_slice<'a>(ptr: *mut u8, capacity: usize) -> &'a mut [u8] {
    if ptr.is_null() || capacity == 0 {
        &mut []
    } else {
        slice::from_raw_parts_mut(ptr, capacity)
    }
}

// =============================================================================
// Handle lifecycle
// =============================================================================

/// Create a new, uninitialized pitch shifter
///
/// # Returns
/// Pointer to a new handle. Must be freed with `pitch_shifter_free`.
#[no_mangle]
pub extern "C" fn pitch_shifter_new() -> *mut PitchShifterHandle {
    let handle = Box::new(PitchShifterHandle {
        shifter: SoundTouchShifter::new(),
    });
    Box::into_raw(handle)
}

/// Free a pitch shifter, releasing its engine if still initialized
///
/// # Safety
/// `handle` must be a valid pointer returned by `pitch_shifter_new`, or null.
/// After calling this function, the pointer is invalid and must not be used.
#[no_mangle]
pub unsafe extern "C" fn pitch_shifter_free(handle: *mut PitchShifterHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

// =============================================================================
// Engine lifecycle
// =============================================================================

/// Initialize for interleaved 16-bit audio
///
/// Calling this while already initialized is a no-op returning `PITCH_SHIFTER_OK`.
///
/// # Arguments
/// * `handle` - Pointer to a PitchShifterHandle
/// * `sample_rate` - Audio sample rate (e.g., 44100 or 48000)
/// * `channels` - Interleaved channel count (2 for stereo)
///
/// # Returns
/// `PITCH_SHIFTER_OK` or a negative `PITCH_SHIFTER_ERR_*` code
///
/// # Safety
/// `handle` must be a valid pointer returned by `pitch_shifter_new`, or null
#[no_mangle]
pub unsafe extern "C" fn pitch_shifter_initialize(
    handle: *mut PitchShifterHandle,
    sample_rate: i32,
    channels: i32,
) -> i32 {
    pitch_shifter_initialize_with_format(handle, sample_rate, channels, PITCH_SHIFTER_FORMAT_I16)
}

/// Initialize with an explicit wire format (see `PITCH_SHIFTER_FORMAT_*`)
///
/// # Safety
/// `handle` must be a valid pointer returned by `pitch_shifter_new`, or null
#[no_mangle]
pub unsafe extern "C" fn pitch_shifter_initialize_with_format(
    handle: *mut PitchShifterHandle,
    sample_rate: i32,
    channels: i32,
    format: u32,
) -> i32 {
    let Some(handle) = handle.as_mut() else {
        return PITCH_SHIFTER_ERR_NULL_HANDLE;
    };
    status(handle.initialize(sample_rate, channels, format))
}

/// Release the engine. Safe to call repeatedly; the handle stays usable
/// and can be initialized again.
///
/// # Safety
/// `handle` must be a valid pointer returned by `pitch_shifter_new`, or null
#[no_mangle]
pub unsafe extern "C" fn pitch_shifter_release(handle: *mut PitchShifterHandle) {
    if let Some(handle) = handle.as_mut() {
        handle.shifter.release();
    }
}

/// Whether the shifter is initialized
///
/// # Safety
/// `handle` must be a valid pointer returned by `pitch_shifter_new`, or null
#[no_mangle]
pub unsafe extern "C" fn pitch_shifter_is_ready(handle: *const PitchShifterHandle) -> bool {
    handle.as_ref().map(|h| h.shifter.is_ready()).unwrap_or(false)
}

// =============================================================================
// Pitch control
// =============================================================================

/// Set the pitch shift in semitones (fractional values allowed)
///
/// Takes effect at the start of the next `pitch_shifter_process` call. Ignored
/// when not initialized. Same thread rules as `pitch_shifter_process`; use a
/// `PitchControlHandle` from other threads.
///
/// # Safety
/// `handle` must be a valid pointer returned by `pitch_shifter_new`, or null
#[no_mangle]
pub unsafe extern "C" fn pitch_shifter_set_pitch(handle: *mut PitchShifterHandle, semitones: f32) {
    if let Some(handle) = handle.as_mut() {
        handle.shifter.set_pitch(semitones);
    }
}

/// Create a pitch control for use from any thread
///
/// The control stays valid after the shifter is released or freed; changes
/// are then ignored. Changes made after a later `initialize` apply again.
///
/// # Returns
/// A new control (free with `pitch_control_free`), or null if `handle` is null
///
/// # Safety
/// `handle` must be a valid pointer returned by `pitch_shifter_new`, or null
#[no_mangle]
pub unsafe extern "C" fn pitch_shifter_pitch_control(
    handle: *mut PitchShifterHandle,
) -> *mut PitchControlHandle {
    match handle.as_ref() {
        Some(handle) => Box::into_raw(Box::new(PitchControlHandle {
            pitch: handle.shifter.pitch_handle(),
        })),
        None => ptr::null_mut(),
    }
}

/// Set the pitch in semitones from any thread. Lock-free.
///
/// # Returns
/// `true` if the shifter is initialized and the value was finite
///
/// # Safety
/// `control` must be a valid pointer returned by `pitch_shifter_pitch_control`, or null
#[no_mangle]
pub unsafe extern "C" fn pitch_control_set_pitch(control: *const PitchControlHandle, semitones: f32) -> bool {
    control
        .as_ref()
        .map(|control| control.pitch.set_semitones(semitones))
        .unwrap_or(false)
}

/// Free a pitch control
///
/// # Safety
/// `control` must be a valid pointer returned by `pitch_shifter_pitch_control`, or null.
/// After calling this function, the pointer is invalid and must not be used.
#[no_mangle]
pub unsafe extern "C" fn pitch_control_free(control: *mut PitchControlHandle) {
    if !control.is_null() {
        drop(Box::from_raw(control));
    }
}

// =============================================================================
// Audio processing
// =============================================================================

/// Push one block of input and collect whatever output is ready
///
/// Output lags input by the engine's lookahead; returning 0 during warm-up
/// is normal.
///
/// # Arguments
/// * `handle` - Pointer to a PitchShifterHandle
/// * `input` - Interleaved input bytes (may be null when `input_len` is 0)
/// * `input_len` - Input length in bytes
/// * `output` - Buffer to receive interleaved output bytes
/// * `output_capacity` - Output buffer size in bytes
///
/// # Returns
/// Bytes written to `output`, between 0 and `output_capacity`
///
/// # Safety
/// - `handle` must be a valid pointer returned by `pitch_shifter_new`, or null
/// - `input` must point to at least `input_len` readable bytes
/// - `output` must point to at least `output_capacity` writable bytes
#[no_mangle]
pub unsafe extern "C" fn pitch_shifter_process(
    handle: *mut PitchShifterHandle,
    input: *const u8,
    input_len: usize,
    output: *mut u8,
    output_capacity: usize,
) -> usize {
    let Some(handle) = handle.as_mut() else {
        return 0;
    };
    let input = input_slice(input, input_len);
    let output = output_slice(output, output_capacity);
    handle.shifter.process(input, output)
}

/// Drain buffered audio at end of stream. Call until it returns 0.
///
/// # Safety
/// - `handle` must be a valid pointer returned by `pitch_shifter_new`, or null
/// - `output` must point to at least `output_capacity` writable bytes
#[no_mangle]
pub unsafe extern "C" fn pitch_shifter_flush_and_receive(
    handle: *mut PitchShifterHandle,
    output: *mut u8,
    output_capacity: usize,
) -> usize {
    let Some(handle) = handle.as_mut() else {
        return 0;
    };
    let output = output_slice(output, output_capacity);
    handle.shifter.flush_and_receive(output)
}

/// Discard all buffered audio (e.g. after a seek), keeping config and pitch
///
/// # Safety
/// `handle` must be a valid pointer returned by `pitch_shifter_new`, or null
#[no_mangle]
pub unsafe extern "C" fn pitch_shifter_reset(handle: *mut PitchShifterHandle) {
    if let Some(handle) = handle.as_mut() {
        handle.shifter.reset();
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

/// Frames currently buffered inside the engine
///
/// # Safety
/// `handle` must be a valid pointer returned by `pitch_shifter_new`, or null
#[no_mangle]
pub unsafe extern "C" fn pitch_shifter_buffered_frames(handle: *mut PitchShifterHandle) -> u32 {
    handle
        .as_mut()
        .map(|h| h.shifter.buffered_frames() as u32)
        .unwrap_or(0)
}

/// Input buffers since initialize whose length was not a whole number of frames
///
/// # Safety
/// `handle` must be a valid pointer returned by `pitch_shifter_new`, or null
#[no_mangle]
pub unsafe extern "C" fn pitch_shifter_malformed_buffer_count(
    handle: *const PitchShifterHandle,
) -> u64 {
    handle
        .as_ref()
        .map(|h| h.shifter.diagnostics().malformed_buffers)
        .unwrap_or(0)
}

/// Route library logs to stderr (respects `RUST_LOG`). Safe to call repeatedly.
#[no_mangle]
pub extern "C" fn pitch_shifter_init_logging() {
    crate::utils::logging::try_init_logger();
}
