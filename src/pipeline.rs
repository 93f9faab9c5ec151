//! Per-callback streaming through the shift engine
//!
//! Each `process` call decodes the host's input bytes, pushes them into the
//! engine, then drains whatever the engine has ready into the host's output
//! bytes. Input and output sizes are not linked: the engine holds back
//! lookahead, so early calls (and any call after a pitch change) may return
//! fewer bytes than were fed in, or none at all.

use std::sync::Arc;

use crate::codec::{self, FrameLayout};
use crate::config::AudioConfig;
use crate::diagnostics::Diagnostics;
use crate::engine::{EngineBinding, ShiftEngine};
use crate::error::Result;
use crate::pitch::PitchControl;

pub struct StreamPipeline<E: ShiftEngine> {
    binding: EngineBinding<E>,
    layout: FrameLayout,
    /// Decoded input waiting to be pushed
    input_scratch: Vec<f32>,
    /// Engine output waiting to be encoded
    output_scratch: Vec<f32>,
    /// Input arrived since the last flush
    unflushed: bool,
    diagnostics: Arc<Diagnostics>,
}

impl<E: ShiftEngine> StreamPipeline<E> {
    pub fn new(config: &AudioConfig, diagnostics: Arc<Diagnostics>) -> Result<Self> {
        config.validate()?;
        let binding = EngineBinding::create(config.sample_rate, config.channels)?;
        let layout = config.layout();
        let scratch_len = layout.sample_len(config.max_block_frames);
        Ok(Self {
            binding,
            layout,
            input_scratch: vec![0.0; scratch_len],
            output_scratch: vec![0.0; scratch_len],
            unflushed: false,
            diagnostics,
        })
    }

    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    pub fn engine(&self) -> &E {
        self.binding.engine()
    }

    /// Forward a pending pitch change to the engine
    #[inline]
    pub fn apply_pitch(&mut self, pitch: &PitchControl) {
        if let Some(semitones) = pitch.take_pending() {
            self.binding.set_pitch_semitones(semitones);
        }
    }

    /// Push `input`, then fill as much of `output` as the engine has ready.
    /// Returns the number of bytes written to `output`.
    pub fn process(&mut self, input: &[u8], output: &mut [u8]) -> usize {
        let split = self.layout.split(input.len());
        if split.remainder != 0 && self.diagnostics.record_malformed(split.remainder) {
            log::warn!(
                "input of {} bytes is not a whole number of {}-byte frames; dropping {} trailing bytes",
                input.len(),
                self.layout.bytes_per_frame(),
                split.remainder
            );
        }

        if split.frames > 0 {
            let samples = self.layout.sample_len(split.frames);
            ensure_len(&mut self.input_scratch, samples, &self.diagnostics);
            let bytes = self.layout.byte_len(split.frames);
            codec::decode_into(
                self.layout.format,
                &input[..bytes],
                &mut self.input_scratch[..samples],
            );
            let pushed = self
                .binding
                .put_samples(&self.input_scratch[..samples], split.frames);
            self.diagnostics.record_pushed(pushed);
            self.unflushed = true;
        }

        self.drain_into(output)
    }

    /// Flush the engine, then drain once into `output`.
    ///
    /// Hosts call this repeatedly until it returns 0. The engine is only
    /// flushed when new input arrived since the previous flush, so repeat
    /// calls just keep draining.
    pub fn flush_and_receive(&mut self, output: &mut [u8]) -> usize {
        if self.unflushed {
            self.binding.flush();
            self.unflushed = false;
        }
        self.drain_into(output)
    }

    pub fn reset(&mut self) {
        self.binding.clear();
        self.unflushed = false;
    }

    pub fn buffered_frames(&mut self) -> usize {
        self.binding.buffered_frames()
    }

    fn drain_into(&mut self, output: &mut [u8]) -> usize {
        let max_frames = self.layout.split(output.len()).frames;
        if max_frames == 0 {
            return 0;
        }
        let samples = self.layout.sample_len(max_frames);
        ensure_len(&mut self.output_scratch, samples, &self.diagnostics);

        let received = self
            .binding
            .receive_samples(&mut self.output_scratch[..samples], max_frames);
        if received == 0 {
            return 0;
        }
        self.diagnostics.record_received(received);

        let bytes = self.layout.byte_len(received);
        codec::encode_into(
            self.layout.format,
            &self.output_scratch[..self.layout.sample_len(received)],
            &mut output[..bytes],
        )
    }
}

/// Grow scratch space for an oversized host block. Steady state never gets here.
fn ensure_len(buffer: &mut Vec<f32>, len: usize, diagnostics: &Diagnostics) {
    if buffer.len() < len {
        log::debug!("growing scratch buffer from {} to {} samples", buffer.len(), len);
        diagnostics.record_scratch_growth();
        buffer.resize(len, 0.0);
    }
}
