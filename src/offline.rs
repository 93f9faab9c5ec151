//! Whole-buffer rendering through a pitch shifter
//!
//! Drives `process` block by block and then drains with `flush_and_receive`,
//! the same call pattern a realtime host uses. Allocates freely; not for the
//! audio thread.

use crate::codec::{self, SampleFormat};
use crate::config::AudioConfig;
use crate::engine::ShiftEngine;
use crate::error::Result;
use crate::shifter::PitchShifter;

/// Frames handed to `process` per call
pub const DEFAULT_RENDER_BLOCK_FRAMES: usize = 1024;

/// Totals from one offline render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    pub frames_in: usize,
    pub frames_out: usize,
}

/// Pitch-shift interleaved `samples` in one go.
///
/// `config.format` is overridden with `F32` so no precision is lost between
/// blocks. Returns the shifted interleaved samples.
pub fn render<E: ShiftEngine>(
    config: AudioConfig,
    semitones: f32,
    samples: &[f32],
    block_frames: usize,
) -> Result<(Vec<f32>, RenderReport)> {
    let config = config
        .with_format(SampleFormat::F32)
        .with_initial_semitones(semitones)
        .with_max_block_frames(block_frames.max(1));
    let layout = config.layout();
    let mut shifter = PitchShifter::<E>::new();
    shifter.initialize(config)?;

    let block_samples = layout.sample_len(block_frames.max(1));
    let mut input_bytes = vec![0u8; layout.byte_len(block_frames.max(1))];
    // Leave headroom so a block never has to wait on a short output buffer
    let mut output_bytes = vec![0u8; input_bytes.len() * 4];
    let mut out_bytes_total: Vec<u8> = Vec::with_capacity(samples.len() * 4);

    for block in samples.chunks(block_samples) {
        let bytes = codec::encode_into(layout.format, block, &mut input_bytes);
        let written = shifter.process(&input_bytes[..bytes], &mut output_bytes);
        out_bytes_total.extend_from_slice(&output_bytes[..written]);
    }
    loop {
        let written = shifter.flush_and_receive(&mut output_bytes);
        if written == 0 {
            break;
        }
        out_bytes_total.extend_from_slice(&output_bytes[..written]);
    }
    shifter.release();

    let mut shifted = vec![0.0f32; out_bytes_total.len() / layout.format.bytes_per_sample()];
    codec::decode_into(layout.format, &out_bytes_total, &mut shifted);

    let report = RenderReport {
        frames_in: samples.len() / layout.channels,
        frames_out: shifted.len() / layout.channels,
    };
    log::debug!(
        "offline render: {} frames in, {} frames out",
        report.frames_in,
        report.frames_out
    );
    Ok((shifted, report))
}
