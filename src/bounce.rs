//! Offline pitch shift of WAV files
//!
//! Reads a 16-bit integer or 32-bit float WAV, renders it through a pitch
//! shifter and writes the result in the same sample format.

use std::path::Path;

use hound::{SampleFormat as WavFormat, WavReader, WavSpec, WavWriter};

use crate::config::AudioConfig;
use crate::engine::ShiftEngine;
use crate::error::{PitchShiftError, Result};
use crate::offline::{self, RenderReport};

/// Read a WAV file as interleaved `f32` in [-1, 1]
pub fn read_wav(path: &Path) -> Result<(WavSpec, Vec<f32>)> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (WavFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        (WavFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        (WavFormat::Int, bits) if (8..=32).contains(&bits) => {
            let scale = (1u64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
        (format, bits) => {
            log::error!("unsupported WAV layout: {:?}, {} bits", format, bits);
            return Err(PitchShiftError::Wav(hound::Error::Unsupported));
        }
    };
    Ok((spec, samples))
}

/// Write interleaved `f32` samples using `spec`'s format
pub fn write_wav(path: &Path, spec: WavSpec, samples: &[f32]) -> Result<()> {
    let mut writer = WavWriter::create(path, spec)?;
    match spec.sample_format {
        WavFormat::Float => {
            for &sample in samples {
                writer.write_sample(sample)?;
            }
        }
        WavFormat::Int => {
            // Inverse of the read scale, clamped to the integer range
            let scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
            for &sample in samples {
                let value = (sample * scale).round().clamp(-scale, scale - 1.0) as i32;
                writer.write_sample(value)?;
            }
        }
    }
    writer.finalize()?;
    Ok(())
}

/// Pitch-shift `input` into `output` by `semitones`
pub fn bounce_file<E: ShiftEngine>(
    input: &Path,
    output: &Path,
    semitones: f32,
    block_frames: usize,
) -> Result<RenderReport> {
    let (spec, samples) = read_wav(input)?;
    log::info!(
        "bouncing {} ({} Hz, {} channel(s), {} frames) by {:+.2} semitones",
        input.display(),
        spec.sample_rate,
        spec.channels,
        samples.len() / spec.channels.max(1) as usize,
        semitones
    );

    let config = AudioConfig::from_host(spec.sample_rate as i64, spec.channels as i64)?;
    let (shifted, report) = offline::render::<E>(config, semitones, &samples, block_frames)?;

    let out_spec = match spec.sample_format {
        WavFormat::Float => spec,
        WavFormat::Int => WavSpec {
            bits_per_sample: 16,
            ..spec
        },
    };
    write_wav(output, out_spec, &shifted)?;
    log::info!("wrote {} frames to {}", report.frames_out, output.display());
    Ok(report)
}
