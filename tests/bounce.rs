// Integration tests for offline WAV bouncing

#![cfg(all(feature = "bounce", feature = "soundtouch"))]

mod common;

use std::path::PathBuf;

use hound::{SampleFormat, WavSpec};

use common::sine;
use pitchshift::bounce::{bounce_file, read_wav, write_wav};
use pitchshift::offline::DEFAULT_RENDER_BLOCK_FRAMES;
use pitchshift::SoundTouchEngine;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("pitchshift-{}-{}", std::process::id(), name))
}

#[test]
fn test_bounce_int16_stereo() {
    let input = temp_path("in16.wav");
    let output = temp_path("out16.wav");
    let spec = WavSpec {
        channels: 2,
        sample_rate: 22050,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    write_wav(&input, spec, &sine(330.0, 22050, 2, 22050, 0.4)).unwrap();

    let report = bounce_file::<SoundTouchEngine>(&input, &output, 7.0, DEFAULT_RENDER_BLOCK_FRAMES)
        .unwrap();
    assert_eq!(report.frames_in, 22050);
    assert!(report.frames_out > 0);

    let (out_spec, samples) = read_wav(&output).unwrap();
    assert_eq!(out_spec, spec);
    assert_eq!(samples.len(), report.frames_out * 2);
    assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));

    let _ = std::fs::remove_file(input);
    let _ = std::fs::remove_file(output);
}

#[test]
fn test_bounce_keeps_float_format() {
    let input = temp_path("inf32.wav");
    let output = temp_path("outf32.wav");
    let spec = WavSpec {
        channels: 1,
        sample_rate: 48000,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    write_wav(&input, spec, &sine(500.0, 48000, 1, 24000, 0.5)).unwrap();

    bounce_file::<SoundTouchEngine>(&input, &output, -2.5, 512).unwrap();
    let (out_spec, _) = read_wav(&output).unwrap();
    assert_eq!(out_spec, spec);

    let _ = std::fs::remove_file(input);
    let _ = std::fs::remove_file(output);
}

#[test]
fn test_missing_input_is_an_error() {
    let result = bounce_file::<SoundTouchEngine>(
        &temp_path("does-not-exist.wav"),
        &temp_path("never-written.wav"),
        1.0,
        DEFAULT_RENDER_BLOCK_FRAMES,
    );
    assert!(result.is_err());
}
