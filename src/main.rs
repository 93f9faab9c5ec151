//! Desktop front end: live playback through the shifter, or offline WAV bounce.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};

use pitchshift::bounce;
use pitchshift::codec::SampleFormat;
use pitchshift::config::AudioConfig;
use pitchshift::engine::SoundTouchEngine;
use pitchshift::offline::DEFAULT_RENDER_BLOCK_FRAMES;
use pitchshift::platform::{AudioOutput, CpalOutput, LoopSource};
use pitchshift::shifter::SoundTouchShifter;
use pitchshift::utils::init_logger;

#[derive(Parser)]
#[command(name = "pitchshift", about = "Realtime pitch shifting without tempo change")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a WAV file or a test tone through the shifter, changing pitch live
    Play {
        /// WAV file to loop (mixed down to mono)
        #[arg(long, conflicts_with = "tone")]
        file: Option<PathBuf>,
        /// Frequency of the test tone in Hz
        #[arg(long, default_value_t = 440.0)]
        tone: f32,
        /// Initial pitch shift in semitones
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        semitones: f32,
    },
    /// Pitch-shift a WAV file offline
    Bounce {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        semitones: f32,
        /// Frames handed to the shifter per call
        #[arg(long, default_value_t = DEFAULT_RENDER_BLOCK_FRAMES)]
        block_frames: usize,
    },
}

fn main() -> anyhow::Result<()> {
    init_logger();
    let cli = Cli::parse();

    match cli.command {
        Command::Play { file, tone, semitones } => play(file, tone, semitones),
        Command::Bounce {
            input,
            output,
            semitones,
            block_frames,
        } => {
            let report = bounce::bounce_file::<SoundTouchEngine>(&input, &output, semitones, block_frames)?;
            println!(
                "Bounced {} frames in, {} frames out -> {}",
                report.frames_in,
                report.frames_out,
                output.display()
            );
            Ok(())
        }
    }
}

fn play(file: Option<PathBuf>, tone: f32, semitones: f32) -> anyhow::Result<()> {
    let mut cpal_output = CpalOutput::new();
    let (sample_rate, channels) = cpal_output.initialize()?;

    let source = match file {
        Some(path) => {
            let (spec, samples) = bounce::read_wav(&path)?;
            if spec.sample_rate != sample_rate {
                log::warn!(
                    "{} is {} Hz but the device runs at {} Hz; playback speed will differ",
                    path.display(),
                    spec.sample_rate,
                    sample_rate
                );
            }
            LoopSource::from_interleaved(&samples, spec.channels as usize)
        }
        None => LoopSource::sine(sample_rate, tone, 0.3),
    };

    let mut shifter = SoundTouchShifter::new();
    shifter.initialize(
        AudioConfig::new(sample_rate, channels)
            .with_format(SampleFormat::F32)
            .with_initial_semitones(semitones),
    )?;
    let pitch = shifter.pitch_handle();
    let shifter = Arc::new(Mutex::new(shifter));

    cpal_output.create_stream_with_shifter(shifter.clone(), source)?;
    cpal_output.start()?;

    println!("Type a semitone value and press enter to change pitch, 'q' to quit");

    for line in io::stdin().lock().lines() {
        let line = line?;
        match line.trim() {
            "q" => {
                println!("Quitting...");
                break;
            }
            "" => {}
            value => match value.parse::<f32>() {
                Ok(semitones) if pitch.set_semitones(semitones) => {
                    println!("Pitch: {:+.2} semitones", semitones);
                }
                _ => println!("Not a pitch: '{}'", value),
            },
        }
    }

    cpal_output.stop()?;
    if let Ok(mut shifter) = shifter.lock() {
        shifter.release();
    }
    Ok(())
}
