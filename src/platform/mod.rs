//! Platform abstraction for audio output
//!
//! On mobile the host owns the device and calls the pipeline directly; this
//! layer drives the pipeline from a native output device for desktop use.

/// Trait for platform-specific audio output implementations
pub trait AudioOutput {
    /// Open the default device. Returns the device's sample rate and channel count.
    fn initialize(&mut self) -> Result<(u32, u16), anyhow::Error>;

    /// Start the audio stream
    fn start(&mut self) -> Result<(), anyhow::Error>;

    /// Stop the audio stream
    fn stop(&mut self) -> Result<(), anyhow::Error>;

    /// Get the current sample rate
    fn sample_rate(&self) -> u32;

    /// Check if the audio output is active
    fn is_active(&self) -> bool;
}

/// Endless mono source fed into the shifter, one sample per output frame
pub struct LoopSource {
    samples: Vec<f32>,
    position: usize,
}

impl LoopSource {
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            samples,
            position: 0,
        }
    }

    /// One second of a sine tone, which loops seamlessly at integer frequencies
    pub fn sine(sample_rate: u32, frequency_hz: f32, amplitude: f32) -> Self {
        let samples = (0..sample_rate)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * frequency_hz * i as f32 / sample_rate as f32;
                amplitude * phase.sin()
            })
            .collect();
        Self::new(samples)
    }

    /// Mix interleaved audio down to mono
    pub fn from_interleaved(samples: &[f32], channels: usize) -> Self {
        let channels = channels.max(1);
        let mono = samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();
        Self::new(mono)
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let value = self.samples[self.position];
        self.position = (self.position + 1) % self.samples.len();
        value
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// Platform-specific implementations
#[cfg(feature = "native")]
pub mod cpal_output;

#[cfg(feature = "native")]
pub use self::cpal_output::CpalOutput;
