use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Device, FromSample, Sample, SizedSample, Stream, StreamConfig,
};
use super::{AudioOutput, LoopSource};
use crate::codec::{self, SampleFormat};
use crate::engine::ShiftEngine;
use crate::shifter::PitchShifter;
use std::sync::{Arc, Mutex};

/// Scratch frames reserved up front; devices rarely ask for more per callback
const CALLBACK_RESERVE_FRAMES: usize = 4096;

/// Plays a source through a pitch shifter on the default output device
///
/// The shifter must be initialized with the device's sample rate and channel
/// count (see `AudioOutput::initialize`) and `SampleFormat::F32`.
pub struct CpalOutput {
    stream: Option<Stream>,
    device: Option<Device>,
    config: Option<StreamConfig>,
    sample_rate: u32,
    channels: u16,
    is_active: bool,
}

/// State owned by the audio callback
struct RenderState {
    source: LoopSource,
    channels: usize,
    samples: Vec<f32>,
    input_bytes: Vec<u8>,
    output_bytes: Vec<u8>,
}

impl RenderState {
    fn new(source: LoopSource, channels: usize) -> Self {
        let samples = CALLBACK_RESERVE_FRAMES * channels;
        let bytes = samples * SampleFormat::F32.bytes_per_sample();
        Self {
            source,
            channels,
            samples: vec![0.0; samples],
            input_bytes: vec![0; bytes],
            output_bytes: vec![0; bytes],
        }
    }

    fn reserve(&mut self, samples: usize) {
        if self.samples.len() < samples {
            let bytes = samples * SampleFormat::F32.bytes_per_sample();
            self.samples.resize(samples, 0.0);
            self.input_bytes.resize(bytes, 0);
            self.output_bytes.resize(bytes, 0);
        }
    }
}

impl CpalOutput {
    pub fn new() -> Self {
        Self {
            stream: None,
            device: None,
            config: None,
            sample_rate: 44100,
            channels: 2,
            is_active: false,
        }
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Create a stream that pulls `source` through `shifter`
    pub fn create_stream_with_shifter<E>(
        &mut self,
        shifter: Arc<Mutex<PitchShifter<E>>>,
        source: LoopSource,
    ) -> Result<(), anyhow::Error>
    where
        E: ShiftEngine + 'static,
    {
        let device = self.device.as_ref().ok_or_else(|| anyhow::anyhow!("Device not initialized"))?;
        let config = self.config.as_ref().ok_or_else(|| anyhow::anyhow!("Config not initialized"))?;

        let supported_config = device.default_output_config()?;
        let stream = match supported_config.sample_format() {
            cpal::SampleFormat::I8 => Self::make_stream::<i8, E>(device, config, shifter, source)?,
            cpal::SampleFormat::I16 => Self::make_stream::<i16, E>(device, config, shifter, source)?,
            cpal::SampleFormat::I32 => Self::make_stream::<i32, E>(device, config, shifter, source)?,
            cpal::SampleFormat::U8 => Self::make_stream::<u8, E>(device, config, shifter, source)?,
            cpal::SampleFormat::U16 => Self::make_stream::<u16, E>(device, config, shifter, source)?,
            cpal::SampleFormat::U32 => Self::make_stream::<u32, E>(device, config, shifter, source)?,
            cpal::SampleFormat::F32 => Self::make_stream::<f32, E>(device, config, shifter, source)?,
            cpal::SampleFormat::F64 => Self::make_stream::<f64, E>(device, config, shifter, source)?,
            sample_format => return Err(anyhow::anyhow!("Unsupported sample format '{}'", sample_format)),
        };

        self.stream = Some(stream);
        Ok(())
    }

    /// Setup the CPAL host and device
    fn setup_host_device(&mut self) -> Result<(), anyhow::Error> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("Default output device is not available"))?;

        log::info!("Output device: {}", device.name()?);

        let config = device.default_output_config()?;
        log::info!("Default output config: {:?}", config);

        self.sample_rate = config.sample_rate().0;
        self.channels = config.channels();
        self.device = Some(device);
        self.config = Some(config.into());

        Ok(())
    }

    /// Create a typed stream for the given sample format
    fn make_stream<T, E>(
        device: &Device,
        config: &StreamConfig,
        shifter: Arc<Mutex<PitchShifter<E>>>,
        source: LoopSource,
    ) -> Result<Stream, anyhow::Error>
    where
        T: SizedSample + FromSample<f32>,
        E: ShiftEngine + 'static,
    {
        let mut state = RenderState::new(source, config.channels as usize);
        let err_fn = |err| log::error!("Error in output stream: {}", err);

        let stream = device.build_output_stream(
            config,
            move |output: &mut [T], _: &cpal::OutputCallbackInfo| {
                Self::render_block(output, &mut state, &shifter);
            },
            err_fn,
            None,
        )?;

        Ok(stream)
    }

    /// Fill one device buffer with shifted audio, padding with silence
    /// while the shifter is still warming up
    fn render_block<T, E>(output: &mut [T], state: &mut RenderState, shifter: &Mutex<PitchShifter<E>>)
    where
        T: Sample + FromSample<f32>,
        E: ShiftEngine,
    {
        let channels = state.channels;
        let samples = (output.len() / channels) * channels;
        let bytes = samples * SampleFormat::F32.bytes_per_sample();
        state.reserve(samples);

        for frame in state.samples[..samples].chunks_exact_mut(channels) {
            frame.fill(state.source.next_sample());
        }
        codec::encode_into(
            SampleFormat::F32,
            &state.samples[..samples],
            &mut state.input_bytes[..bytes],
        );

        // Never wait on the control thread; a missed block is just silence
        let written = match shifter.try_lock() {
            Ok(mut shifter) => shifter.process(&state.input_bytes[..bytes], &mut state.output_bytes[..bytes]),
            Err(_) => 0,
        };
        let produced = codec::decode_into(
            SampleFormat::F32,
            &state.output_bytes[..written],
            &mut state.samples[..samples],
        );

        for (index, sample) in output.iter_mut().enumerate() {
            let value = if index < produced { state.samples[index] } else { 0.0 };
            *sample = T::from_sample(value);
        }
    }
}

impl Default for CpalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for CpalOutput {
    fn initialize(&mut self) -> Result<(u32, u16), anyhow::Error> {
        self.setup_host_device()?;
        Ok((self.sample_rate, self.channels))
    }

    fn start(&mut self) -> Result<(), anyhow::Error> {
        if let Some(stream) = &self.stream {
            stream.play()?;
            self.is_active = true;
            log::info!("Audio stream started at sample rate: {}", self.sample_rate);
        } else {
            return Err(anyhow::anyhow!("Stream not created. Call create_stream_with_shifter first."));
        }

        Ok(())
    }

    fn stop(&mut self) -> Result<(), anyhow::Error> {
        if let Some(stream) = &self.stream {
            stream.pause()?;
            self.is_active = false;
            log::info!("Audio stream stopped");
        }

        Ok(())
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}
