//! Sample codec between the host wire format and engine samples
//!
//! Hosts hand over raw byte buffers of interleaved, channel-major samples in
//! native byte order. The shift engine works on interleaved `f32`. Nothing in
//! here allocates; every function works on the prefix that fits both sides.

/// Wire sample format of host buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleFormat {
    /// Signed 16-bit fixed point
    #[default]
    I16,
    /// 32-bit IEEE float
    F32,
}

impl SampleFormat {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::I16 => 2,
            SampleFormat::F32 => 4,
        }
    }

    /// Map a C ABI format code (0 = i16, 1 = f32)
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(SampleFormat::I16),
            1 => Some(SampleFormat::F32),
            _ => None,
        }
    }
}

/// Result of splitting a byte length into whole frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSplit {
    pub frames: usize,
    /// Trailing bytes that do not form a whole frame
    pub remainder: usize,
}

/// Frame geometry of a wire buffer: format and channel count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub format: SampleFormat,
    pub channels: usize,
}

impl FrameLayout {
    pub fn new(format: SampleFormat, channels: usize) -> Self {
        Self { format, channels }
    }

    pub fn bytes_per_frame(&self) -> usize {
        self.format.bytes_per_sample() * self.channels
    }

    pub fn split(&self, byte_len: usize) -> FrameSplit {
        let bpf = self.bytes_per_frame();
        if bpf == 0 {
            return FrameSplit { frames: 0, remainder: byte_len };
        }
        FrameSplit {
            frames: byte_len / bpf,
            remainder: byte_len % bpf,
        }
    }

    pub fn byte_len(&self, frames: usize) -> usize {
        frames * self.bytes_per_frame()
    }

    pub fn sample_len(&self, frames: usize) -> usize {
        frames * self.channels
    }
}

// One scale both ways so 16-bit audio survives decode then encode bit-exact
const I16_SCALE: f32 = 32768.0;

/// Decode wire bytes into `out`, returning the number of samples written.
///
/// Trailing bytes that do not form a whole sample are ignored.
pub fn decode_into(format: SampleFormat, bytes: &[u8], out: &mut [f32]) -> usize {
    match format {
        SampleFormat::I16 => {
            let mut written = 0;
            for (chunk, sample) in bytes.chunks_exact(2).zip(out.iter_mut()) {
                let raw = i16::from_ne_bytes([chunk[0], chunk[1]]);
                *sample = raw as f32 / I16_SCALE;
                written += 1;
            }
            written
        }
        SampleFormat::F32 => {
            let mut written = 0;
            for (chunk, sample) in bytes.chunks_exact(4).zip(out.iter_mut()) {
                *sample = f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                written += 1;
            }
            written
        }
    }
}

/// Encode samples into wire bytes, returning the number of bytes written.
///
/// 16-bit output is clamped to `i16::MIN..=i16::MAX`; float output is passed
/// through.
pub fn encode_into(format: SampleFormat, samples: &[f32], out: &mut [u8]) -> usize {
    match format {
        SampleFormat::I16 => {
            let mut written = 0;
            for (sample, chunk) in samples.iter().zip(out.chunks_exact_mut(2)) {
                let value = (sample * I16_SCALE)
                    .round()
                    .clamp(i16::MIN as f32, i16::MAX as f32) as i16;
                chunk.copy_from_slice(&value.to_ne_bytes());
                written += 2;
            }
            written
        }
        SampleFormat::F32 => {
            let mut written = 0;
            for (sample, chunk) in samples.iter().zip(out.chunks_exact_mut(4)) {
                chunk.copy_from_slice(&sample.to_ne_bytes());
                written += 4;
            }
            written
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i16_bytes(values: &[i16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    #[test]
    fn test_split_reports_remainder() {
        let stereo16 = FrameLayout::new(SampleFormat::I16, 2);
        assert_eq!(stereo16.bytes_per_frame(), 4);
        assert_eq!(stereo16.split(1024), FrameSplit { frames: 256, remainder: 0 });
        assert_eq!(stereo16.split(1027), FrameSplit { frames: 256, remainder: 3 });
        assert_eq!(stereo16.split(0), FrameSplit { frames: 0, remainder: 0 });

        let mono_float = FrameLayout::new(SampleFormat::F32, 1);
        assert_eq!(mono_float.split(10), FrameSplit { frames: 2, remainder: 2 });
    }

    #[test]
    fn test_decode_i16_scaling() {
        let bytes = i16_bytes(&[0, 16384, -32768, 32767]);
        let mut out = [9.0f32; 4];
        assert_eq!(decode_into(SampleFormat::I16, &bytes, &mut out), 4);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 0.5);
        assert_eq!(out[2], -1.0);
        assert!((out[3] - 0.99997).abs() < 1e-4);
    }

    #[test]
    fn test_decode_ignores_partial_sample() {
        let mut bytes = i16_bytes(&[1000, -1000]);
        bytes.push(0x7f);
        let mut out = [0.0f32; 4];
        assert_eq!(decode_into(SampleFormat::I16, &bytes, &mut out), 2);
    }

    #[test]
    fn test_decode_limited_by_output_len() {
        let bytes: Vec<u8> = [0.25f32, 0.5, 0.75].iter().flat_map(|v| v.to_ne_bytes()).collect();
        let mut out = [0.0f32; 2];
        assert_eq!(decode_into(SampleFormat::F32, &bytes, &mut out), 2);
        assert_eq!(out, [0.25, 0.5]);
    }

    #[test]
    fn test_encode_i16_clamps() {
        let mut out = [0u8; 6];
        let written = encode_into(SampleFormat::I16, &[2.0, -3.0, 0.5], &mut out);
        assert_eq!(written, 6);
        assert_eq!(i16::from_ne_bytes([out[0], out[1]]), 32767);
        assert_eq!(i16::from_ne_bytes([out[2], out[3]]), -32768);
        assert_eq!(i16::from_ne_bytes([out[4], out[5]]), 16384);
    }

    #[test]
    fn test_i16_round_trip_is_exact() {
        let values = [i16::MIN, -20000, -1, 0, 1, 100, 16384, 20000, i16::MAX];
        let bytes = i16_bytes(&values);
        let mut samples = [0.0f32; 9];
        assert_eq!(decode_into(SampleFormat::I16, &bytes, &mut samples), 9);

        let mut out = [0u8; 18];
        assert_eq!(encode_into(SampleFormat::I16, &samples, &mut out), 18);
        assert_eq!(out.to_vec(), bytes);
    }

    #[test]
    fn test_encode_never_overruns_output() {
        let mut out = [0u8; 5];
        let written = encode_into(SampleFormat::F32, &[0.1, 0.2], &mut out);
        assert_eq!(written, 4);
        assert_eq!(f32::from_ne_bytes([out[0], out[1], out[2], out[3]]), 0.1);
    }

    #[test]
    fn test_format_codes() {
        assert_eq!(SampleFormat::from_code(0), Some(SampleFormat::I16));
        assert_eq!(SampleFormat::from_code(1), Some(SampleFormat::F32));
        assert_eq!(SampleFormat::from_code(2), None);
    }
}
