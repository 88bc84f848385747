//! WAV output.

use std::path::Path;

use clap::ValueEnum;
use hound::{SampleFormat, WavWriter};

use crate::error::CliError;

/// Sample encoding of the output file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum BitDepth {
    /// 16-bit integer PCM.
    #[value(name = "16")]
    Int16,
    /// 24-bit integer PCM.
    #[default]
    #[value(name = "24")]
    Int24,
    /// 32-bit IEEE float.
    #[value(name = "32")]
    Float32,
}

impl BitDepth {
    /// Bits per sample.
    pub fn bits(self) -> u16 {
        match self {
            BitDepth::Int16 => 16,
            BitDepth::Int24 => 24,
            BitDepth::Float32 => 32,
        }
    }

    fn hound_spec(self, channels: u16, sample_rate: u32) -> hound::WavSpec {
        hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: self.bits(),
            sample_format: if self == BitDepth::Float32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Write interleaved samples to a WAV file.
pub fn write_wav(
    path: &Path,
    interleaved: &[f32],
    channels: u16,
    sample_rate: u32,
    depth: BitDepth,
) -> Result<(), CliError> {
    let spec = depth.hound_spec(channels, sample_rate);
    let mut writer = WavWriter::create(path, spec).map_err(|e| CliError::write_wav(path, e))?;

    if depth == BitDepth::Float32 {
        for &sample in interleaved {
            writer
                .write_sample(sample)
                .map_err(|e| CliError::write_wav(path, e))?;
        }
    } else {
        let max_val = (1i32 << (depth.bits() - 1)) as f32;
        for &sample in interleaved {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer
                .write_sample(int_sample)
                .map_err(|e| CliError::write_wav(path, e))?;
        }
    }

    writer.finalize().map_err(|e| CliError::write_wav(path, e))
}
