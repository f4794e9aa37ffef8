//! Multichannel WAV reading and writing.

use crate::{Error, Result};
use hgm_core::Signal;
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = reader.len() as u64; // total across all channels
    let num_frames = total_samples / spec.channels.max(1) as u64;
    let duration_secs = num_frames as f64 / spec.sample_rate as f64;

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

fn hound_spec(channels: usize, sample_rate: f64, bits_per_sample: u16) -> Result<hound::WavSpec> {
    let sample_format = match bits_per_sample {
        32 => SampleFormat::Float,
        8 | 16 | 24 => SampleFormat::Int,
        other => {
            return Err(Error::UnsupportedFormat(format!(
                "{other}-bit samples (use 8, 16, 24 or 32)"
            )));
        }
    };
    let channels = u16::try_from(channels)
        .map_err(|_| Error::UnsupportedFormat(format!("{channels} channels")))?;
    if sample_rate.fract() != 0.0 || sample_rate < 1.0 || sample_rate > u32::MAX as f64 {
        return Err(Error::UnsupportedFormat(format!(
            "sampling rate {sample_rate} Hz is not a whole number of hertz"
        )));
    }
    Ok(hound::WavSpec {
        channels,
        sample_rate: sample_rate as u32,
        bits_per_sample,
        sample_format,
    })
}

/// Read a WAV file into a [`Signal`], one channel per WAV channel.
///
/// Integer PCM is scaled to [-1, 1). Channel labels are left empty.
///
/// # Example
/// ```ignore
/// let response = read_signal("response.wav")?;
/// println!("{} channels at {} Hz", response.num_channels(), response.sampling_rate());
/// ```
pub fn read_signal<P: AsRef<Path>>(path: P) -> Result<Signal> {
    let reader = WavReader::open(path.as_ref())?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let frames = interleaved.len() / channels;
    let mut data = vec![Vec::with_capacity(frames); channels];
    for frame in interleaved.chunks_exact(channels) {
        for (ch, &sample) in data.iter_mut().zip(frame) {
            ch.push(sample);
        }
    }

    tracing::debug!(
        path = %path.as_ref().display(),
        channels,
        frames,
        sample_rate = spec.sample_rate,
        "read WAV"
    );

    Ok(Signal::new(data, f64::from(spec.sample_rate))?)
}

/// Write a [`Signal`] to a WAV file.
///
/// `bits_per_sample` of 32 writes IEEE float; 8, 16 and 24 write clamped
/// integer PCM. The sampling rate must be a whole number of hertz.
///
/// # Example
/// ```ignore
/// write_signal("sweep.wav", context.excitation(), 32)?;
/// ```
pub fn write_signal<P: AsRef<Path>>(path: P, signal: &Signal, bits_per_sample: u16) -> Result<()> {
    let spec = hound_spec(signal.num_channels(), signal.sampling_rate(), bits_per_sample)?;
    let mut writer = WavWriter::create(path.as_ref(), spec)?;
    let channels = signal.channels();

    if spec.sample_format == SampleFormat::Float {
        for i in 0..signal.len() {
            for ch in channels {
                writer.write_sample(ch[i] as f32)?;
            }
        }
    } else {
        let max_val = (1i64 << (bits_per_sample - 1)) as f64;
        for i in 0..signal.len() {
            for ch in channels {
                let int_sample = (ch[i] * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    tracing::debug!(
        path = %path.as_ref().display(),
        channels = signal.num_channels(),
        frames = signal.len(),
        bits_per_sample,
        "wrote WAV"
    );
    Ok(())
}
