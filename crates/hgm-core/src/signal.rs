//! Multichannel time- and frequency-domain containers.
//!
//! [`Signal`] holds real samples, [`Spectrum`] holds the DC..Nyquist bins of a
//! real transform. Both carry one label per channel. [`Labelable`] wraps
//! either so relabeling helpers work on mixed collections without runtime
//! type inspection.

use core::ops::Range;

use rustfft::num_complex::Complex;

use crate::error::{Error, Result};

fn validate_rate(rate: f64) -> Result<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidSamplingRate(rate))
    }
}

fn validate_lengths<T>(channels: &[Vec<T>]) -> Result<usize> {
    let first = channels.first().ok_or(Error::NoChannels)?;
    let expected = first.len();
    for (index, ch) in channels.iter().enumerate().skip(1) {
        if ch.len() != expected {
            return Err(Error::ChannelLengthMismatch {
                index,
                expected,
                actual: ch.len(),
            });
        }
    }
    Ok(expected)
}

fn check_range(range: &Range<usize>, available: usize) -> Result<()> {
    if range.start >= range.end || range.end > available {
        return Err(Error::ChannelRange {
            start: range.start,
            end: range.end,
            available,
        });
    }
    Ok(())
}

/// Real-valued multichannel signal.
///
/// All channels share sample count and sampling rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    channels: Vec<Vec<f64>>,
    sampling_rate: f64,
    labels: Vec<String>,
}

impl Signal {
    /// Create a signal from channel data. Labels default to empty strings.
    pub fn new(channels: Vec<Vec<f64>>, sampling_rate: f64) -> Result<Self> {
        validate_rate(sampling_rate)?;
        validate_lengths(&channels)?;
        let labels = vec![String::new(); channels.len()];
        Ok(Self {
            channels,
            sampling_rate,
            labels,
        })
    }

    /// Create a single-channel signal.
    pub fn mono(samples: Vec<f64>, sampling_rate: f64) -> Result<Self> {
        Self::new(vec![samples], sampling_rate)
    }

    /// Create a silent signal.
    pub fn zeros(num_channels: usize, len: usize, sampling_rate: f64) -> Result<Self> {
        Self::new(vec![vec![0.0; len]; num_channels], sampling_rate)
    }

    /// Replace all channel labels.
    pub fn with_labels(mut self, labels: Vec<String>) -> Result<Self> {
        if labels.len() != self.channels.len() {
            return Err(Error::LabelCountMismatch {
                expected: self.channels.len(),
                actual: labels.len(),
            });
        }
        self.labels = labels;
        Ok(self)
    }

    /// Channel data.
    pub fn channels(&self) -> &[Vec<f64>] {
        &self.channels
    }

    /// One channel, if it exists.
    pub fn channel(&self, index: usize) -> Option<&[f64]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Consume the signal and return its channel data.
    pub fn into_channels(self) -> Vec<Vec<f64>> {
        self.channels
    }

    /// Per-channel labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    /// True when the channels hold no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sampling rate in Hz.
    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.len() as f64 / self.sampling_rate
    }

    /// Cut samples `[start, stop)` from every channel.
    ///
    /// `stop` is clamped to the signal length, so asking for more than is
    /// available returns the tail without padding.
    pub fn crop(&self, start: usize, stop: usize) -> Signal {
        let stop = stop.min(self.len());
        let start = start.min(stop);
        Signal {
            channels: self
                .channels
                .iter()
                .map(|ch| ch[start..stop].to_vec())
                .collect(),
            sampling_rate: self.sampling_rate,
            labels: self.labels.clone(),
        }
    }

    /// Apply `f` to every sample, keeping shape, rate and labels.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Signal {
        Signal {
            channels: self
                .channels
                .iter()
                .map(|ch| ch.iter().map(|&x| f(x)).collect())
                .collect(),
            sampling_rate: self.sampling_rate,
            labels: self.labels.clone(),
        }
    }

    /// Truncate or zero-pad every channel to exactly `len` samples.
    pub fn resize(&self, len: usize) -> Signal {
        Signal {
            channels: self
                .channels
                .iter()
                .map(|ch| {
                    let mut ch = ch.clone();
                    ch.resize(len, 0.0);
                    ch
                })
                .collect(),
            sampling_rate: self.sampling_rate,
            labels: self.labels.clone(),
        }
    }

    /// Extract a contiguous group of channels.
    pub fn split_channels(&self, range: Range<usize>) -> Result<Signal> {
        check_range(&range, self.channels.len())?;
        Ok(Signal {
            channels: self.channels[range.clone()].to_vec(),
            sampling_rate: self.sampling_rate,
            labels: self.labels[range].to_vec(),
        })
    }

    /// Stack the channels of several signals into one.
    ///
    /// Signals shorter than the longest one are zero-filled at the end.
    /// All inputs must share a sampling rate.
    pub fn merge_fill_zeros(signals: &[Signal]) -> Result<Signal> {
        let first = signals.first().ok_or(Error::NoChannels)?;
        let len = signals.iter().map(Signal::len).max().unwrap_or(0);
        let mut channels = Vec::new();
        let mut labels = Vec::new();
        for signal in signals {
            if signal.sampling_rate != first.sampling_rate {
                return Err(Error::SamplingRateMismatch {
                    left: first.sampling_rate,
                    right: signal.sampling_rate,
                });
            }
            #[cfg(feature = "tracing")]
            if signal.len() != len {
                tracing::debug!(from = signal.len(), to = len, "merge: zero-filling signal");
            }
            for ch in &signal.channels {
                let mut ch = ch.clone();
                ch.resize(len, 0.0);
                channels.push(ch);
            }
            labels.extend(signal.labels.iter().cloned());
        }
        Ok(Signal {
            channels,
            sampling_rate: first.sampling_rate,
            labels,
        })
    }
}

/// Half spectrum (DC..Nyquist) of a real multichannel signal.
///
/// Remembers the time-domain length it was computed from, since the bin count
/// alone cannot distinguish even and odd lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    channels: Vec<Vec<Complex<f64>>>,
    resolution: f64,
    signal_length: usize,
    labels: Vec<String>,
}

impl Spectrum {
    /// Create a spectrum from bins.
    ///
    /// `resolution` is the bin spacing in Hz, `signal_length` the sample
    /// count of the time-domain signal the bins describe.
    pub fn new(
        channels: Vec<Vec<Complex<f64>>>,
        resolution: f64,
        signal_length: usize,
    ) -> Result<Self> {
        validate_rate(resolution)?;
        validate_lengths(&channels)?;
        let labels = vec![String::new(); channels.len()];
        Ok(Self {
            channels,
            resolution,
            signal_length,
            labels,
        })
    }

    /// A spectrum of zeros with the same layout as `self`.
    pub fn zeros_like(&self) -> Spectrum {
        Spectrum {
            channels: vec![vec![Complex::new(0.0, 0.0); self.len()]; self.channels.len()],
            resolution: self.resolution,
            signal_length: self.signal_length,
            labels: self.labels.clone(),
        }
    }

    /// Replace all channel labels.
    pub fn with_labels(mut self, labels: Vec<String>) -> Result<Self> {
        if labels.len() != self.channels.len() {
            return Err(Error::LabelCountMismatch {
                expected: self.channels.len(),
                actual: labels.len(),
            });
        }
        self.labels = labels;
        Ok(self)
    }

    /// Channel bins.
    pub fn channels(&self) -> &[Vec<Complex<f64>>] {
        &self.channels
    }

    /// One channel, if it exists.
    pub fn channel(&self, index: usize) -> Option<&[Complex<f64>]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Per-channel labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Bins per channel.
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    /// True when the channels hold no bins.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bin spacing in Hz.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Length of the time-domain signal these bins describe.
    pub fn signal_length(&self) -> usize {
        self.signal_length
    }

    /// Sampling rate of the underlying time-domain signal.
    pub fn sampling_rate(&self) -> f64 {
        self.resolution * self.signal_length as f64
    }

    /// Frequency of bin `index` in Hz.
    pub fn frequency(&self, index: usize) -> f64 {
        index as f64 * self.resolution
    }

    /// Extract a contiguous group of channels.
    pub fn split_channels(&self, range: Range<usize>) -> Result<Spectrum> {
        check_range(&range, self.channels.len())?;
        Ok(Spectrum {
            channels: self.channels[range.clone()].to_vec(),
            resolution: self.resolution,
            signal_length: self.signal_length,
            labels: self.labels[range].to_vec(),
        })
    }

    /// Multiply every bin by a constant.
    pub fn scale(&self, factor: Complex<f64>) -> Spectrum {
        Spectrum {
            channels: self
                .channels
                .iter()
                .map(|ch| ch.iter().map(|&b| b * factor).collect())
                .collect(),
            resolution: self.resolution,
            signal_length: self.signal_length,
            labels: self.labels.clone(),
        }
    }

    /// Element-wise product.
    ///
    /// A single-channel operand is broadcast against every channel of the
    /// other one; otherwise channel counts must match.
    pub fn multiply(&self, other: &Spectrum) -> Result<Spectrum> {
        self.check_layout(other)?;
        let (left, right) = (self.channels.len(), other.channels.len());
        let count = match (left, right) {
            (l, r) if l == r => l,
            (1, r) => r,
            (l, 1) => l,
            (l, r) => return Err(Error::ChannelCountMismatch { left: l, right: r }),
        };
        let channels = (0..count)
            .map(|i| {
                let a = &self.channels[if left == 1 { 0 } else { i }];
                let b = &other.channels[if right == 1 { 0 } else { i }];
                a.iter().zip(b).map(|(x, y)| x * y).collect()
            })
            .collect();
        let labels = if left >= right {
            self.labels.clone()
        } else {
            other.labels.clone()
        };
        Ok(Spectrum {
            channels,
            resolution: self.resolution,
            signal_length: self.signal_length,
            labels,
        })
    }

    /// Accumulate `weight * other` into `self`, channel by channel.
    pub fn add_scaled(&mut self, other: &Spectrum, weight: Complex<f64>) -> Result<()> {
        self.check_layout(other)?;
        if self.channels.len() != other.channels.len() {
            return Err(Error::ChannelCountMismatch {
                left: self.channels.len(),
                right: other.channels.len(),
            });
        }
        for (acc, ch) in self.channels.iter_mut().zip(&other.channels) {
            for (a, &b) in acc.iter_mut().zip(ch) {
                *a += b * weight;
            }
        }
        Ok(())
    }

    fn check_layout(&self, other: &Spectrum) -> Result<()> {
        if self.len() != other.len() || (self.resolution - other.resolution).abs() > 1e-9 {
            return Err(Error::SpectrumShapeMismatch {
                left_bins: self.len(),
                left_resolution: self.resolution,
                right_bins: other.len(),
                right_resolution: other.resolution,
            });
        }
        Ok(())
    }
}

/// Either a [`Signal`] or a [`Spectrum`], for code that only cares about labels.
#[derive(Debug, Clone, PartialEq)]
pub enum Labelable {
    /// Time-domain data.
    Signal(Signal),
    /// Frequency-domain data.
    Spectrum(Spectrum),
}

impl Labelable {
    /// Channel labels of the wrapped value.
    pub fn labels(&self) -> &[String] {
        match self {
            Labelable::Signal(s) => s.labels(),
            Labelable::Spectrum(s) => s.labels(),
        }
    }

    /// Apply one label to every channel.
    pub fn relabel(self, label: &str) -> Labelable {
        match self {
            Labelable::Signal(mut s) => {
                s.labels = vec![label.to_owned(); s.channels.len()];
                Labelable::Signal(s)
            }
            Labelable::Spectrum(mut s) => {
                s.labels = vec![label.to_owned(); s.channels.len()];
                Labelable::Spectrum(s)
            }
        }
    }

    /// The wrapped signal, if this is one.
    pub fn as_signal(&self) -> Option<&Signal> {
        match self {
            Labelable::Signal(s) => Some(s),
            Labelable::Spectrum(_) => None,
        }
    }

    /// The wrapped spectrum, if this is one.
    pub fn as_spectrum(&self) -> Option<&Spectrum> {
        match self {
            Labelable::Spectrum(s) => Some(s),
            Labelable::Signal(_) => None,
        }
    }

    /// Unwrap into a signal, if this is one.
    pub fn into_signal(self) -> Option<Signal> {
        match self {
            Labelable::Signal(s) => Some(s),
            Labelable::Spectrum(_) => None,
        }
    }
}

impl From<Signal> for Labelable {
    fn from(signal: Signal) -> Self {
        Labelable::Signal(signal)
    }
}

impl From<Spectrum> for Labelable {
    fn from(spectrum: Spectrum) -> Self {
        Labelable::Spectrum(spectrum)
    }
}

/// Relabel a batch pairwise: item `i` gets `labels[i]` on every channel.
///
/// Extra items or labels beyond the shorter list are dropped.
pub fn relabel_all<I, S>(items: I, labels: &[S]) -> Vec<Labelable>
where
    I: IntoIterator<Item = Labelable>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .zip(labels)
        .map(|(item, label)| item.relabel(label.as_ref()))
        .collect()
}
