//! Error types for signal construction and manipulation.

use thiserror::Error;

/// Errors raised when building or combining [`Signal`](crate::Signal) and
/// [`Spectrum`](crate::Spectrum) values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A signal or spectrum was built without any channel.
    #[error("at least one channel is required")]
    NoChannels,

    /// Channels of one signal disagree on their length.
    #[error("channel {index} has {actual} samples, expected {expected}")]
    ChannelLengthMismatch {
        /// Index of the offending channel.
        index: usize,
        /// Length of the first channel.
        expected: usize,
        /// Length of the offending channel.
        actual: usize,
    },

    /// Sampling rate or resolution is not a positive finite number.
    #[error("invalid sampling rate: {0} Hz")]
    InvalidSamplingRate(f64),

    /// Label count does not match channel count.
    #[error("expected {expected} labels, got {actual}")]
    LabelCountMismatch {
        /// Number of channels.
        expected: usize,
        /// Number of labels supplied.
        actual: usize,
    },

    /// Two signals that must share a sampling rate do not.
    #[error("sampling rate mismatch: {left} Hz vs {right} Hz")]
    SamplingRateMismatch {
        /// Rate of the first operand.
        left: f64,
        /// Rate of the second operand.
        right: f64,
    },

    /// Two spectra that must share a bin layout do not.
    #[error("spectrum shape mismatch: {left_bins} bins @ {left_resolution} Hz vs {right_bins} bins @ {right_resolution} Hz")]
    SpectrumShapeMismatch {
        /// Bin count of the first operand.
        left_bins: usize,
        /// Resolution of the first operand.
        left_resolution: f64,
        /// Bin count of the second operand.
        right_bins: usize,
        /// Resolution of the second operand.
        right_resolution: f64,
    },

    /// Channel counts cannot be combined (neither equal nor broadcastable).
    #[error("cannot combine {left} channels with {right} channels")]
    ChannelCountMismatch {
        /// Channel count of the first operand.
        left: usize,
        /// Channel count of the second operand.
        right: usize,
    },

    /// A channel range exceeds the available channels.
    #[error("channel range {start}..{end} out of bounds for {available} channels")]
    ChannelRange {
        /// Range start.
        start: usize,
        /// Range end (exclusive).
        end: usize,
        /// Channels available.
        available: usize,
    },
}

/// Convenience result type for signal operations.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_numbers() {
        let err = Error::ChannelLengthMismatch {
            index: 2,
            expected: 128,
            actual: 64,
        };
        assert_eq!(err.to_string(), "channel 2 has 64 samples, expected 128");

        let err = Error::SamplingRateMismatch {
            left: 48000.0,
            right: 44100.0,
        };
        assert!(err.to_string().contains("44100"));
    }
}
