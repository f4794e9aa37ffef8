//! Session validation.
//!
//! Catches mistakes in a session file before a sweep is played: an empty or
//! zero branch selection, sweep frequencies outside `(0, fs/2]`, and lengths
//! of zero. All problems are reported together.
//!
//! # Example
//!
//! ```rust
//! use hgm_config::{IdentificationConfig, SweepMethod, validate_session};
//!
//! let config = IdentificationConfig::new(SweepMethod::Sine, vec![1, 2, 3]);
//! validate_session(&config).expect("default session is valid");
//! ```

use thiserror::Error;

use crate::IdentificationConfig;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// No branch selected.
    #[error("at least one branch must be selected")]
    EmptyBranches,

    /// Branch 0 does not exist.
    #[error("branch numbers start at 1")]
    ZeroBranch,

    /// Sampling rate is not a positive finite number.
    #[error("invalid sampling rate {0} Hz")]
    InvalidSamplingRate(f64),

    /// Sweep frequencies must satisfy `0 < start < stop <= fs/2`.
    #[error("sweep range {start} Hz .. {stop} Hz must lie inside (0, {nyquist}] Hz with start < stop")]
    InvalidFrequencyRange {
        /// Start frequency.
        start: f64,
        /// Stop frequency.
        stop: f64,
        /// Half the sampling rate.
        nyquist: f64,
    },

    /// Excitation length of zero samples.
    #[error("excitation length must be positive")]
    ZeroExcitationLength,

    /// Kernel length of zero samples.
    #[error("filter length must be positive when given")]
    ZeroFilterLength,

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a session.
///
/// Returns the single error found, or [`ValidationError::Multiple`] when
/// several fields are wrong.
pub fn validate_session(config: &IdentificationConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if config.branches.is_empty() {
        errors.push(ValidationError::EmptyBranches);
    } else if config.branches.contains(&0) {
        errors.push(ValidationError::ZeroBranch);
    }

    let e = &config.excitation;
    if !(e.sampling_rate.is_finite() && e.sampling_rate > 0.0) {
        errors.push(ValidationError::InvalidSamplingRate(e.sampling_rate));
    } else {
        let nyquist = e.sampling_rate / 2.0;
        if !(e.start_freq > 0.0 && e.start_freq < e.stop_freq && e.stop_freq <= nyquist) {
            errors.push(ValidationError::InvalidFrequencyRange {
                start: e.start_freq,
                stop: e.stop_freq,
                nyquist,
            });
        }
    }

    if e.length == 0 {
        errors.push(ValidationError::ZeroExcitationLength);
    }
    if config.filter_length == Some(0) {
        errors.push(ValidationError::ZeroFilterLength);
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SweepMethod;

    fn config() -> IdentificationConfig {
        IdentificationConfig::new(SweepMethod::Sine, vec![1, 2, 3])
    }

    #[test]
    fn default_session_is_valid() {
        assert_eq!(validate_session(&config()), Ok(()));
    }

    #[test]
    fn empty_and_zero_branches() {
        let mut c = config();
        c.branches.clear();
        assert_eq!(validate_session(&c), Err(ValidationError::EmptyBranches));
        c.branches = vec![2, 0];
        assert_eq!(validate_session(&c), Err(ValidationError::ZeroBranch));
    }

    #[test]
    fn stop_above_nyquist() {
        let mut c = config();
        c.excitation.sampling_rate = 16000.0;
        assert!(matches!(
            validate_session(&c),
            Err(ValidationError::InvalidFrequencyRange { nyquist, .. }) if nyquist == 8000.0
        ));
    }

    #[test]
    fn collects_every_problem() {
        let mut c = config();
        c.branches.clear();
        c.excitation.length = 0;
        c.filter_length = Some(0);
        match validate_session(&c) {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }
}
