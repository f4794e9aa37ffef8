//! Error types for the identification pipeline.

use thiserror::Error;

/// Errors raised while generating excitations, identifying kernels, or
/// evaluating a model.
///
/// Every variant is fatal for the run that raised it; the pipeline never
/// returns partial kernel sets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IdentificationError {
    /// Signal construction or combination failed.
    #[error(transparent)]
    Signal(#[from] hgm_core::Error),

    /// Excitation and response disagree on sampling rate or length.
    #[error("input mismatch: {0}")]
    InputMismatch(String),

    /// Sweep parameters cannot produce a valid excitation.
    #[error("invalid excitation: {0}")]
    InvalidExcitation(String),

    /// `select_branches` was empty.
    #[error("at least one branch must be selected")]
    EmptyBranchSelection,

    /// A selected branch does not correspond to an identified kernel.
    #[error("branch {branch} out of range (1..={available})")]
    BranchOutOfRange {
        /// Requested branch index.
        branch: usize,
        /// Number of kernels available.
        available: usize,
    },

    /// A harmonic lies beyond the span the excitation can separate.
    #[error("harmonic {order} starts {delay:.1} samples before time zero, beyond the {length}-sample excitation")]
    HarmonicBeyondExcitation {
        /// Harmonic order.
        order: usize,
        /// Offset of the harmonic in samples.
        delay: f64,
        /// Excitation length in samples.
        length: usize,
    },

    /// The harmonic combination matrix could not be inverted.
    #[error("combination matrix for {branches} branches is singular")]
    SingularMatrix {
        /// Matrix dimension.
        branches: usize,
    },

    /// A channel count cannot be split into equal branch groups.
    #[error("{channels} channels cannot be split into {branches} equal branch groups")]
    InvalidChannelGrouping {
        /// Total channel count.
        channels: usize,
        /// Requested group count.
        branches: usize,
    },

    /// The excitation context was produced for the other sweep variant.
    #[error("excitation context was generated for a {found} sweep, expected {expected}")]
    ExcitationKindMismatch {
        /// Variant the identification expects.
        expected: String,
        /// Variant that produced the context.
        found: String,
    },

    /// A model was built from inconsistent parts.
    #[error("invalid model: {0}")]
    InvalidModel(String),
}

/// Convenience result type for the identification pipeline.
pub type Result<T> = core::result::Result<T, IdentificationError>;
