//! HGM Analysis - Sweep-based identification of Hammerstein group models
//!
//! This crate recovers the branch kernels of a Hammerstein group model from
//! the response of a device to a synchronized exponential sweep:
//!
//! - [`fft`] - FFT wrapper, real-signal transforms, FFT convolution
//! - [`sweep`] - Synchronized sine and cosine sweeps with analytic inverse filters
//! - [`harmonic`] - Separation of harmonic impulse responses
//! - [`identify`] - The identification pipeline
//! - [`model`] - Hammerstein group model evaluation
//! - [`resample`] - Integer-factor resampling for aliasing compensation
//! - [`compare`] - Error metrics for kernels and simulated outputs
//!
//! ## Example Workflow
//!
//! ```rust,ignore
//! use hgm_analysis::identify::{IdentificationSettings, SweepIdentification};
//! use hgm_analysis::AliasingCompensation;
//!
//! // 1. Generate the excitation
//! let identification = SweepIdentification::sine(IdentificationSettings::new(vec![1, 2, 3]))?;
//! let context = identification.excitation()?;
//!
//! // 2. Play context.excitation() through the device and record it (external)
//!
//! // 3. Identify and evaluate
//! let model = identification
//!     .identify(&context, &recorded)?
//!     .into_model(AliasingCompensation::FullUpsampling)?;
//! let prediction = model.process(&other_input)?;
//! ```

pub mod compare;
pub mod error;
pub mod fft;
pub mod harmonic;
pub mod identify;
pub mod model;
pub mod resample;
pub mod sweep;

// Re-export main types
pub use error::{IdentificationError, Result};
pub use fft::Fft;
pub use harmonic::{HarmonicWindower, NovakHarmonicWindower};
pub use identify::{
    ExcitationContext, ExcitationSettings, IdentificationSettings, IdentifiedModel,
    SweepIdentification,
};
pub use model::{AliasingCompensation, DownsamplingPosition, HammersteinGroupModel};
pub use sweep::{ExcitationGenerator, SweepKind, SynchronizedSweep};
