//! Sweep-based identification of Hammerstein group models
//!
//! The pipeline runs in a fixed order:
//!
//! 1. [`SweepIdentification::excitation`] builds the sweep and returns an
//!    [`ExcitationContext`]. The device under test is driven with
//!    [`ExcitationContext::excitation`] and its response recorded.
//! 2. [`SweepIdentification::identify`] consumes the context and the response:
//!    [`deconvolve::estimate`] recovers the circular impulse response,
//!    [`branches::extract`] cuts out one harmonic per branch, and either
//!    [`recombine::recombine`] (sine sweep) or [`split::split`] (cosine sweep)
//!    turns harmonics into kernels, which [`length::normalize`] brings to the
//!    requested length.
//!
//! Identification needs a context, so extracting kernels before an
//! excitation exists cannot be written.
//!
//! # Example
//!
//! ```rust
//! use hgm_analysis::identify::{IdentificationSettings, SweepIdentification};
//! use hgm_analysis::AliasingCompensation;
//!
//! let settings = IdentificationSettings::new(vec![1, 2, 3])
//!     .with_excitation_length(2usize.pow(14))
//!     .with_frequency_range(20.0, 24000.0);
//! let identification = SweepIdentification::sine(settings).unwrap();
//!
//! let context = identification.excitation().unwrap();
//! // a memoryless device: y = x + 0.1·x²
//! let response = context.excitation().map(|x| x + 0.1 * x * x);
//!
//! let identified = identification.identify(&context, &response).unwrap();
//! assert_eq!(identified.kernels().len(), 3);
//! let model = identified.into_model(AliasingCompensation::None).unwrap();
//! assert_eq!(model.branches(), 3);
//! ```

pub mod branches;
pub mod deconvolve;
pub mod length;
pub mod recombine;
pub mod split;

use hgm_core::{Labelable, NonlinearFamily, NonlinearFunction, Signal, relabel_all, select_for};
use serde::{Deserialize, Serialize};

use crate::error::{IdentificationError, Result};
use crate::fft;
use crate::harmonic::{HarmonicWindower, NovakHarmonicWindower};
use crate::model::{AliasingCompensation, HammersteinGroupModel};
use crate::sweep::{ExcitationGenerator, SweepKind, SynchronizedSweep};

/// Sweep parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcitationSettings {
    /// Approximate sweep length in samples.
    pub length: usize,
    /// Sampling rate in Hz.
    pub sampling_rate: f64,
    /// Start frequency in Hz.
    pub start_freq: f64,
    /// Stop frequency in Hz.
    pub stop_freq: f64,
}

impl Default for ExcitationSettings {
    fn default() -> Self {
        Self {
            length: 65536,
            sampling_rate: 48000.0,
            start_freq: 20.0,
            stop_freq: 20000.0,
        }
    }
}

/// Everything an identification run needs besides the response.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentificationSettings {
    /// Branches to return, in the order they should appear.
    pub select_branches: Vec<usize>,
    /// Kernel length; `None` keeps the natural estimation length.
    pub filter_length: Option<usize>,
    /// Sweep parameters.
    pub excitation: ExcitationSettings,
}

impl IdentificationSettings {
    /// Settings for the given branches with default excitation.
    pub fn new(select_branches: Vec<usize>) -> Self {
        Self {
            select_branches,
            filter_length: None,
            excitation: ExcitationSettings::default(),
        }
    }

    /// Set the kernel length.
    pub fn with_filter_length(mut self, filter_length: usize) -> Self {
        self.filter_length = Some(filter_length);
        self
    }

    /// Set the approximate excitation length.
    pub fn with_excitation_length(mut self, length: usize) -> Self {
        self.excitation.length = length;
        self
    }

    /// Set the excitation sampling rate.
    pub fn with_sampling_rate(mut self, sampling_rate: f64) -> Self {
        self.excitation.sampling_rate = sampling_rate;
        self
    }

    /// Set the sweep start and stop frequencies.
    pub fn with_frequency_range(mut self, start_freq: f64, stop_freq: f64) -> Self {
        self.excitation.start_freq = start_freq;
        self.excitation.stop_freq = stop_freq;
        self
    }

    /// Highest selected branch, i.e. the number of harmonics to separate.
    pub fn branches(&self) -> usize {
        self.select_branches.iter().copied().max().unwrap_or(0)
    }

    /// Check the branch selection.
    pub fn validate(&self) -> Result<()> {
        if self.select_branches.is_empty() {
            return Err(IdentificationError::EmptyBranchSelection);
        }
        if self.select_branches.contains(&0) {
            return Err(IdentificationError::BranchOutOfRange {
                branch: 0,
                available: self.branches(),
            });
        }
        Ok(())
    }
}

/// The sweep, its inverse filter and the generator that produced them.
///
/// Returned by [`SweepIdentification::excitation`] and required by
/// [`SweepIdentification::identify`].
pub struct ExcitationContext {
    generator: Box<dyn ExcitationGenerator>,
    excitation: Signal,
    reversed: Signal,
}

impl ExcitationContext {
    /// Wrap any excitation generator.
    pub fn new(generator: Box<dyn ExcitationGenerator>) -> Self {
        let excitation = generator.output();
        let reversed = generator.reversed_output();
        Self {
            generator,
            excitation,
            reversed,
        }
    }

    /// The signal to play into the device under test.
    pub fn excitation(&self) -> &Signal {
        &self.excitation
    }

    /// The deconvolution filter matching [`excitation`](Self::excitation).
    pub fn reversed_excitation(&self) -> &Signal {
        &self.reversed
    }

    /// The generator behind this context.
    pub fn generator(&self) -> &dyn ExcitationGenerator {
        self.generator.as_ref()
    }
}

impl core::fmt::Debug for ExcitationContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ExcitationContext")
            .field("kind", &self.generator.kind())
            .field("length", &self.generator.length())
            .field("sampling_rate", &self.generator.sampling_rate())
            .field("sweep_rate", &self.generator.sweep_rate())
            .finish()
    }
}

/// Kernels and nonlinear functions of an identified model, index-aligned and
/// in `select_branches` order.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifiedModel {
    kernels: Vec<Signal>,
    nonlinear_functions: Vec<NonlinearFunction>,
}

impl IdentifiedModel {
    /// Filter kernels.
    pub fn kernels(&self) -> &[Signal] {
        &self.kernels
    }

    /// Nonlinear functions.
    pub fn nonlinear_functions(&self) -> &[NonlinearFunction] {
        &self.nonlinear_functions
    }

    /// Split into kernels and functions.
    pub fn into_parts(self) -> (Vec<Signal>, Vec<NonlinearFunction>) {
        (self.kernels, self.nonlinear_functions)
    }

    /// Build an evaluable model.
    pub fn into_model(self, aliasing: AliasingCompensation) -> Result<HammersteinGroupModel> {
        HammersteinGroupModel::new(self.nonlinear_functions, self.kernels, aliasing)
    }
}

/// Sweep-based identification, sine or cosine.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepIdentification {
    /// Synchronized sine sweep; power-series branches recovered through the
    /// harmonic combination matrix.
    SineSweep(IdentificationSettings),
    /// Synchronized cosine sweep; Chebyshev branches map one-to-one onto
    /// harmonics.
    CosineSweep(IdentificationSettings),
}

impl SweepIdentification {
    /// Sine-sweep identification.
    pub fn sine(settings: IdentificationSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::SineSweep(settings))
    }

    /// Cosine-sweep identification.
    pub fn cosine(settings: IdentificationSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::CosineSweep(settings))
    }

    /// Run settings.
    pub fn settings(&self) -> &IdentificationSettings {
        match self {
            Self::SineSweep(s) | Self::CosineSweep(s) => s,
        }
    }

    /// Sweep variant this identification expects.
    pub fn kind(&self) -> SweepKind {
        match self {
            Self::SineSweep(_) => SweepKind::Sine,
            Self::CosineSweep(_) => SweepKind::Cosine,
        }
    }

    /// Basis family of the identified branches.
    pub fn family(&self) -> NonlinearFamily {
        match self {
            Self::SineSweep(_) => NonlinearFamily::Power,
            Self::CosineSweep(_) => NonlinearFamily::Chebyshev,
        }
    }

    /// Nonlinear functions for the selected branches, in selection order.
    pub fn nonlinear_functions(&self) -> Vec<NonlinearFunction> {
        select_for(&self.settings().select_branches, self.family())
    }

    /// Generate the excitation.
    pub fn excitation(&self) -> Result<ExcitationContext> {
        let e = &self.settings().excitation;
        let sweep =
            SynchronizedSweep::new(self.kind(), e.sampling_rate, e.length, e.start_freq, e.stop_freq)?;
        tracing::info!(
            kind = %self.kind(),
            length = sweep.length(),
            sweep_rate = sweep.sweep_rate(),
            "generated excitation"
        );
        Ok(ExcitationContext::new(Box::new(sweep)))
    }

    /// Identify kernels from the response to `context`'s excitation.
    pub fn identify(&self, context: &ExcitationContext, response: &Signal) -> Result<IdentifiedModel> {
        self.identify_with(context, response, &NovakHarmonicWindower)
    }

    /// [`identify`](Self::identify) with a custom harmonic windower.
    pub fn identify_with(
        &self,
        context: &ExcitationContext,
        response: &Signal,
        windower: &dyn HarmonicWindower,
    ) -> Result<IdentifiedModel> {
        let settings = self.settings();
        settings.validate()?;
        let generator = context.generator();
        if generator.kind() != self.kind() {
            return Err(IdentificationError::ExcitationKindMismatch {
                expected: self.kind().to_string(),
                found: generator.kind().to_string(),
            });
        }

        let branches = settings.branches();
        let impulse_response =
            deconvolve::estimate(context.excitation(), context.reversed_excitation(), response)?;
        let merged = branches::extract(&impulse_response, branches, generator, windower)?;

        let all_kernels = match self {
            Self::SineSweep(_) => {
                let spectrum = fft::forward(&merged)?;
                let harmonics = split::split_spectrum(&spectrum, branches)?;
                recombine::recombine(&harmonics, branches)?
            }
            Self::CosineSweep(_) => split::split(&merged, branches)?,
        };

        let selected = settings
            .select_branches
            .iter()
            .map(|&branch| {
                all_kernels
                    .get(branch - 1)
                    .map(|k| Labelable::from(length::normalize(k, settings.filter_length)))
                    .ok_or(IdentificationError::BranchOutOfRange {
                        branch,
                        available: all_kernels.len(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        let labels: Vec<String> = settings
            .select_branches
            .iter()
            .map(|b| format!("Branch {b}"))
            .collect();
        let kernels: Vec<Signal> = relabel_all(selected, &labels)
            .into_iter()
            .filter_map(Labelable::into_signal)
            .collect();

        tracing::info!(
            kind = %self.kind(),
            branches = kernels.len(),
            kernel_length = kernels.first().map_or(0, Signal::len),
            "identified kernels"
        );

        Ok(IdentifiedModel {
            kernels,
            nonlinear_functions: self.nonlinear_functions(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(branches: Vec<usize>) -> IdentificationSettings {
        IdentificationSettings::new(branches)
            .with_excitation_length(2usize.pow(14))
            .with_frequency_range(20.0, 24000.0)
    }

    #[test]
    fn rejects_empty_and_zero_branches() {
        assert_eq!(
            SweepIdentification::sine(small(vec![])),
            Err(IdentificationError::EmptyBranchSelection)
        );
        assert!(matches!(
            SweepIdentification::cosine(small(vec![1, 0])),
            Err(IdentificationError::BranchOutOfRange { branch: 0, .. })
        ));
    }

    #[test]
    fn functions_follow_selection() {
        let sine = SweepIdentification::sine(small(vec![3, 1, 5])).unwrap();
        let degrees: Vec<usize> = sine.nonlinear_functions().iter().map(|f| f.degree()).collect();
        assert_eq!(degrees, vec![3, 1, 5]);
        assert_eq!(sine.family(), NonlinearFamily::Power);
        let cosine = SweepIdentification::cosine(small(vec![2])).unwrap();
        assert_eq!(cosine.family(), NonlinearFamily::Chebyshev);
        assert_eq!(small(vec![3, 1, 5]).branches(), 5);
    }

    #[test]
    fn context_from_other_variant_is_rejected() {
        let sine = SweepIdentification::sine(small(vec![1])).unwrap();
        let cosine = SweepIdentification::cosine(small(vec![1])).unwrap();
        let context = cosine.excitation().unwrap();
        let response = context.excitation().clone();
        assert!(matches!(
            sine.identify(&context, &response),
            Err(IdentificationError::ExcitationKindMismatch { .. })
        ));
    }

    #[test]
    fn kernels_are_labeled_by_branch() {
        let identification = SweepIdentification::cosine(small(vec![2, 1])).unwrap();
        let context = identification.excitation().unwrap();
        let response = context.excitation().clone();
        let model = identification.identify(&context, &response).unwrap();
        assert_eq!(model.kernels()[0].labels(), &["Branch 2".to_string()]);
        assert_eq!(model.kernels()[1].labels(), &["Branch 1".to_string()]);
    }

    #[test]
    fn filter_length_is_applied() {
        let identification =
            SweepIdentification::sine(small(vec![1, 2]).with_filter_length(256)).unwrap();
        let context = identification.excitation().unwrap();
        let response = context.excitation().clone();
        let model = identification.identify(&context, &response).unwrap();
        assert!(model.kernels().iter().all(|k| k.len() == 256));
    }

    #[test]
    fn invalid_sweep_is_reported_at_excitation() {
        let settings = IdentificationSettings::new(vec![1]).with_frequency_range(20.0, 30000.0);
        let identification = SweepIdentification::sine(settings).unwrap();
        assert!(matches!(
            identification.excitation(),
            Err(IdentificationError::InvalidExcitation(_))
        ));
    }
}
