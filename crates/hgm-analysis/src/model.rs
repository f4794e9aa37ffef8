//! Hammerstein group model evaluation
//!
//! A Hammerstein group model is a bank of parallel branches. Branch `b`
//! applies a static nonlinearity `f_b` and then a linear filter `h_b`; the
//! model output is `Σ_b h_b * f_b(x)`.

use hgm_core::{NonlinearFunction, Signal};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{IdentificationError, Result};
use crate::fft::convolve;
use crate::resample::{decimate, interpolate};

/// How a branch guards against harmonics folding back past Nyquist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasingCompensation {
    /// Apply the nonlinearity at the input rate.
    #[default]
    None,
    /// Upsample by the branch degree before the nonlinearity and decimate
    /// after it.
    FullUpsampling,
}

impl core::fmt::Display for AliasingCompensation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AliasingCompensation::None => f.write_str("none"),
            AliasingCompensation::FullUpsampling => f.write_str("full_upsampling"),
        }
    }
}

/// Where an upsampled branch returns to the input rate.
///
/// Only meaningful with [`AliasingCompensation::FullUpsampling`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownsamplingPosition {
    /// Decimate right after the nonlinearity and filter at the input rate.
    #[default]
    BeforeFilter,
    /// Filter at the upsampled rate with a zero-stuffed kernel, then decimate.
    AfterFilter,
}

impl core::fmt::Display for DownsamplingPosition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DownsamplingPosition::BeforeFilter => f.write_str("before_filter"),
            DownsamplingPosition::AfterFilter => f.write_str("after_filter"),
        }
    }
}

/// Parallel bank of nonlinearity → filter branches.
#[derive(Debug, Clone, PartialEq)]
pub struct HammersteinGroupModel {
    functions: Vec<NonlinearFunction>,
    kernels: Vec<Signal>,
    aliasing: AliasingCompensation,
    downsampling: DownsamplingPosition,
}

impl HammersteinGroupModel {
    /// Build a model from index-aligned functions and kernels.
    ///
    /// Kernels must share one sampling rate. Each kernel is either mono
    /// (applied to every input channel) or has one channel per input channel.
    pub fn new(
        functions: Vec<NonlinearFunction>,
        kernels: Vec<Signal>,
        aliasing: AliasingCompensation,
    ) -> Result<Self> {
        if functions.is_empty() {
            return Err(IdentificationError::InvalidModel(
                "a model needs at least one branch".into(),
            ));
        }
        if functions.len() != kernels.len() {
            return Err(IdentificationError::InvalidModel(format!(
                "{} nonlinear functions for {} kernels",
                functions.len(),
                kernels.len()
            )));
        }
        let rate = kernels[0].sampling_rate();
        if let Some(k) = kernels.iter().find(|k| k.sampling_rate() != rate) {
            return Err(IdentificationError::InvalidModel(format!(
                "kernels sampled at {} Hz and {} Hz",
                rate,
                k.sampling_rate()
            )));
        }
        Ok(Self {
            functions,
            kernels,
            aliasing,
            downsampling: DownsamplingPosition::default(),
        })
    }

    /// Set where upsampled branches are decimated.
    pub fn with_downsampling_position(mut self, downsampling: DownsamplingPosition) -> Self {
        self.downsampling = downsampling;
        self
    }

    /// Nonlinear functions, one per branch.
    pub fn functions(&self) -> &[NonlinearFunction] {
        &self.functions
    }

    /// Filter kernels, one per branch.
    pub fn kernels(&self) -> &[Signal] {
        &self.kernels
    }

    /// Aliasing compensation applied in [`process`](Self::process).
    pub fn aliasing(&self) -> AliasingCompensation {
        self.aliasing
    }

    /// Decimation point of upsampled branches.
    pub fn downsampling_position(&self) -> DownsamplingPosition {
        self.downsampling
    }

    /// Number of branches.
    pub fn branches(&self) -> usize {
        self.functions.len()
    }

    /// Sampling rate of the kernels.
    pub fn sampling_rate(&self) -> f64 {
        self.kernels[0].sampling_rate()
    }

    /// Run `input` through the model.
    ///
    /// The output has the input's length, channel count and labels; the
    /// convolution tails are discarded.
    pub fn process(&self, input: &Signal) -> Result<Signal> {
        if input.sampling_rate() != self.sampling_rate() {
            return Err(IdentificationError::InputMismatch(format!(
                "input sampled at {} Hz, model at {} Hz",
                input.sampling_rate(),
                self.sampling_rate()
            )));
        }
        for kernel in &self.kernels {
            let k = kernel.num_channels();
            if k != 1 && k != input.num_channels() {
                return Err(IdentificationError::InputMismatch(format!(
                    "{k}-channel kernel cannot filter a {}-channel input",
                    input.num_channels()
                )));
            }
        }

        let len = input.len();
        let branch_outputs: Vec<Vec<Vec<f64>>> = self
            .functions
            .par_iter()
            .zip(self.kernels.par_iter())
            .map(|(function, kernel)| {
                let kernel_for =
                    move |c: usize| kernel.channel(c).or_else(|| kernel.channel(0)).unwrap_or(&[]);
                let factor = function.degree().max(1);
                if self.aliasing == AliasingCompensation::FullUpsampling
                    && self.downsampling == DownsamplingPosition::AfterFilter
                    && factor > 1
                {
                    return input
                        .channels()
                        .iter()
                        .enumerate()
                        .map(|(c, ch)| filter_upsampled(ch, kernel_for(c), *function, factor))
                        .collect();
                }
                self.shape(input, *function)
                    .iter()
                    .enumerate()
                    .map(|(c, ch)| {
                        let mut y = convolve(ch, kernel_for(c));
                        y.resize(len, 0.0);
                        y
                    })
                    .collect()
            })
            .collect();

        let mut output = vec![vec![0.0; len]; input.num_channels()];
        for branch in &branch_outputs {
            for (acc, ch) in output.iter_mut().zip(branch) {
                for (a, &y) in acc.iter_mut().zip(ch) {
                    *a += y;
                }
            }
        }

        tracing::debug!(
            branches = self.branches(),
            samples = len,
            aliasing = %self.aliasing,
            downsampling = %self.downsampling,
            "processed signal through model"
        );

        Ok(Signal::new(output, input.sampling_rate())?.with_labels(input.labels().to_vec())?)
    }

    fn shape(&self, input: &Signal, function: NonlinearFunction) -> Vec<Vec<f64>> {
        match self.aliasing {
            AliasingCompensation::None => function.apply(input).into_channels(),
            AliasingCompensation::FullUpsampling => {
                let factor = function.degree().max(1);
                input
                    .channels()
                    .iter()
                    .map(|ch| {
                        let up: Vec<f64> = interpolate(ch, factor, 0)
                            .into_iter()
                            .map(|x| function.evaluate(x))
                            .collect();
                        decimate(&up, factor, 0)
                    })
                    .collect()
            }
        }
    }
}

/// Nonlinearity and filter both at `factor` times the input rate.
///
/// The kernel is zero-stuffed, so its response below the input Nyquist is
/// unchanged and the decimation filter removes its images.
fn filter_upsampled(
    channel: &[f64],
    kernel: &[f64],
    function: NonlinearFunction,
    factor: usize,
) -> Vec<f64> {
    let shaped: Vec<f64> = interpolate(channel, factor, 0)
        .into_iter()
        .map(|x| function.evaluate(x))
        .collect();
    let mut stuffed = vec![0.0; kernel.len() * factor];
    for (i, &h) in kernel.iter().enumerate() {
        stuffed[i * factor] = h;
    }
    let mut y = convolve(&shaped, &stuffed);
    y.truncate(shaped.len());
    let mut y = decimate(&y, factor, 0);
    y.resize(channel.len(), 0.0);
    y
}
