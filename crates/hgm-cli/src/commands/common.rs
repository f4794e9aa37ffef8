//! Shared CLI helpers used across multiple commands.

use clap::{Args, ValueEnum};
use hgm_analysis::AliasingCompensation;
use hgm_config::{IdentificationConfig, SweepMethod};
use std::path::PathBuf;

/// Sweep methods for CLI
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliMethod {
    #[default]
    Sine,
    Cosine,
}

impl From<CliMethod> for SweepMethod {
    fn from(m: CliMethod) -> Self {
        match m {
            CliMethod::Sine => SweepMethod::Sine,
            CliMethod::Cosine => SweepMethod::Cosine,
        }
    }
}

/// Aliasing compensation modes for CLI
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliAliasing {
    #[default]
    None,
    FullUpsampling,
}

impl From<CliAliasing> for AliasingCompensation {
    fn from(a: CliAliasing) -> Self {
        match a {
            CliAliasing::None => AliasingCompensation::None,
            CliAliasing::FullUpsampling => AliasingCompensation::FullUpsampling,
        }
    }
}

/// Session options shared by `excite` and `identify`.
///
/// A session file supplies the base values; flags given on the command
/// line override it.
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Session TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Sweep method
    #[arg(long, value_enum)]
    pub method: Option<CliMethod>,

    /// Branches to identify, e.g. 1,2,3
    #[arg(long, value_delimiter = ',')]
    pub branches: Option<Vec<usize>>,

    /// Approximate excitation length in samples
    #[arg(long)]
    pub length: Option<usize>,

    /// Sample rate in Hz
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Sweep start frequency in Hz
    #[arg(long)]
    pub start: Option<f64>,

    /// Sweep stop frequency in Hz
    #[arg(long)]
    pub end: Option<f64>,
}

impl SessionArgs {
    /// Build the session from the config file (if any) and the flags.
    pub fn resolve(&self) -> anyhow::Result<IdentificationConfig> {
        let mut config = match &self.config {
            Some(path) => IdentificationConfig::load(path)?,
            None => IdentificationConfig::new(SweepMethod::default(), vec![1, 2, 3]),
        };
        if let Some(method) = self.method {
            config.method = method.into();
        }
        if let Some(branches) = &self.branches {
            config.branches.clone_from(branches);
        }
        if let Some(length) = self.length {
            config.excitation.length = length;
        }
        if let Some(rate) = self.sample_rate {
            config.excitation.sampling_rate = f64::from(rate);
        }
        if let Some(start) = self.start {
            config.excitation.start_freq = start;
        }
        if let Some(end) = self.end {
            config.excitation.stop_freq = end;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Format a branch list as `1, 2, 3`.
pub fn format_branches(branches: &[usize]) -> String {
    branches
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
