//! Session file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use hgm_analysis::{
    AliasingCompensation, ExcitationSettings, IdentificationSettings, SweepIdentification,
};

use crate::error::ConfigError;
use crate::validation::validate_session;

/// Sweep variant, and with it the nonlinear basis of the identified model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepMethod {
    /// Sine sweep, power-series branches.
    #[default]
    Sine,
    /// Cosine sweep, Chebyshev branches.
    Cosine,
}

/// One identification session.
///
/// # TOML Format
///
/// ```toml
/// method = "sine"
/// branches = [1, 2, 3]
/// filter_length = 2048
/// aliasing_compensation = "full_upsampling"
///
/// [excitation]
/// length = 65536
/// sampling_rate = 48000.0
/// start_freq = 20.0
/// stop_freq = 20000.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentificationConfig {
    /// Sweep variant.
    #[serde(default)]
    pub method: SweepMethod,

    /// Branches to identify, in output order.
    pub branches: Vec<usize>,

    /// Kernel length in samples; omitted keeps the natural estimation length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_length: Option<usize>,

    /// Aliasing compensation for the identified model.
    #[serde(default)]
    pub aliasing_compensation: AliasingCompensation,

    /// Sweep parameters.
    #[serde(default)]
    pub excitation: ExcitationSettings,
}

impl IdentificationConfig {
    /// Create a session with default excitation.
    pub fn new(method: SweepMethod, branches: Vec<usize>) -> Self {
        Self {
            method,
            branches,
            filter_length: None,
            aliasing_compensation: AliasingCompensation::None,
            excitation: ExcitationSettings::default(),
        }
    }

    /// Set the kernel length.
    pub fn with_filter_length(mut self, filter_length: usize) -> Self {
        self.filter_length = Some(filter_length);
        self
    }

    /// Set the aliasing compensation.
    pub fn with_aliasing_compensation(mut self, aliasing: AliasingCompensation) -> Self {
        self.aliasing_compensation = aliasing;
        self
    }

    /// Replace the excitation parameters.
    pub fn with_excitation(mut self, excitation: ExcitationSettings) -> Self {
        self.excitation = excitation;
        self
    }

    /// Load a session from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a session from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the session to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the session to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(validate_session(self)?)
    }

    /// Pipeline settings for this session.
    pub fn settings(&self) -> IdentificationSettings {
        IdentificationSettings {
            select_branches: self.branches.clone(),
            filter_length: self.filter_length,
            excitation: self.excitation.clone(),
        }
    }

    /// Validate and build the identification pipeline.
    pub fn to_identification(&self) -> Result<SweepIdentification, ConfigError> {
        self.validate()?;
        let identification = match self.method {
            SweepMethod::Sine => SweepIdentification::sine(self.settings()),
            SweepMethod::Cosine => SweepIdentification::cosine(self.settings()),
        };
        Ok(identification?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config = IdentificationConfig::from_toml("branches = [1, 3]").unwrap();
        assert_eq!(config.method, SweepMethod::Sine);
        assert_eq!(config.filter_length, None);
        assert_eq!(config.aliasing_compensation, AliasingCompensation::None);
        assert_eq!(config.excitation, ExcitationSettings::default());
    }

    #[test]
    fn partial_excitation_table() {
        let config = IdentificationConfig::from_toml(
            r#"
            method = "cosine"
            branches = [2]
            [excitation]
            stop_freq = 8000.0
            "#,
        )
        .unwrap();
        assert_eq!(config.method, SweepMethod::Cosine);
        assert_eq!(config.excitation.stop_freq, 8000.0);
        assert_eq!(config.excitation.start_freq, 20.0);
    }

    #[test]
    fn toml_roundtrip() {
        let config = IdentificationConfig::new(SweepMethod::Cosine, vec![3, 1, 5])
            .with_filter_length(1024)
            .with_aliasing_compensation(AliasingCompensation::FullUpsampling);
        let restored = IdentificationConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn unknown_method_is_rejected() {
        assert!(matches!(
            IdentificationConfig::from_toml("method = \"triangle\"\nbranches = [1]"),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn builds_matching_pipeline() {
        let config = IdentificationConfig::new(SweepMethod::Cosine, vec![1, 2]);
        let identification = config.to_identification().unwrap();
        assert!(matches!(identification, SweepIdentification::CosineSweep(_)));
        assert_eq!(identification.settings().select_branches, vec![1, 2]);
    }
}
