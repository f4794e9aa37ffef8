//! Errors raised while loading, saving and checking session files.

use std::path::PathBuf;
use thiserror::Error;

/// Session file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Session file could not be read
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Session file could not be written
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Session file is not valid TOML for a session
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Session failed validation
    #[error("validation failed: {0}")]
    Validation(#[from] crate::validation::ValidationError),

    /// The identification pipeline rejected the session
    #[error("identification setup failed: {0}")]
    Identification(#[from] hgm_analysis::IdentificationError),

    /// Parent directory of a session file could not be created
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn not_found() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "no such session")
    }

    #[test]
    fn io_errors_name_the_session_path() {
        let cases = [
            (ConfigError::read_file("/s/amp.toml", not_found()), "failed to read file"),
            (ConfigError::write_file("/s/amp.toml", not_found()), "failed to write file"),
            (ConfigError::create_dir("/s", not_found()), "failed to create directory"),
        ];
        for (err, prefix) in cases {
            let msg = err.to_string();
            assert!(msg.starts_with(prefix), "got: {msg}");
            assert!(msg.contains("/s"), "got: {msg}");
            assert!(msg.contains("no such session"), "got: {msg}");
            assert!(err.source().is_some());
        }
    }

    #[test]
    fn malformed_session_is_toml_parse_error() {
        let parse = toml::from_str::<crate::IdentificationConfig>("branches = \"1,2\"");
        let err = ConfigError::from(parse.unwrap_err());
        assert!(matches!(err, ConfigError::TomlParse(_)));
        assert!(err.to_string().starts_with("failed to parse TOML"));
    }

    #[test]
    fn rejected_session_keeps_its_cause() {
        let err = ConfigError::from(crate::validation::ValidationError::EmptyBranches);
        assert!(err.to_string().starts_with("validation failed:"));
        assert!(err.source().is_some());

        let err = ConfigError::from(hgm_analysis::IdentificationError::EmptyBranchSelection);
        assert!(err.to_string().starts_with("identification setup failed:"));
    }
}
