//! Identification session configuration.
//!
//! A session file describes one measurement: which sweep to use, which
//! branches to identify, the kernel length and the excitation parameters.
//!
//! # Features
//!
//! - **Session files**: Load and save [`IdentificationConfig`] as TOML
//! - **Validation**: Check branch selection and sweep parameters before a
//!   measurement is started
//!
//! # Example
//!
//! ```rust,no_run
//! use hgm_config::{IdentificationConfig, SweepMethod};
//!
//! // Load a session from file
//! let config = IdentificationConfig::load("speaker.toml").unwrap();
//!
//! // Or build one programmatically
//! let config = IdentificationConfig::new(SweepMethod::Cosine, vec![1, 2, 3])
//!     .with_filter_length(4096);
//! config.save("speaker.toml").unwrap();
//!
//! let identification = config.to_identification().unwrap();
//! ```

mod error;
mod session;

/// Session validation.
pub mod validation;

pub use error::ConfigError;
pub use session::{IdentificationConfig, SweepMethod};
pub use validation::{ValidationError, ValidationResult, validate_session};
