//! HGM Core - data model for Hammerstein group model identification
//!
//! This crate holds the types every other `hgm-*` crate speaks:
//!
//! - [`Signal`] - Multichannel real samples with a sampling rate and labels
//! - [`Spectrum`] - Half spectrum of a real signal with its bin resolution
//! - [`Labelable`] - Tagged union over both, for relabeling helpers
//! - [`NonlinearFunction`] - Power-series or Chebyshev basis function
//!
//! # Example
//!
//! ```rust
//! use hgm_core::{NonlinearFamily, Signal, select_for};
//!
//! let x = Signal::mono(vec![0.0, 0.5, 1.0], 48000.0).unwrap();
//! let funcs = select_for(&[1, 2, 3], NonlinearFamily::Power);
//! let squared = funcs[1].apply(&x);
//! assert_eq!(squared.channel(0).unwrap(), &[0.0, 0.25, 1.0]);
//! ```

pub mod error;
pub mod math;
pub mod nonlinear;
pub mod signal;

pub use error::{Error, Result};
pub use math::{binomial, db_to_linear, linear_to_db};
pub use nonlinear::{NonlinearFamily, NonlinearFunction, select_for};
pub use signal::{Labelable, Signal, Spectrum, relabel_all};

/// Complex sample type used for spectra.
pub use rustfft::num_complex::Complex;
