//! File I/O for Hammerstein group model identification.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_signal`] and [`write_signal`] for multichannel
//!   excitations, recordings and kernels
//! - **Model files**: [`save_model`] and [`load_model`] for identified
//!   [`HammersteinGroupModel`](hgm_analysis::HammersteinGroupModel)s
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hgm_io::{read_signal, save_model, write_signal};
//!
//! write_signal("sweep.wav", context.excitation(), 32)?;
//! // play sweep.wav through the device, record response.wav
//! let response = read_signal("response.wav")?;
//! let model = identification.identify(&context, &response)?.into_model(aliasing)?;
//! save_model("device.json", &model)?;
//! ```

mod model_file;
mod wav;

pub use model_file::{
    KernelDocument, MODEL_FORMAT_VERSION, ModelDocument, load_model, model_from_json,
    model_to_json, save_model,
};
pub use wav::{WavFormat, WavInfo, read_signal, read_wav_info, write_signal};

/// Error types for file I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Model file is not valid JSON or does not match the schema.
    #[error("Model file error: {0}")]
    Json(#[from] serde_json::Error),

    /// Model file was written by an unknown format version.
    #[error("Unsupported model format version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version stored in the file.
        found: u32,
        /// Version this crate reads.
        expected: u32,
    },

    /// Model file parses but describes an inconsistent model.
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Samples could not form a valid signal.
    #[error("Signal error: {0}")]
    Signal(#[from] hgm_core::Error),

    /// Model parts were rejected by the evaluator.
    #[error("Model error: {0}")]
    Identification(#[from] hgm_analysis::IdentificationError),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for file I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
