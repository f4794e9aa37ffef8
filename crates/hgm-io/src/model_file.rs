//! JSON persistence for identified Hammerstein group models.
//!
//! A model file is plain data: the nonlinear family, one degree per branch,
//! the aliasing compensation with its decimation point, and the kernel
//! samples. Nothing in it is evaluated; every field is checked before a
//! model is rebuilt.

use std::path::Path;

use hgm_analysis::{AliasingCompensation, DownsamplingPosition, HammersteinGroupModel};
use hgm_core::{NonlinearFamily, NonlinearFunction, Signal};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Version written by [`save_model`] and accepted by [`load_model`].
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// On-disk form of a [`HammersteinGroupModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    /// Format version, see [`MODEL_FORMAT_VERSION`].
    pub version: u32,
    /// Basis family shared by every branch.
    pub family: NonlinearFamily,
    /// Degree of each branch, index-aligned with `kernels`.
    pub degrees: Vec<usize>,
    /// Aliasing compensation used when the model is evaluated.
    #[serde(default)]
    pub aliasing_compensation: AliasingCompensation,
    /// Where upsampled branches are decimated.
    #[serde(default)]
    pub downsampling_position: DownsamplingPosition,
    /// Sampling rate of the kernels in Hz.
    pub sampling_rate: f64,
    /// Branch kernels.
    pub kernels: Vec<KernelDocument>,
}

/// One branch kernel: a label and one sample vector per channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelDocument {
    /// Kernel label, e.g. `"Branch 2"`.
    #[serde(default)]
    pub label: String,
    /// Samples, one vector per channel.
    pub channels: Vec<Vec<f64>>,
}

impl ModelDocument {
    /// Capture a model. All branches must share one nonlinear family.
    pub fn from_model(model: &HammersteinGroupModel) -> Result<Self> {
        let family = model.functions()[0].family();
        if model.functions().iter().any(|f| f.family() != family) {
            return Err(Error::InvalidModel(
                "branches mix nonlinear families".to_string(),
            ));
        }
        let kernels = model
            .kernels()
            .iter()
            .map(|kernel| KernelDocument {
                label: kernel.labels().first().cloned().unwrap_or_default(),
                channels: kernel.channels().to_vec(),
            })
            .collect();
        Ok(Self {
            version: MODEL_FORMAT_VERSION,
            family,
            degrees: model.functions().iter().map(|f| f.degree()).collect(),
            aliasing_compensation: model.aliasing(),
            downsampling_position: model.downsampling_position(),
            sampling_rate: model.sampling_rate(),
            kernels,
        })
    }

    /// Check the document and rebuild the model it describes.
    pub fn into_model(self) -> Result<HammersteinGroupModel> {
        if self.version != MODEL_FORMAT_VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: MODEL_FORMAT_VERSION,
            });
        }
        if self.degrees.len() != self.kernels.len() {
            return Err(Error::InvalidModel(format!(
                "{} degrees for {} kernels",
                self.degrees.len(),
                self.kernels.len()
            )));
        }
        if let Some(pos) = self.degrees.iter().position(|&d| d == 0) {
            return Err(Error::InvalidModel(format!("branch {pos} has degree 0")));
        }
        let lengths: Vec<usize> = self
            .kernels
            .iter()
            .map(|k| k.channels.first().map_or(0, Vec::len))
            .collect();
        if lengths.windows(2).any(|w| w[0] != w[1]) {
            return Err(Error::InvalidModel(format!(
                "kernels have unequal lengths {lengths:?}"
            )));
        }

        let functions = self
            .degrees
            .iter()
            .map(|&d| NonlinearFunction::new(self.family, d))
            .collect();
        let kernels = self
            .kernels
            .into_iter()
            .map(|k| {
                let signal = Signal::new(k.channels, self.sampling_rate)?;
                let labels = vec![k.label; signal.num_channels()];
                signal.with_labels(labels)
            })
            .collect::<hgm_core::Result<Vec<_>>>()?;

        Ok(
            HammersteinGroupModel::new(functions, kernels, self.aliasing_compensation)?
                .with_downsampling_position(self.downsampling_position),
        )
    }
}

/// Serialize a model to a JSON string.
pub fn model_to_json(model: &HammersteinGroupModel) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ModelDocument::from_model(model)?)?)
}

/// Parse and validate a model from a JSON string.
pub fn model_from_json(json: &str) -> Result<HammersteinGroupModel> {
    serde_json::from_str::<ModelDocument>(json)?.into_model()
}

/// Write a model file.
pub fn save_model<P: AsRef<Path>>(path: P, model: &HammersteinGroupModel) -> Result<()> {
    let json = model_to_json(model)?;
    std::fs::write(path.as_ref(), json)?;
    tracing::info!(
        path = %path.as_ref().display(),
        branches = model.branches(),
        "saved model"
    );
    Ok(())
}

/// Read and validate a model file.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<HammersteinGroupModel> {
    let json = std::fs::read_to_string(path.as_ref())?;
    let model = model_from_json(&json)?;
    tracing::info!(
        path = %path.as_ref().display(),
        branches = model.branches(),
        family = %model.functions()[0].family(),
        "loaded model"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> HammersteinGroupModel {
        HammersteinGroupModel::new(
            vec![NonlinearFunction::chebyshev(1), NonlinearFunction::chebyshev(3)],
            vec![
                Signal::mono(vec![1.0, 0.5, 0.25], 48000.0)
                    .unwrap()
                    .with_labels(vec!["Branch 1".into()])
                    .unwrap(),
                Signal::mono(vec![0.1, 0.0, -0.1], 48000.0)
                    .unwrap()
                    .with_labels(vec!["Branch 3".into()])
                    .unwrap(),
            ],
            AliasingCompensation::FullUpsampling,
        )
        .unwrap()
        .with_downsampling_position(DownsamplingPosition::AfterFilter)
    }

    #[test]
    fn json_roundtrip_keeps_model() {
        let original = model();
        let restored = model_from_json(&model_to_json(&original).unwrap()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn document_uses_plain_field_names() {
        let json = model_to_json(&model()).unwrap();
        assert!(json.contains("\"family\": \"chebyshev\""));
        assert!(json.contains("\"aliasing_compensation\": \"full_upsampling\""));
        assert!(json.contains("\"downsampling_position\": \"after_filter\""));
        assert!(json.contains("\"degrees\""));
    }

    #[test]
    fn downsampling_position_defaults_when_absent() {
        let json = model_to_json(&model())
            .unwrap()
            .replace("\"downsampling_position\": \"after_filter\",", "");
        let restored = model_from_json(&json).unwrap();
        assert_eq!(
            restored.downsampling_position(),
            DownsamplingPosition::BeforeFilter
        );
    }

    #[test]
    fn kernel_samples_survive_json_exactly() {
        let samples = vec![-0.11168106301645044, 1.0 / 3.0, 2.0f64.sqrt() * 1e-7];
        let exact = HammersteinGroupModel::new(
            vec![NonlinearFunction::power(1)],
            vec![Signal::mono(samples.clone(), 48000.0).unwrap()],
            AliasingCompensation::None,
        )
        .unwrap();
        let restored = model_from_json(&model_to_json(&exact).unwrap()).unwrap();
        assert_eq!(restored.kernels()[0].channel(0).unwrap(), samples.as_slice());
    }

    #[test]
    fn rejects_unknown_version() {
        let mut doc = ModelDocument::from_model(&model()).unwrap();
        doc.version = 7;
        assert!(matches!(
            doc.into_model(),
            Err(Error::UnsupportedVersion { found: 7, .. })
        ));
    }

    #[test]
    fn rejects_degree_count_mismatch() {
        let mut doc = ModelDocument::from_model(&model()).unwrap();
        doc.degrees.push(5);
        assert!(matches!(doc.into_model(), Err(Error::InvalidModel(_))));
    }

    #[test]
    fn rejects_unequal_kernel_lengths() {
        let mut doc = ModelDocument::from_model(&model()).unwrap();
        doc.kernels[1].channels[0].push(0.0);
        assert!(matches!(doc.into_model(), Err(Error::InvalidModel(_))));
    }

    #[test]
    fn rejects_mixed_families() {
        let mixed = HammersteinGroupModel::new(
            vec![NonlinearFunction::power(1), NonlinearFunction::chebyshev(2)],
            vec![
                Signal::mono(vec![1.0], 48000.0).unwrap(),
                Signal::mono(vec![1.0], 48000.0).unwrap(),
            ],
            AliasingCompensation::None,
        )
        .unwrap();
        assert!(matches!(
            ModelDocument::from_model(&mixed),
            Err(Error::InvalidModel(_))
        ));
    }
}
