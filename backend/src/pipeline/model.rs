use std::path::{Path, PathBuf};
use std::time::Instant;

use ndarray::Array4;

use super::onnx::OnnxBackend;
use super::preprocess::INPUT_SHAPE;
use crate::error::{InferenceError, ModelLoadError, PipelineError};

/// Number of scores the classifier head emits.
pub const NUM_CLASSES: usize = 2;

/// A runtime able to execute the classifier's forward pass.
///
/// Implementations receive a tensor already validated against [`INPUT_SHAPE`]
/// and return the raw output scores, flattened.
pub trait InferenceBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn forward(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError>;
}

/// Loaded classifier. Immutable once constructed and shared read-only
/// between requests.
pub struct Model {
    backend: Box<dyn InferenceBackend>,
    source: Option<PathBuf>,
}

impl Model {
    /// Loads a serialized model, choosing the runtime from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ModelLoadError::NotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let started = Instant::now();
        let backend: Box<dyn InferenceBackend> = match extension.as_str() {
            "onnx" => Box::new(OnnxBackend::load(path)?),
            "pt" | "pth" | "ts" => load_torchscript(path)?,
            other => return Err(ModelLoadError::UnsupportedFormat(other.to_string())),
        };

        log::info!(
            "Loaded {} model from {} in {:?}",
            backend.name(),
            path.display(),
            started.elapsed()
        );

        Ok(Self {
            backend,
            source: Some(path.to_path_buf()),
        })
    }

    /// Wraps an already constructed backend.
    pub fn from_backend(backend: impl InferenceBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            source: None,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Runs the forward pass, enforcing the (1, 224, 224, 3) -> 2 contract.
    pub fn predict(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        if input.shape() != INPUT_SHAPE {
            return Err(InferenceError::ShapeMismatch {
                expected: INPUT_SHAPE.to_vec(),
                actual: input.shape().to_vec(),
            });
        }

        let output = self.backend.forward(input)?;
        if output.len() != NUM_CLASSES {
            return Err(InferenceError::ShapeMismatch {
                expected: vec![1, NUM_CLASSES],
                actual: vec![output.len()],
            });
        }
        Ok(output)
    }
}

/// Invokes the model on a preprocessed batch. An absent handle is reported,
/// never dereferenced.
pub fn invoke(model: Option<&Model>, input: &Array4<f32>) -> Result<Vec<f32>, PipelineError> {
    let model = model.ok_or(PipelineError::ModelNotLoaded)?;
    let started = Instant::now();
    let output = model.predict(input)?;
    log::debug!("{} forward pass took {:?}", model.backend_name(), started.elapsed());
    Ok(output)
}

#[cfg(feature = "torch")]
fn load_torchscript(path: &Path) -> Result<Box<dyn InferenceBackend>, ModelLoadError> {
    Ok(Box::new(super::torch::TorchBackend::load(path)?))
}

#[cfg(not(feature = "torch"))]
fn load_torchscript(_path: &Path) -> Result<Box<dyn InferenceBackend>, ModelLoadError> {
    Err(ModelLoadError::BackendUnavailable("torch"))
}
