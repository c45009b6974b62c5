use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("Model file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Unsupported model format: {0:?}")]
    UnsupportedFormat(String),
    #[error("The {0} backend is not compiled into this build")]
    BackendUnavailable(&'static str),
    #[error("Backend failed to load model: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidImageError {
    #[error("Image payload is empty")]
    Empty,
    #[error("Image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Image has a zero dimension ({width}x{height})")]
    ZeroDimension { width: u32, height: u32 },
    #[error("Image could not be read: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("Model output is not a valid score vector: {0}")]
    InvalidOutput(String),
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Everything a single prediction can fail with.
///
/// The display strings are the user-facing messages; the wrapped causes are
/// kept for logging.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid image file")]
    InvalidImage(#[from] InvalidImageError),
    #[error("Model not loaded")]
    ModelNotLoaded,
    #[error("Error processing image")]
    Inference(#[from] InferenceError),
}

impl PipelineError {
    /// Underlying cause, for log lines.
    pub fn detail(&self) -> String {
        match self {
            PipelineError::InvalidImage(e) => e.to_string(),
            PipelineError::ModelNotLoaded => "prediction requested without a loaded model".into(),
            PipelineError::Inference(e) => e.to_string(),
        }
    }
}
