use std::path::Path;

use ndarray::Array4;
use tract_onnx::prelude::*;

use super::model::InferenceBackend;
use super::preprocess::{INPUT_CHANNELS, INPUT_HEIGHT, INPUT_WIDTH};
use crate::error::{InferenceError, ModelLoadError};

/// Pure-Rust ONNX runtime. The graph is typed against the fixed NHWC input
/// and optimized once at load time.
pub struct OnnxBackend {
    plan: TypedRunnableModel<TypedModel>,
}

impl OnnxBackend {
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let input_fact = InferenceFact::dt_shape(
            f32::datum_type(),
            tvec!(1, INPUT_HEIGHT, INPUT_WIDTH, INPUT_CHANNELS),
        );

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, input_fact))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| ModelLoadError::Backend(format!("{e:#}")))?;

        Ok(Self { plan })
    }
}

impl InferenceBackend for OnnxBackend {
    fn name(&self) -> &'static str {
        "onnx"
    }

    fn forward(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        let data = input
            .as_slice()
            .ok_or_else(|| InferenceError::Backend("input tensor is not contiguous".into()))?;
        let tensor = Tensor::from_shape(input.shape(), data)
            .map_err(|e| InferenceError::Backend(format!("{e:#}")))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| InferenceError::Backend(format!("{e:#}")))?;

        let scores = outputs
            .first()
            .ok_or_else(|| InferenceError::InvalidOutput("model produced no outputs".into()))?
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InvalidOutput(format!("{e:#}")))?;

        Ok(scores.iter().copied().collect())
    }
}
