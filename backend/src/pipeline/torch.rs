use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use tch::{CModule, Device, Kind, Tensor};

use super::model::InferenceBackend;
use super::preprocess::INPUT_SHAPE;
use crate::error::{InferenceError, ModelLoadError};

/// TorchScript module executed through libtorch, on CUDA when available.
pub struct TorchBackend {
    model: Mutex<CModule>,
    device: Device,
}

impl TorchBackend {
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let device = Device::cuda_if_available();
        let mut model = CModule::load_on_device(path, device)
            .map_err(|e| ModelLoadError::Backend(e.to_string()))?;
        model.set_eval();
        Ok(Self {
            model: Mutex::new(model),
            device,
        })
    }
}

impl InferenceBackend for TorchBackend {
    fn name(&self) -> &'static str {
        "torch"
    }

    fn forward(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        let data = input
            .as_slice()
            .ok_or_else(|| InferenceError::Backend("input tensor is not contiguous".into()))?;
        let shape = INPUT_SHAPE.map(|d| d as i64);
        let tensor = Tensor::from_slice(data).reshape(shape).to_device(self.device);

        let output = self
            .model
            .lock()
            .map_err(|_| InferenceError::Backend("torch module lock poisoned".into()))?
            .forward_ts(&[tensor])
            .map_err(|e| InferenceError::Backend(e.to_string()))?;

        let output_flat = output.to_kind(Kind::Float).to_device(Device::Cpu).view([-1]);
        let num_elements = output_flat.size()[0] as usize;
        let mut output_vec = vec![0.0f32; num_elements];
        output_flat.copy_data(&mut output_vec, num_elements);
        Ok(output_vec)
    }
}
