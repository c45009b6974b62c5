//! Image bytes -> decoded RGB -> normalized batch -> scores -> diagnosis.

pub mod decode;
pub mod interpret;
pub mod model;
pub mod onnx;
pub mod preprocess;
#[cfg(feature = "torch")]
pub mod torch;

pub use decode::{decode_image, decode_image_file};
pub use interpret::{CLASS_LABELS, Prediction, interpret};
pub use model::{InferenceBackend, Model, NUM_CLASSES, invoke};
pub use preprocess::{INPUT_SHAPE, ResizeFilter, preprocess};

use crate::error::PipelineError;

/// Runs one upload through the whole pipeline.
///
/// The model handle is checked first so that a missing model is reported as
/// such whatever the payload.
pub fn run(
    model: Option<&Model>,
    image_bytes: &[u8],
    filter: ResizeFilter,
) -> Result<Prediction, PipelineError> {
    if model.is_none() {
        return Err(PipelineError::ModelNotLoaded);
    }

    let image = decode_image(image_bytes)?;
    let input = preprocess(&image, filter)?;
    let scores = invoke(model, &input)?;
    Ok(interpret(&scores)?)
}
