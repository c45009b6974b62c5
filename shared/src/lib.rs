use serde::{Deserialize, Serialize};
use strum_macros::Display;

pub const MODEL_TYPE: &str = "Pneumonia Detection Model";

/// Outcome of a chest X-ray classification.
///
/// The `Display` text is what clients see inside the prediction string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Diagnosis {
    #[strum(serialize = "Pneumonia Detected")]
    Pneumonia,
    #[strum(serialize = "Normal")]
    Normal,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictResponse {
    pub prediction: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model_type: String,
}

impl HealthResponse {
    pub fn new(model_loaded: bool) -> Self {
        Self {
            status: "healthy".into(),
            model_loaded,
            model_type: MODEL_TYPE.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnosis_display_matches_client_labels() {
        assert_eq!(Diagnosis::Pneumonia.to_string(), "Pneumonia Detected");
        assert_eq!(Diagnosis::Normal.to_string(), "Normal");
    }

    #[test]
    fn health_response_serializes_expected_fields() {
        let value = serde_json::to_value(HealthResponse::new(false)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "status": "healthy",
                "model_loaded": false,
                "model_type": "Pneumonia Detection Model"
            })
        );
    }
}
