use std::fmt;

use shared::Diagnosis;

use super::model::NUM_CLASSES;
use crate::error::InferenceError;

/// Class index -> diagnosis.
///
/// This order is fixed by how the classes were enumerated when the model was
/// trained. Nothing in the artifact records it, so it cannot be checked at
/// load time: a model trained with a different class order will be
/// mislabelled silently.
pub const CLASS_LABELS: [Diagnosis; NUM_CLASSES] = [Diagnosis::Pneumonia, Diagnosis::Normal];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub class_index: usize,
    /// Winning score as a percentage, in [0, 100].
    pub confidence: f32,
}

impl Prediction {
    pub fn label(&self) -> Diagnosis {
        CLASS_LABELS[self.class_index]
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Confidence: {:.2}%)", self.label(), self.confidence)
    }
}

/// Picks the arg-max class (lowest index wins ties) and its confidence.
pub fn interpret(scores: &[f32]) -> Result<Prediction, InferenceError> {
    if scores.len() != NUM_CLASSES {
        return Err(InferenceError::ShapeMismatch {
            expected: vec![NUM_CLASSES],
            actual: vec![scores.len()],
        });
    }
    if let Some(bad) = scores.iter().find(|s| !(0.0..=1.0).contains(*s)) {
        return Err(InferenceError::InvalidOutput(format!(
            "score {bad} is outside [0, 1]"
        )));
    }

    let (class_index, best) = scores
        .iter()
        .copied()
        .enumerate()
        .fold((0, scores[0]), |best, (index, score)| {
            if score > best.1 { (index, score) } else { best }
        });

    Ok(Prediction {
        class_index,
        confidence: best * 100.0,
    })
}
