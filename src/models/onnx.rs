//! ONNX Runtime classifier

use crate::config::ModelFormat;
use crate::models::classifier::{probability_pair, Classifier, DEFAULT_CLASS};
use crate::models::scaler::ScaledVector;
use anyhow::{anyhow, Context, Result};
use ort::memory::Allocator;
use ort::session::Session;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, Tensor};
use std::sync::Mutex;
use tracing::debug;

/// Loaded ONNX classifier with its input/output bindings.
///
/// A session run needs exclusive access, so concurrent requests serialize
/// on the session lock.
pub struct OnnxClassifier {
    name: String,
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxClassifier {
    pub(crate) fn new(name: String, session: Session, input_name: String, output_name: String) -> Self {
        Self {
            name,
            session: Mutex::new(session),
            input_name,
            output_name,
        }
    }

    /// Extract the default-class probability from model output.
    /// Handles both tensor outputs (XGBoost, RandomForest, sklearn) and
    /// seq(map) outputs (CatBoost, LightGBM, sklearn ZipMap).
    fn extract_probability(&self, outputs: &ort::session::SessionOutputs) -> Result<f64> {
        if let Some(output) = outputs.get(self.output_name.as_str()) {
            let dtype = output.dtype();

            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                let dims: Vec<i64> = shape.iter().copied().collect();
                let prob = default_prob_from_tensor(&dims, data)?;
                debug!(model = %self.name, prob = prob, "Extracted from tensor");
                return Ok(prob);
            }

            if DynSequenceValueType::can_downcast(&dtype) {
                if let Ok(prob) = self.extract_from_sequence_map(output) {
                    return Ok(prob);
                }
            }
        }

        // Fallback: any non-label output that yields a probability
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }

            let dtype = output.dtype();

            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                let dims: Vec<i64> = shape.iter().copied().collect();
                let prob = default_prob_from_tensor(&dims, data)?;
                debug!(model = %self.name, output = %name, prob = prob, "Extracted from tensor (fallback)");
                return Ok(prob);
            }

            if DynSequenceValueType::can_downcast(&dtype) {
                if let Ok(prob) = self.extract_from_sequence_map(&output) {
                    return Ok(prob);
                }
            }
        }

        Err(anyhow!(
            "model '{}' produced no probability output",
            self.name
        ))
    }

    /// Extract probability from seq(map(int64, float)) format
    fn extract_from_sequence_map(&self, output: &ort::value::DynValue) -> Result<f64> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| anyhow!("Failed to downcast to sequence: {}", e))?;

        let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;

        // batch size is always 1
        let map_value = maps.first().ok_or_else(|| anyhow!("Empty sequence"))?;
        let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;

        if let Some((_, prob)) = kv_pairs
            .iter()
            .find(|(class_id, _)| *class_id == DEFAULT_CLASS as i64)
        {
            debug!(model = %self.name, prob = *prob, "Extracted from seq(map)");
            return Ok(*prob as f64);
        }

        if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 0) {
            return Ok(1.0 - *prob as f64);
        }

        Err(anyhow!("No probability found in map"))
    }
}

/// Default-class probability from a `[batch, classes]`, `[classes]` or
/// single-probability tensor
fn default_prob_from_tensor(dims: &[i64], data: &[f32]) -> Result<f64> {
    let num_classes = match dims {
        [_, classes] | [classes] => *classes as usize,
        _ => return Err(anyhow!("unexpected probability tensor shape {:?}", dims)),
    };

    let value = match num_classes {
        0 => None,
        1 => data.first(),
        _ => data.get(DEFAULT_CLASS),
    };

    value
        .map(|&v| v as f64)
        .ok_or_else(|| anyhow!("probability tensor {:?} holds no default class", dims))
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self) -> &'static str {
        ModelFormat::Onnx.as_str()
    }

    fn predict_proba(&self, features: &ScaledVector) -> Result<[f64; 2]> {
        // Prepare input tensor - shape [1, num_features]
        let input: Vec<f32> = features.as_slice().iter().map(|&v| v as f32).collect();
        let shape = vec![1_i64, input.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, input)).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_tensor])?;

        let prob = self.extract_probability(&outputs)?;
        probability_pair(prob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_class_tensor() {
        let prob = default_prob_from_tensor(&[1, 2], &[0.8, 0.2]).unwrap();
        assert!((prob - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_single_probability_tensor() {
        let prob = default_prob_from_tensor(&[1, 1], &[0.65]).unwrap();
        assert!((prob - 0.65).abs() < 1e-6);
    }

    #[test]
    fn test_unexpected_shape_rejected() {
        assert!(default_prob_from_tensor(&[1, 2, 2], &[0.1, 0.2, 0.3, 0.4]).is_err());
        assert!(default_prob_from_tensor(&[1, 2], &[0.1]).is_err());
        assert!(default_prob_from_tensor(&[2], &[0.3, 0.7]).is_ok());
    }
}
