//! Binary classifier interface and the JSON logistic regression model

use crate::config::ModelFormat;
use crate::feature_extractor::FEATURE_COUNT;
use crate::models::scaler::ScaledVector;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Index of the "default" class in classifier probability output
pub const DEFAULT_CLASS: usize = 1;

/// A trained binary classifier with a probability-output interface.
///
/// Implementations are shared across request workers.
pub trait Classifier: Send + Sync {
    /// Model name for logs and health reporting
    fn name(&self) -> &str;

    /// Artifact format the model was loaded from
    fn format(&self) -> &'static str;

    /// Class probabilities `[p(no default), p(default)]`
    fn predict_proba(&self, features: &ScaledVector) -> Result<[f64; 2]>;
}

/// Check a default-class probability and expand it into a class pair
pub(crate) fn probability_pair(p_default: f64) -> Result<[f64; 2]> {
    if !p_default.is_finite() || !(0.0..=1.0).contains(&p_default) {
        bail!("classifier returned invalid probability {}", p_default);
    }
    Ok([1.0 - p_default, p_default])
}

#[derive(Debug, Deserialize)]
struct LogisticArtifact {
    coefficients: Vec<f64>,
    intercept: f64,
}

/// Logistic regression: `p(default) = sigmoid(w · x + b)`
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    name: String,
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LogisticClassifier {
    pub fn new(name: &str, coefficients: [f64; FEATURE_COUNT], intercept: f64) -> Self {
        Self {
            name: name.to_string(),
            coefficients,
            intercept,
        }
    }

    /// Load coefficients from a JSON artifact
    pub fn load<P: AsRef<Path>>(path: P, name: &str) -> Result<Self> {
        let path = path.as_ref();

        info!(model = %name, path = %path.display(), "Loading logistic model");

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load model from {:?}", path))?;
        let artifact: LogisticArtifact = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse model from {:?}", path))?;

        let len = artifact.coefficients.len();
        let coefficients: [f64; FEATURE_COUNT] = artifact.coefficients.try_into().map_err(|_| {
            anyhow::anyhow!("expected {} coefficients, got {}", FEATURE_COUNT, len)
        })?;

        if coefficients.iter().any(|c| !c.is_finite()) || !artifact.intercept.is_finite() {
            bail!("model in {:?} has non-finite parameters", path);
        }

        info!(model = %name, "Model loaded successfully");
        Ok(Self::new(name, coefficients, artifact.intercept))
    }
}

impl Classifier for LogisticClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self) -> &'static str {
        ModelFormat::Logistic.as_str()
    }

    fn predict_proba(&self, features: &ScaledVector) -> Result<[f64; 2]> {
        let logit: f64 = self
            .coefficients
            .iter()
            .zip(features.as_slice())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;

        probability_pair(1.0 / (1.0 + (-logit).exp()))
    }
}
