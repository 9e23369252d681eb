//! Per-column standardization fit at training time

use crate::feature_extractor::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Model input after scaling, same column order as [`FeatureVector`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledVector(pub [f64; FEATURE_COUNT]);

impl ScaledVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Scaler artifact as exported from training
#[derive(Debug, Deserialize)]
struct ScalerArtifact {
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    #[serde(default)]
    mean: Option<Vec<f64>>,
    #[serde(default)]
    scale: Option<Vec<f64>>,
}

/// Standard scaler: `(x - mean) / scale` per column
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    pub fn new(mean: [f64; FEATURE_COUNT], scale: [f64; FEATURE_COUNT]) -> Result<Self> {
        for (i, (&m, &s)) in mean.iter().zip(scale.iter()).enumerate() {
            if !m.is_finite() {
                bail!("mean for '{}' is not finite", FEATURE_NAMES[i]);
            }
            if !s.is_finite() || s == 0.0 {
                bail!("scale for '{}' must be finite and non-zero, got {}", FEATURE_NAMES[i], s);
            }
        }
        Ok(Self { mean, scale })
    }

    /// Scaler that leaves features unchanged
    pub fn identity() -> Self {
        Self {
            mean: [0.0; FEATURE_COUNT],
            scale: [1.0; FEATURE_COUNT],
        }
    }

    /// Load a scaler from a JSON artifact.
    ///
    /// When the artifact records its feature names they must match the
    /// model input order exactly.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scaler from {:?}", path))?;
        let artifact: ScalerArtifact = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse scaler from {:?}", path))?;

        let scaler = Self::from_artifact(artifact)
            .with_context(|| format!("Invalid scaler in {:?}", path))?;

        info!(path = %path.display(), features = FEATURE_COUNT, "Scaler loaded");
        Ok(scaler)
    }

    fn from_artifact(artifact: ScalerArtifact) -> Result<Self> {
        if let Some(names) = &artifact.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                bail!(
                    "feature names {:?} do not match model input order {:?}",
                    names,
                    FEATURE_NAMES
                );
            }
        }

        let mean = column_array("mean", artifact.mean, 0.0)?;
        let scale = column_array("scale", artifact.scale, 1.0)?;
        Self::new(mean, scale)
    }

    /// Apply the fitted transform
    pub fn transform(&self, features: &FeatureVector) -> ScaledVector {
        let mut scaled = [0.0; FEATURE_COUNT];
        for (i, value) in scaled.iter_mut().enumerate() {
            *value = (features.0[i] - self.mean[i]) / self.scale[i];
        }
        ScaledVector(scaled)
    }
}

fn column_array(
    name: &str,
    values: Option<Vec<f64>>,
    fill: f64,
) -> Result<[f64; FEATURE_COUNT]> {
    match values {
        None => Ok([fill; FEATURE_COUNT]),
        Some(values) => {
            let len = values.len();
            values.try_into().map_err(|_| {
                anyhow::anyhow!("expected {} {} values, got {}", FEATURE_COUNT, name, len)
            })
        }
    }
}
