//! Artifact loading: ONNX model sessions and the classifier selected by config

use crate::config::{ArtifactsConfig, ModelFormat};
use crate::models::classifier::{Classifier, LogisticClassifier};
use crate::models::onnx::OnnxClassifier;
use anyhow::{bail, Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// Loader for ONNX models
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        ort::init().commit()?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load a single ONNX classifier from file
    pub fn load_model<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<OnnxClassifier> {
        let path = path.as_ref();

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "probabilities".to_string());

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(OnnxClassifier::new(name.to_string(), session, input_name, output_name))
    }
}

/// Load the classifier artifact in the configured format.
///
/// A missing or unreadable model is an error; there is no fallback model.
pub fn load_classifier(artifacts: &ArtifactsConfig) -> Result<Box<dyn Classifier>> {
    let path = artifacts.model_path();
    if !path.exists() {
        bail!("Model file not found: {}", path.display());
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model")
        .to_string();

    let classifier: Box<dyn Classifier> = match artifacts.model_format {
        ModelFormat::Onnx => {
            let loader = ModelLoader::with_threads(artifacts.onnx_threads)?;
            Box::new(loader.load_model(&path, &name)?)
        }
        ModelFormat::Logistic => Box::new(LogisticClassifier::load(&path, &name)?),
    };

    Ok(classifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = ArtifactsConfig {
            dir: dir.path().to_path_buf(),
            model_format: ModelFormat::Logistic,
            ..ArtifactsConfig::default()
        };

        let err = load_classifier(&artifacts).err().unwrap();
        assert!(err.to_string().contains("Model file not found"));
    }

    #[test]
    fn test_load_logistic_classifier() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("credit_model.json")).unwrap();
        write!(
            file,
            r#"{{"coefficients": [0,0,0,0,0,0,0,0,0,0,0], "intercept": 0.0}}"#
        )
        .unwrap();

        let artifacts = ArtifactsConfig {
            dir: dir.path().to_path_buf(),
            model_file: "credit_model.json".to_string(),
            model_format: ModelFormat::Logistic,
            ..ArtifactsConfig::default()
        };

        let classifier = load_classifier(&artifacts).unwrap();
        assert_eq!(classifier.name(), "credit_model");
    }
}
