//! Scoring service: feature extraction, scaling, inference and bucketing

use crate::config::{AppConfig, ValidationConfig};
use crate::error::ScoringError;
use crate::feature_extractor::{FeatureExtractor, FeatureVector};
use crate::models::classifier::{Classifier, DEFAULT_CLASS};
use crate::models::encoders::{CategoricalField, CategoryEncoders};
use crate::models::loader::load_classifier;
use crate::models::scaler::{ScaledVector, StandardScaler};
use crate::types::applicant::ApplicantRecord;
use crate::types::risk::RiskResult;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Summary of the loaded artifacts, reported by the readiness check
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactSummary {
    pub model_name: String,
    pub model_format: &'static str,
    pub feature_count: usize,
    /// Known class count per encoded column
    pub encoder_classes: BTreeMap<&'static str, usize>,
}

/// Stateless default-risk scorer over three immutable training artifacts.
///
/// Built once at startup and shared by every request worker.
pub struct ScoringService {
    extractor: FeatureExtractor,
    scaler: StandardScaler,
    classifier: Box<dyn Classifier>,
    validation: ValidationConfig,
}

impl ScoringService {
    /// Assemble a service from already-loaded artifacts
    pub fn new(
        encoders: CategoryEncoders,
        scaler: StandardScaler,
        classifier: Box<dyn Classifier>,
        validation: ValidationConfig,
    ) -> Self {
        Self {
            extractor: FeatureExtractor::new(encoders),
            scaler,
            classifier,
            validation,
        }
    }

    /// Load all artifacts named by the configuration.
    ///
    /// Fails if any of the three artifacts cannot be loaded.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let artifacts = &config.artifacts;

        let encoders = CategoryEncoders::load(artifacts.encoders_path())
            .context("Failed to load categorical encoders")?;
        let scaler =
            StandardScaler::load(artifacts.scaler_path()).context("Failed to load feature scaler")?;
        let classifier = load_classifier(artifacts).context("Failed to load classifier")?;

        info!(
            model = classifier.name(),
            format = classifier.format(),
            dir = %artifacts.dir.display(),
            "Scoring service initialized"
        );

        Ok(Self::new(encoders, scaler, classifier, config.validation.clone()))
    }

    /// Validate, encode and assemble the unscaled feature vector
    pub fn features(&self, record: &ApplicantRecord) -> Result<FeatureVector, ScoringError> {
        record.validate(&self.validation)?;
        self.extractor.extract(record)
    }

    /// Scaled model input for a record
    pub fn scaled_features(&self, record: &ApplicantRecord) -> Result<ScaledVector, ScoringError> {
        let features = self.features(record)?;
        Ok(self.scaler.transform(&features))
    }

    /// Score a single applicant
    pub fn score(&self, record: &ApplicantRecord) -> Result<RiskResult, ScoringError> {
        let scaled = self.scaled_features(record)?;

        let probabilities = self.classifier.predict_proba(&scaled)?;
        let result = RiskResult::from_score(probabilities[DEFAULT_CLASS]);

        debug!(
            model = self.classifier.name(),
            risk_score = result.risk_score,
            risk_level = result.risk_level.as_str(),
            "Applicant scored"
        );

        Ok(result)
    }

    /// Score a batch of applicants independently, preserving order
    pub fn score_batch(&self, records: &[ApplicantRecord]) -> Vec<Result<RiskResult, ScoringError>> {
        records.iter().map(|r| self.score(r)).collect()
    }

    pub fn summary(&self) -> ArtifactSummary {
        let encoders = self.extractor.encoders();
        ArtifactSummary {
            model_name: self.classifier.name().to_string(),
            model_format: self.classifier.format(),
            feature_count: self.extractor.feature_count(),
            encoder_classes: CategoricalField::ALL
                .iter()
                .map(|f| (f.column_name(), encoders.classes(*f).len()))
                .collect(),
        }
    }
}
