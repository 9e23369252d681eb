//! Feature extraction for credit risk model inference.
//!
//! This module turns applicant records into the feature vectors used
//! during model training. Column order is part of the deployed model's
//! interface: the scaler and the classifier were both fit on it.

use crate::error::ScoringError;
use crate::models::encoders::{CategoricalField, CategoryEncoders};
use crate::types::applicant::ApplicantRecord;

/// Number of model input features
pub const FEATURE_COUNT: usize = 11;

/// Training column names, in model input order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "person_age",
    "person_income",
    "person_home_ownership",
    "person_emp_length",
    "loan_intent",
    "loan_grade",
    "loan_amnt",
    "loan_int_rate",
    "loan_percent_income",
    "cb_person_default_on_file",
    "cb_person_cred_hist_length",
];

/// Unscaled model input, in `FEATURE_NAMES` order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Value of a named training column
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| self.0[i])
    }
}

/// Feature extractor that transforms applicant records into model input features.
///
/// Owns the training-time categorical encoders.
pub struct FeatureExtractor {
    encoders: CategoryEncoders,
}

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new(encoders: CategoryEncoders) -> Self {
        Self { encoders }
    }

    /// Extract features from an applicant record.
    ///
    /// Fails only when a categorical value is unknown to its encoder.
    pub fn extract(&self, record: &ApplicantRecord) -> Result<FeatureVector, ScoringError> {
        let home_ownership = self
            .encoders
            .encode(CategoricalField::HomeOwnership, &record.home_ownership)?;
        let loan_intent = self
            .encoders
            .encode(CategoricalField::LoanIntent, &record.loan_intent)?;
        let loan_grade = self
            .encoders
            .encode(CategoricalField::LoanGrade, &record.loan_grade)?;
        let default_on_file = self
            .encoders
            .encode(CategoricalField::DefaultOnFile, &record.default_on_file)?;

        Ok(FeatureVector([
            record.age as f64,
            record.income,
            home_ownership as f64,
            record.employment_length as f64,
            loan_intent as f64,
            loan_grade as f64,
            record.loan_amount,
            record.loan_interest_rate,
            record.loan_percent_income(),
            default_on_file as f64,
            record.credit_history_length as f64,
        ]))
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get feature names (matching training order).
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }

    pub fn encoders(&self) -> &CategoryEncoders {
        &self.encoders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::encoders::tests::credit_encoders;

    fn applicant() -> ApplicantRecord {
        ApplicantRecord {
            age: 30,
            income: 50000.0,
            home_ownership: "RENT".to_string(),
            employment_length: 5,
            loan_intent: "EDUCATION".to_string(),
            loan_grade: "B".to_string(),
            loan_amount: 10000.0,
            loan_interest_rate: 11.5,
            default_on_file: "N".to_string(),
            credit_history_length: 4,
        }
    }

    #[test]
    fn test_feature_column_order() {
        let extractor = FeatureExtractor::new(credit_encoders());

        let features = extractor.extract(&applicant()).unwrap();

        assert_eq!(
            features.0,
            [30.0, 50000.0, 3.0, 5.0, 1.0, 1.0, 10000.0, 11.5, 0.2, 0.0, 4.0]
        );
    }

    #[test]
    fn test_feature_lookup_by_name() {
        let extractor = FeatureExtractor::new(credit_encoders());
        let features = extractor.extract(&applicant()).unwrap();

        assert_eq!(features.get("loan_percent_income"), Some(0.2));
        assert_eq!(features.get("cb_person_cred_hist_length"), Some(4.0));
        assert_eq!(features.get("not_a_column"), None);
    }

    #[test]
    fn test_zero_income_guard() {
        let extractor = FeatureExtractor::new(credit_encoders());
        let mut record = applicant();
        record.income = 0.0;
        record.loan_amount = 35000.0;

        let features = extractor.extract(&record).unwrap();
        let ratio = features.get("loan_percent_income").unwrap();
        assert_eq!(ratio, 0.0);
        assert!(features.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let extractor = FeatureExtractor::new(credit_encoders());
        let mut record = applicant();
        record.loan_intent = "VACATION".to_string();

        assert!(matches!(
            extractor.extract(&record),
            Err(ScoringError::UnknownCategory { field: "loan_intent", .. })
        ));
    }

    #[test]
    fn test_feature_count() {
        let extractor = FeatureExtractor::new(credit_encoders());
        assert_eq!(extractor.feature_count(), 11);
        assert_eq!(extractor.feature_names().len(), 11);
    }
}
