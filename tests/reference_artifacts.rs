//! Scoring against the reference artifacts in tests/fixtures.

use credit_risk_scoring::config::{AppConfig, ArtifactsConfig, ModelFormat};
use credit_risk_scoring::{ApplicantRecord, RiskLevel, ScoringError, ScoringService};
use std::path::PathBuf;
use std::sync::Arc;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn reference_config() -> AppConfig {
    AppConfig {
        artifacts: ArtifactsConfig {
            dir: fixtures_dir(),
            model_file: "model.json".to_string(),
            model_format: ModelFormat::Logistic,
            ..ArtifactsConfig::default()
        },
        ..AppConfig::default()
    }
}

fn reference_applicant() -> ApplicantRecord {
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

fn subprime_applicant() -> ApplicantRecord {
    ApplicantRecord {
        age: 22,
        income: 12000.0,
        home_ownership: "RENT".to_string(),
        employment_length: 0,
        loan_intent: "MEDICAL".to_string(),
        loan_grade: "E".to_string(),
        loan_amount: 15000.0,
        loan_interest_rate: 18.5,
        default_on_file: "Y".to_string(),
        credit_history_length: 2,
    }
}

#[test]
fn reference_applicant_feature_vector() {
    let service = ScoringService::from_config(&reference_config()).unwrap();

    let features = service.features(&reference_applicant()).unwrap();
    assert_eq!(features.get("loan_percent_income"), Some(0.2));
    assert_eq!(
        features.0,
        [30.0, 50000.0, 3.0, 5.0, 1.0, 1.0, 10000.0, 11.5, 0.2, 0.0, 4.0]
    );
}

#[test]
fn reference_applicant_score_is_pinned() {
    let service = ScoringService::from_config(&reference_config()).unwrap();

    let result = service.score(&reference_applicant()).unwrap();

    assert!(
        (result.risk_score - 0.374_269_932_755_724_5).abs() < 1e-9,
        "risk_score drifted: {}",
        result.risk_score
    );
    assert_eq!(result.risk_level, RiskLevel::Low);
}

#[test]
fn subprime_applicant_is_high_risk() {
    let service = ScoringService::from_config(&reference_config()).unwrap();

    let result = service.score(&subprime_applicant()).unwrap();

    assert!(result.risk_score > 0.99 && result.risk_score <= 1.0);
    assert_eq!(result.risk_level, RiskLevel::High);
}

#[test]
fn unknown_grade_is_rejected() {
    let service = ScoringService::from_config(&reference_config()).unwrap();
    let mut record = reference_applicant();
    record.loan_grade = "H".to_string();

    match service.score(&record) {
        Err(ScoringError::UnknownCategory { field, value, .. }) => {
            assert_eq!(field, "loan_grade");
            assert_eq!(value, "H");
        }
        other => panic!("expected unknown category, got {other:?}"),
    }
}

#[test]
fn scores_stay_in_unit_interval() {
    let service = ScoringService::from_config(&reference_config()).unwrap();

    for income in [0.0, 1.0, 5_000.0, 50_000.0, 5_000_000.0] {
        for amount in [0.0, 500.0, 35_000.0] {
            let mut record = reference_applicant();
            record.income = income;
            record.loan_amount = amount;

            let result = service.score(&record).unwrap();
            assert!((0.0..=1.0).contains(&result.risk_score));
        }
    }
}

#[test]
fn concurrent_scoring_matches_sequential() {
    let service = Arc::new(ScoringService::from_config(&reference_config()).unwrap());
    let expected = service.score(&reference_applicant()).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || service.score(&reference_applicant()).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn missing_artifact_fails_startup() {
    let mut config = reference_config();
    config.artifacts.scaler_file = "missing_scaler.json".to_string();

    let err = ScoringService::from_config(&config).err().unwrap();
    assert!(format!("{err:#}").contains("Failed to load feature scaler"));
}
