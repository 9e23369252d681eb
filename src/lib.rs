//! Credit Risk Scoring Library
//!
//! Turns a loan applicant's attributes into a probability of default and a
//! coarse risk level by replaying the training-time preprocessing
//! (categorical encoding, derived ratio, standard scaling) in front of a
//! pre-trained classifier.

pub mod api;
pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod models;
pub mod types;

pub use config::AppConfig;
pub use error::ScoringError;
pub use feature_extractor::{FeatureExtractor, FeatureVector, FEATURE_NAMES};
pub use models::inference::ScoringService;
pub use types::{ApplicantRecord, RiskLevel, RiskResult};
