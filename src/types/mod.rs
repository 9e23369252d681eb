//! Type definitions for the scoring service

pub mod applicant;
pub mod risk;

pub use applicant::ApplicantRecord;
pub use risk::{RiskLevel, RiskResult};
