//! Risk result data structures

use serde::{Deserialize, Serialize};

/// Scores strictly above this are `High`
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Scores strictly above this (and not high) are `Moderate`
pub const MODERATE_RISK_THRESHOLD: f64 = 0.5;

/// Risk level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Bucket a default probability. Each bucket is closed on its upper
    /// bound: exactly 0.7 is moderate, exactly 0.5 is low.
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score > MODERATE_RISK_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        }
    }
}

/// Scoring outcome returned to the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    /// Probability of default (0.0 - 1.0)
    pub risk_score: f64,

    /// Bucketed risk level
    pub risk_level: RiskLevel,
}

impl RiskResult {
    pub fn from_score(risk_score: f64) -> Self {
        Self {
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
        }
    }
}
