//! Loan applicant data structures

use crate::config::ValidationConfig;
use crate::error::ScoringError;
use serde::{Deserialize, Serialize};

/// A loan applicant to be scored for default risk.
///
/// Wire names follow the training dataset's short column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    /// Age in years
    pub age: i32,

    /// Annual income
    pub income: f64,

    /// Home ownership (RENT, OWN, MORTGAGE, OTHER)
    pub home_ownership: String,

    /// Employment length in years
    #[serde(rename = "emp_length")]
    pub employment_length: i32,

    /// Loan purpose (EDUCATION, MEDICAL, VENTURE, ...)
    pub loan_intent: String,

    /// Lender-assigned loan grade (A-G)
    pub loan_grade: String,

    /// Requested loan amount
    #[serde(rename = "loan_amnt")]
    pub loan_amount: f64,

    /// Interest rate, in percent
    #[serde(rename = "loan_int_rate")]
    pub loan_interest_rate: f64,

    /// Historical default on file (Y/N)
    pub default_on_file: String,

    /// Length of credit history in years
    #[serde(rename = "cred_hist_length")]
    pub credit_history_length: i32,
}

impl ApplicantRecord {
    /// Check the record against the boundary validation policy.
    ///
    /// Non-finite amounts are always rejected. Range checks only apply when
    /// `reject_out_of_range` is enabled.
    pub fn validate(&self, policy: &ValidationConfig) -> Result<(), ScoringError> {
        for (name, value) in [
            ("income", self.income),
            ("loan_amnt", self.loan_amount),
            ("loan_int_rate", self.loan_interest_rate),
        ] {
            if !value.is_finite() {
                return Err(ScoringError::InvalidInput(format!(
                    "{name} must be a finite number"
                )));
            }
        }

        if !policy.reject_out_of_range {
            return Ok(());
        }

        for (name, value) in [
            ("age", self.age),
            ("emp_length", self.employment_length),
            ("cred_hist_length", self.credit_history_length),
        ] {
            if value < 0 {
                return Err(ScoringError::InvalidInput(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        for (name, value) in [("income", self.income), ("loan_amnt", self.loan_amount)] {
            if value < 0.0 {
                return Err(ScoringError::InvalidInput(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        if !(0.0..=100.0).contains(&self.loan_interest_rate) {
            return Err(ScoringError::InvalidInput(format!(
                "loan_int_rate must be between 0 and 100, got {}",
                self.loan_interest_rate
            )));
        }

        Ok(())
    }

    /// Derived loan-to-income ratio, zero when income is not positive
    pub fn loan_percent_income(&self) -> f64 {
        if self.income > 0.0 {
            self.loan_amount / self.income
        } else {
            0.0
        }
    }
}
