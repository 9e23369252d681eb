//! Errors raised while turning an applicant record into a risk result

/// Scoring pipeline error
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ScoringError {
    /// A categorical value that the trained encoder never saw
    #[error("unknown {field} category '{value}' (expected one of: {})", .known.join(", "))]
    UnknownCategory {
        field: &'static str,
        value: String,
        known: Vec<String>,
    },

    /// The record failed boundary validation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The classifier could not produce a usable probability
    #[error("inference failed: {0:#}")]
    Inference(#[from] anyhow::Error),
}

impl ScoringError {
    /// Whether the caller is at fault (maps to a 4xx response)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ScoringError::UnknownCategory { .. } | ScoringError::InvalidInput(_)
        )
    }
}
