//! Unified API error handling
//!
//! Every endpoint reports failures with the same JSON body.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ScoringError;

/// Standard error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Categorical value unseen in training (400)
    #[error("{0}")]
    UnknownCategory(String),

    /// Record failed boundary validation (400)
    #[error("{0}")]
    InvalidInput(String),

    /// Malformed request body (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Classifier failure (500)
    #[error("{0}")]
    Inference(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::UnknownCategory(_) => "unknown_category",
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Inference(_) => "inference_error",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnknownCategory(_) | ApiError::InvalidInput(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Inference(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = self.error_type();
        let request_id = Uuid::new_v4().to_string();

        if status.is_client_error() {
            tracing::warn!(
                error_type = error_type,
                status = status.as_u16(),
                request_id = %request_id,
                message = %self,
                "Rejected request"
            );
        } else {
            tracing::error!(
                error_type = error_type,
                status = status.as_u16(),
                request_id = %request_id,
                message = %self,
                "API error"
            );
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id,
        })
    }
}

impl From<ScoringError> for ApiError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::UnknownCategory { .. } => ApiError::UnknownCategory(err.to_string()),
            ScoringError::InvalidInput(_) => ApiError::InvalidInput(err.to_string()),
            ScoringError::Inference(_) => ApiError::Inference(err.to_string()),
        }
    }
}
