//! Error types for Prompt Relay
//!
//! Every failure is converted into a `{ "error": "<message>" }` body at the
//! handler boundary. Upstream detail is logged where it happens and never
//! carried into the response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No prompt provided")]
    MissingPrompt,

    #[error("Server configuration error: Missing API Key")]
    MissingApiKey,

    /// Upstream call failed; `message` is the caller-facing text only
    #[error("{message}")]
    Upstream { message: String },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Build an upstream error carrying a caller-facing message
    pub fn upstream(message: impl Into<String>) -> Self {
        AppError::Upstream {
            message: message.into(),
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingPrompt => StatusCode::BAD_REQUEST,
            AppError::MissingApiKey | AppError::Upstream { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Outcome label used in metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            AppError::MissingPrompt => "missing_prompt",
            AppError::MissingApiKey => "missing_api_key",
            AppError::Upstream { .. } => "upstream_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
