//! services/api/src/error.rs
//!
//! Defines the error types for the API service: `ApiError` for startup and
//! `RestError` for request handlers.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use birthday_card_core::domain::ValidationError;
use birthday_card_core::ports::PortError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The JSON body of every failed request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failures a handler reports to the client. Messages are short and
/// non-technical; details go to the log.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to save note.")]
    SaveFailed,

    #[error("Failed to load notes.")]
    LoadFailed,
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = match self {
            RestError::Validation(_) => StatusCode::BAD_REQUEST,
            RestError::SaveFailed | RestError::LoadFailed => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
