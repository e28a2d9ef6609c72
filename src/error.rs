//! Error types for the CADOP search service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Message returned to clients that send a blank or missing query.
pub const MISSING_QUERY_MESSAGE: &str = "Query parameter is required";

/// Opaque message returned for any server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Ocorreu um erro ao processar sua solicitação";

/// Service-level errors that can occur during operation.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Query parameter is required")]
    InvalidQuery,

    #[error("Data file not found: {0}")]
    DataFileNotFound(String),

    #[error("Failed to load dataset: {0}")]
    DataLoad(String),

    #[error("Search failed: {0}")]
    InternalSearch(String),
}

impl ServiceError {
    /// HTTP status this error is surfaced with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidQuery => StatusCode::BAD_REQUEST,
            ServiceError::DataFileNotFound(_)
            | ServiceError::DataLoad(_)
            | ServiceError::InternalSearch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ServiceError::InvalidQuery => json!({ "error": MISSING_QUERY_MESSAGE }),
            // Internal causes stay in the server log.
            _ => json!({ "success": false, "error": INTERNAL_ERROR_MESSAGE }),
        };
        (status, Json(body)).into_response()
    }
}
