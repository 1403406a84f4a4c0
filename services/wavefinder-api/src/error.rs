//! API error type and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use wind_common::BboxError;

use crate::sites::StoreError;

/// Errors surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input. No upstream call was made.
    #[error("{0}")]
    Validation(String),

    /// Both upstream attempts failed. The detail is for logs only.
    #[error("Upstream unavailable: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(#[from] StoreError),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the caller.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Upstream(_) => "Upstream wind data unavailable".to_string(),
            ApiError::Database(_) => "DB error".to_string(),
        }
    }
}

impl From<BboxError> for ApiError {
    fn from(err: BboxError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Validation(msg) => tracing::debug!("Rejected request: {}", msg),
            ApiError::Upstream(detail) => tracing::error!("Upstream failure: {}", detail),
            ApiError::Database(err) => tracing::error!("Database failure: {}", err),
        }

        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
