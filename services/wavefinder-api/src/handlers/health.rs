//! Health and readiness handlers.

use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub database: String,
}

/// GET|HEAD /health - liveness, no dependencies touched
pub async fn health_handler() -> &'static str {
    "ok"
}

/// GET /ready - verifies database connectivity
pub async fn ready_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let (status, database) = match state.sites.ping().await {
        Ok(()) => (StatusCode::OK, "ok".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable".to_string())
        }
    };

    let response = ReadyResponse {
        ready: status == StatusCode::OK,
        database,
    };
    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_handler() {
        assert_eq!(health_handler().await, "ok");
    }
}
