//! Router construction.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Extension, Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::handlers;
use crate::state::AppState;

/// Build the full application router around shared state.
pub fn router(state: Arc<AppState>) -> Result<Router> {
    let link = HeaderValue::from_str(&state.config.cors.link_header())
        .context("Link header is not a valid header value")?;

    // Reflect the caller's origin so credentialed browser requests work
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::LINK]);

    let app = Router::new()
        // Wind
        .route("/api/wind", get(handlers::wind::wind_handler))
        .route("/api/wind/debug", get(handlers::wind::debug_handler))
        // Sites
        .route("/api/spots", get(handlers::spots::spots_handler))
        .route("/api/records", get(handlers::spots::records_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::metrics::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(SetResponseHeaderLayer::overriding(header::LINK, link))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors);

    Ok(app)
}
