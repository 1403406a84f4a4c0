//! Wind field and single-point wind handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use wind_common::bbox::parse_coord;
use wind_common::{BoundingBox, VelocityRecord};

use crate::error::ApiError;
use crate::metrics;
use crate::state::AppState;
use crate::wind_field::{wind_field, wind_sample, WindSample};

/// Query parameters for `/api/wind`. Kept as raw strings so a missing or
/// non-numeric value maps to a 400 with the parameter named.
#[derive(Debug, Default, Deserialize)]
pub struct WindQueryParams {
    pub west: Option<String>,
    pub south: Option<String>,
    pub east: Option<String>,
    pub north: Option<String>,
}

/// Query parameters for `/api/wind/debug`.
#[derive(Debug, Default, Deserialize)]
pub struct PointQueryParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// GET /api/wind?west=&south=&east=&north=
///
/// Responds with two records, eastward then northward, in the grib2json
/// layout consumed by leaflet-velocity.
pub async fn wind_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<WindQueryParams>,
) -> Result<Json<Vec<VelocityRecord>>, ApiError> {
    metrics::record_wind_request("wind");

    let bbox = BoundingBox::from_params(
        params.west.as_deref(),
        params.south.as_deref(),
        params.east.as_deref(),
        params.north.as_deref(),
    )?;
    let grid_box = bbox.to_grid_box()?;
    debug!(?bbox, ?grid_box, "Wind request normalised");

    let field = wind_field(state.upstream.as_ref(), &grid_box, Utc::now()).await?;
    debug!(
        nx = field.grid.nx(),
        ny = field.grid.ny(),
        ref_time = %field.ref_time,
        fallback = field.used_fallback,
        "Wind field assembled"
    );

    Ok(Json(field.records()))
}

/// GET /api/wind/debug?lat=&lon=
pub async fn debug_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<PointQueryParams>,
) -> Result<Json<WindSample>, ApiError> {
    metrics::record_wind_request("point");

    let lat = parse_coord("lat", params.lat.as_deref())?;
    let lon = parse_coord("lon", params.lon.as_deref())?;

    let sample = wind_sample(state.upstream.as_ref(), lat, lon, Utc::now()).await?;
    Ok(Json(sample))
}
