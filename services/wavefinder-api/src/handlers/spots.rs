//! Dive site and species record handlers.

use std::sync::Arc;

use axum::{extract::Extension, Json};

use crate::error::ApiError;
use crate::sites::{group_records, Site, SpeciesRecords};
use crate::state::AppState;

/// GET /api/spots - active sites
pub async fn spots_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Site>>, ApiError> {
    let sites = state.sites.active_sites().await?;
    Ok(Json(sites))
}

/// GET /api/records - heaviest catches per species
pub async fn records_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<SpeciesRecords>>, ApiError> {
    let rows = state.sites.records().await?;
    Ok(Json(group_records(rows)))
}
