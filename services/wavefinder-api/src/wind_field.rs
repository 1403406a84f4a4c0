//! Wind retrieval: canonical time first, the upstream's latest step second.
//!
//! ```text
//! Validate -> Snap -> FetchPrimary --ok--> Assemble
//!                          |
//!                          +--err--> FetchFallback --ok--> Assemble
//!                                          |
//!                                          +--err--> 502
//! ```

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::{error, info, warn};

use griddap::{GriddapResult, GriddapSource, SliceRequest};
use wind_common::time::{canonical_3h, format_iso, parse_iso};
use wind_common::{
    assemble, velocity_records, AssembledGrid, GridBox, LonRange, TimeExpr, VelocityRecord,
    WindSlice, WindVector,
};

use crate::error::ApiError;
use crate::metrics;

/// Slices for one request and the model time they belong to.
#[derive(Debug)]
pub struct FetchedSlices {
    pub slices: Vec<WindSlice>,
    pub ref_time: String,
    pub used_fallback: bool,
}

async fn fetch_slices(
    source: &dyn GriddapSource,
    south: f64,
    north: f64,
    ranges: &[LonRange],
    time: TimeExpr,
) -> GriddapResult<Vec<WindSlice>> {
    let requests: Vec<SliceRequest> = ranges
        .iter()
        .map(|range| SliceRequest::new(south, north, *range, time))
        .collect();

    // Split halves are independent; results keep west-to-east order
    try_join_all(requests.iter().map(|req| source.fetch_slice(req))).await
}

/// Fetch every range at the canonical 3-hour time, retrying once with the
/// upstream's latest step.
pub async fn fetch_with_fallback(
    source: &dyn GriddapSource,
    south: f64,
    north: f64,
    ranges: &[LonRange],
    now: DateTime<Utc>,
    endpoint: &'static str,
) -> Result<FetchedSlices, ApiError> {
    let canonical = canonical_3h(now);

    let primary = fetch_slices(source, south, north, ranges, TimeExpr::At(canonical)).await;
    let primary_err = match primary {
        Ok(slices) => {
            return Ok(FetchedSlices {
                slices,
                ref_time: format_iso(&canonical),
                used_fallback: false,
            })
        }
        Err(e) => e,
    };

    warn!(
        endpoint,
        time = %format_iso(&canonical),
        error = %primary_err,
        "Primary wind fetch failed, retrying with latest"
    );
    metrics::record_fallback(endpoint);

    let (slices, latest) = futures::join!(
        fetch_slices(source, south, north, ranges, TimeExpr::Latest),
        source.latest_time()
    );

    let slices = slices.map_err(|e| {
        error!(endpoint, primary = %primary_err, fallback = %e, "Wind fetch failed twice");
        metrics::record_upstream_failure(endpoint);
        ApiError::Upstream(format!("primary: {}; fallback: {}", primary_err, e))
    })?;

    let ref_time = match latest {
        Ok(t) => format_iso(&t),
        Err(e) => {
            warn!(endpoint, error = %e, "Latest time lookup failed, using slice time");
            slice_time(&slices).ok_or_else(|| {
                metrics::record_upstream_failure(endpoint);
                ApiError::Upstream(format!("latest time unavailable: {}", e))
            })?
        }
    };

    info!(endpoint, ref_time = %ref_time, "Served wind from latest upstream step");

    Ok(FetchedSlices {
        slices,
        ref_time,
        used_fallback: true,
    })
}

/// Time column of the first slice, normalised when parseable.
fn slice_time(slices: &[WindSlice]) -> Option<String> {
    let raw = slices.iter().find_map(|s| s.reference_time())?;
    Some(parse_iso(&raw).map(|t| format_iso(&t)).unwrap_or(raw))
}

/// An assembled wind grid ready to be emitted.
#[derive(Debug)]
pub struct WindField {
    pub grid: AssembledGrid,
    pub ref_time: String,
    pub used_fallback: bool,
    pub slice_count: usize,
}

impl WindField {
    /// Eastward and northward header+data records.
    pub fn records(&self) -> Vec<VelocityRecord> {
        velocity_records(&self.grid, &self.ref_time)
    }
}

/// Fetch and stitch the wind grid for a normalised box.
pub async fn wind_field(
    source: &dyn GriddapSource,
    grid_box: &GridBox,
    now: DateTime<Utc>,
) -> Result<WindField, ApiError> {
    let ranges = grid_box.lon_ranges();
    let fetched = fetch_with_fallback(
        source,
        grid_box.south,
        grid_box.north,
        &ranges,
        now,
        "wind",
    )
    .await?;

    let grid = assemble(&fetched.slices);
    if grid.skipped > 0 {
        warn!(skipped = grid.skipped, "Rows did not map onto the assembled grid");
        metrics::record_assembly_gaps(grid.skipped);
    }

    Ok(WindField {
        grid,
        ref_time: fetched.ref_time,
        used_fallback: fetched.used_fallback,
        slice_count: fetched.slices.len(),
    })
}

/// Single-cell wind with derived speed and bearing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindSample {
    pub model_time_iso: String,
    pub grid_lat: f64,
    pub grid_lon: f64,
    #[serde(rename = "U_ms")]
    pub u_ms: Option<f64>,
    #[serde(rename = "V_ms")]
    pub v_ms: Option<f64>,
    pub speed_ms: Option<f64>,
    pub speed_kmh: Option<f64>,
    pub meteo_from_deg: Option<f64>,
}

/// Wind at the grid cell nearest `(lat, lon)`.
///
/// The coordinates reported are the ones the upstream returned for its first
/// row; upstream grid alignment is authoritative.
pub async fn wind_sample(
    source: &dyn GriddapSource,
    lat: f64,
    lon: f64,
    now: DateTime<Utc>,
) -> Result<WindSample, ApiError> {
    let cell = GridBox::around_point(lat, lon)?;
    let fetched = fetch_with_fallback(
        source,
        cell.south,
        cell.north,
        &cell.lon_ranges(),
        now,
        "point",
    )
    .await?;

    let row = fetched
        .slices
        .first()
        .and_then(|s| s.first_row())
        .ok_or_else(|| {
            metrics::record_upstream_failure("point");
            ApiError::Upstream("first row has no usable coordinates".to_string())
        })?;

    let vector = match (row.u, row.v) {
        (Some(u), Some(v)) => Some(WindVector::new(u, v)),
        _ => None,
    };

    Ok(WindSample {
        model_time_iso: fetched.ref_time,
        grid_lat: row.lat,
        grid_lon: row.lon,
        u_ms: row.u,
        v_ms: row.v,
        speed_ms: vector.map(|w| w.speed_ms()),
        speed_kmh: vector.map(|w| w.speed_kmh()),
        meteo_from_deg: vector.map(|w| w.from_bearing()),
    })
}
