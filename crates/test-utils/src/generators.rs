//! Synthetic wind slices shaped like upstream griddap tables.
//!
//! Rows are emitted latitude ascending, then longitude ascending, with the
//! same columns the real dataset returns.

use serde_json::{json, Value};

use griddap::SliceRequest;
use wind_common::{Slice, WindColumns, WindSlice, GRID_STEP};

/// A deterministic wind field over `(lat, lon)` with lon on the 0..360 grid.
pub type WindField = fn(f64, f64) -> (f64, f64);

/// Default field: `u = lon / 10`, `v = lat / 10`, unique per cell.
pub fn gradient_field(lat: f64, lon: f64) -> (f64, f64) {
    (lon / 10.0, lat / 10.0)
}

/// Constant wind blowing due south at 5 m/s.
pub fn northerly_field(_lat: f64, _lon: f64) -> (f64, f64) {
    (0.0, -5.0)
}

/// Grid lines from `from` to `to` inclusive.
pub fn grid_lines(from: f64, to: f64) -> Vec<f64> {
    let count = ((to - from) / GRID_STEP).round() as i64;
    (0..=count).map(|k| from + k as f64 * GRID_STEP).collect()
}

/// Raw table covering a box on the 0..360 grid.
pub fn wind_table(
    south: f64,
    north: f64,
    west: f64,
    east: f64,
    time: &str,
    field: WindField,
) -> Slice {
    let mut rows: Vec<Vec<Value>> = Vec::new();
    for lat in grid_lines(south, north) {
        for lon in grid_lines(west, east) {
            let (u, v) = field(lat, lon);
            rows.push(vec![json!(time), json!(lat), json!(lon), json!(u), json!(v)]);
        }
    }

    Slice {
        column_names: vec![
            "time".to_string(),
            "latitude".to_string(),
            "longitude".to_string(),
            "ugrd10m".to_string(),
            "vgrd10m".to_string(),
        ],
        rows,
    }
}

/// Validated slice answering a request, as the real client would return it.
pub fn slice_for(request: &SliceRequest, time: &str, field: WindField) -> WindSlice {
    let table = wind_table(
        request.south,
        request.north,
        request.west,
        request.east,
        time,
        field,
    );
    // Generated tables always carry every wind column
    WindSlice::from_slice(table, &WindColumns::default())
        .unwrap_or_else(|e| panic!("generated table is invalid: {}", e))
}
