//! Header + flat data records for vector-field map layers.
//!
//! Layout follows the grib2json convention consumed by leaflet-velocity style
//! widgets: one record per component, `data` row-major from `(lo1, la1)`.

use serde::{Deserialize, Serialize};

use crate::assemble::AssembledGrid;

/// GRIB2 discipline 0 category 2 (momentum).
const MOMENTUM_CATEGORY: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindComponent {
    Eastward,
    Northward,
}

impl WindComponent {
    /// GRIB2 parameter number within the momentum category.
    pub fn parameter_number(&self) -> u8 {
        match self {
            WindComponent::Eastward => 2,
            WindComponent::Northward => 3,
        }
    }

    pub fn parameter_name(&self) -> &'static str {
        match self {
            WindComponent::Eastward => "U-component_of_wind",
            WindComponent::Northward => "V-component_of_wind",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityHeader {
    pub parameter_category: u8,
    pub parameter_number: u8,
    pub parameter_number_name: String,
    pub parameter_unit: String,
    pub lo1: f64,
    pub la1: f64,
    pub lo2: f64,
    pub la2: f64,
    pub nx: usize,
    pub ny: usize,
    pub dx: f64,
    pub dy: f64,
    pub ref_time: String,
    pub forecast_time: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityRecord {
    pub header: VelocityHeader,
    /// `None` serialises as `null` for cells without data.
    pub data: Vec<Option<f64>>,
}

/// Eastward then northward records sharing one header.
///
/// `lo1`/`lo2` are the first and last assembled longitudes. A box across the
/// antimeridian therefore reports `lo1 = -179.5`, `lo2 = 180` with a uniform
/// `dx`, even though the columns jump from -170 to 170 in the middle.
pub fn velocity_records(grid: &AssembledGrid, ref_time: &str) -> Vec<VelocityRecord> {
    [WindComponent::Eastward, WindComponent::Northward]
        .into_iter()
        .map(|component| VelocityRecord {
            header: header(grid, ref_time, component),
            data: match component {
                WindComponent::Eastward => grid.u.clone(),
                WindComponent::Northward => grid.v.clone(),
            },
        })
        .collect()
}

fn header(grid: &AssembledGrid, ref_time: &str, component: WindComponent) -> VelocityHeader {
    VelocityHeader {
        parameter_category: MOMENTUM_CATEGORY,
        parameter_number: component.parameter_number(),
        parameter_number_name: component.parameter_name().to_string(),
        parameter_unit: "m.s-1".to_string(),
        lo1: grid.lons.first().copied().unwrap_or_default(),
        la1: grid.lats.first().copied().unwrap_or_default(),
        lo2: grid.lons.last().copied().unwrap_or_default(),
        la2: grid.lats.last().copied().unwrap_or_default(),
        nx: grid.nx(),
        ny: grid.ny(),
        dx: grid.dx(),
        dy: grid.dy(),
        ref_time: ref_time.to_string(),
        forecast_time: 0,
    }
}
