//! Arithmetic for the fixed 0.5° global grid.
//!
//! The upstream stores longitudes on 0..359.5 while map clients speak
//! -180..180. Every coordinate sent upstream must sit exactly on a grid line.

/// Grid spacing of the upstream model in both axes, in degrees.
pub const GRID_STEP: f64 = 0.5;

/// Last longitude line on the 0..360 grid.
pub const MAX_LON_360: f64 = 360.0 - GRID_STEP;

/// Round a coordinate to the nearest grid line.
pub fn snap(v: f64) -> f64 {
    // Adding +0.0 folds -0.0 into 0.0
    (v / GRID_STEP).round() * GRID_STEP + 0.0
}

/// Convert a -180..180 longitude to the 0..360 convention.
pub fn to_360(lon: f64) -> f64 {
    if lon < 0.0 {
        lon + 360.0
    } else {
        lon
    }
}

/// Saturating clamp into `[lo, hi]`.
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

/// Convert a 0..360 grid longitude back to -180..180.
///
/// 180 itself is kept on the east side, so `remap_lon(to_360(-180.0)) == 180.0`.
pub fn remap_lon(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else {
        lon
    }
}

/// Integer key for a grid coordinate, stable under float noise.
pub(crate) fn coord_key(v: f64) -> i64 {
    (v * 1000.0).round() as i64
}

/// An inclusive longitude range on the 0..360 grid, west to east.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonRange {
    pub west: f64,
    pub east: f64,
}

impl LonRange {
    pub fn new(west: f64, east: f64) -> Self {
        Self { west, east }
    }

    /// Number of grid lines covered by this range.
    pub fn line_count(&self) -> usize {
        ((self.east - self.west) / GRID_STEP).round() as usize + 1
    }
}

/// Longitude extent of a request after conversion to the 0..360 grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LonSpan {
    /// One contiguous range.
    Contiguous(LonRange),
    /// The range wraps the 0/360 seam and is fetched as `[west, 359.5]` then `[0, east]`.
    Wrapped(LonRange, LonRange),
}

impl LonSpan {
    /// Decide whether the snapped, clamped 0..360 edges wrap the seam.
    pub fn resolve(west_360: f64, east_360: f64) -> Self {
        if west_360 > east_360 {
            LonSpan::Wrapped(
                LonRange::new(west_360, MAX_LON_360),
                LonRange::new(0.0, east_360),
            )
        } else {
            LonSpan::Contiguous(LonRange::new(west_360, east_360))
        }
    }

    /// The span that covers the whole globe.
    pub fn global() -> Self {
        LonSpan::Contiguous(LonRange::new(0.0, MAX_LON_360))
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, LonSpan::Wrapped(..))
    }

    /// Ranges to fetch, in west-to-east order.
    pub fn ranges(&self) -> Vec<LonRange> {
        match *self {
            LonSpan::Contiguous(range) => vec![range],
            LonSpan::Wrapped(west, east) => vec![west, east],
        }
    }
}
