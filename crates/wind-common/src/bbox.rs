//! Bounding box types and their normalisation onto the global grid.

use crate::grid::{clamp, snap, to_360, LonRange, LonSpan, GRID_STEP, MAX_LON_360};

/// A caller-supplied geographic box in degrees, -180..180 longitudes expected
/// but not required.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its edges.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Parse the four edges from raw query values.
    pub fn from_params(
        west: Option<&str>,
        south: Option<&str>,
        east: Option<&str>,
        north: Option<&str>,
    ) -> Result<Self, BboxError> {
        Ok(Self {
            west: parse_coord("west", west)?,
            south: parse_coord("south", south)?,
            east: parse_coord("east", east)?,
            north: parse_coord("north", north)?,
        })
    }

    /// Snap, clamp and order the box so it can be fetched from the grid.
    pub fn to_grid_box(&self) -> Result<GridBox, BboxError> {
        for (param, value) in [
            ("west", self.west),
            ("south", self.south),
            ("east", self.east),
            ("north", self.north),
        ] {
            if !value.is_finite() {
                return Err(BboxError::NotFinite(param));
            }
        }

        let (south, north) = normalise_lat_range(self.south, self.north);

        let lon = if self.east - self.west >= 360.0 - GRID_STEP {
            LonSpan::global()
        } else {
            let west = clamp(to_360(snap(self.west)), 0.0, MAX_LON_360);
            let east = clamp(to_360(snap(self.east)), 0.0, MAX_LON_360);
            LonSpan::resolve(west, east)
        };

        Ok(GridBox { south, north, lon })
    }
}

/// A box aligned to the grid: latitudes snapped, ordered and non-degenerate,
/// longitudes resolved into one or two 0..360 ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBox {
    pub south: f64,
    pub north: f64,
    pub lon: LonSpan,
}

impl GridBox {
    /// The cell around a single point, one grid step out in every direction.
    pub fn around_point(lat: f64, lon: f64) -> Result<Self, BboxError> {
        if !lat.is_finite() {
            return Err(BboxError::NotFinite("lat"));
        }
        if !lon.is_finite() {
            return Err(BboxError::NotFinite("lon"));
        }

        let lat = clamp(snap(lat), -90.0, 90.0);
        let lon = clamp(to_360(snap(lon)), 0.0, MAX_LON_360);

        Ok(Self {
            south: (lat - GRID_STEP).max(-90.0),
            north: (lat + GRID_STEP).min(90.0),
            lon: LonSpan::Contiguous(LonRange::new(
                (lon - GRID_STEP).max(0.0),
                (lon + GRID_STEP).min(MAX_LON_360),
            )),
        })
    }

    /// Longitude ranges to fetch, west to east.
    pub fn lon_ranges(&self) -> Vec<LonRange> {
        self.lon.ranges()
    }
}

fn normalise_lat_range(south: f64, north: f64) -> (f64, f64) {
    let mut south = clamp(snap(south), -90.0, 90.0);
    let mut north = clamp(snap(north), -90.0, 90.0);

    if south > north {
        std::mem::swap(&mut south, &mut north);
    }

    if south == north {
        north = (north + GRID_STEP).min(90.0);
        // Still flat at the pole
        if south == north {
            south -= GRID_STEP;
        }
    }

    (south, north)
}

/// Parse a single required coordinate parameter.
pub fn parse_coord(param: &'static str, raw: Option<&str>) -> Result<f64, BboxError> {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => return Err(BboxError::Missing(param)),
    };

    let value: f64 = raw.parse().map_err(|_| BboxError::InvalidNumber {
        param,
        value: raw.to_string(),
    })?;

    if !value.is_finite() {
        return Err(BboxError::NotFinite(param));
    }

    Ok(value)
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BboxError {
    #[error("Missing required parameter: {0}")]
    Missing(&'static str),

    #[error("Invalid number for '{param}': {value}")]
    InvalidNumber { param: &'static str, value: String },

    #[error("Parameter '{0}' must be a finite number")]
    NotFinite(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_box_widens_north() {
        let grid = BoundingBox::new(0.0, 10.0, 5.0, 10.0).to_grid_box().unwrap();
        assert_eq!(grid.south, 10.0);
        assert_eq!(grid.north, 10.5);
    }

    #[test]
    fn test_degenerate_box_at_pole() {
        let grid = BoundingBox::new(0.0, 90.0, 5.0, 90.0).to_grid_box().unwrap();
        assert_eq!(grid.south, 89.5);
        assert_eq!(grid.north, 90.0);
    }

    #[test]
    fn test_inverted_latitudes_swap() {
        let grid = BoundingBox::new(0.0, 40.2, 5.0, 30.1).to_grid_box().unwrap();
        assert_eq!(grid.south, 30.0);
        assert_eq!(grid.north, 40.0);
    }

    #[test]
    fn test_latitudes_clamped() {
        let grid = BoundingBox::new(0.0, -95.0, 5.0, 120.0).to_grid_box().unwrap();
        assert_eq!(grid.south, -90.0);
        assert_eq!(grid.north, 90.0);
    }

    #[test]
    fn test_box_across_greenwich_is_split() {
        let grid = BoundingBox::new(-10.0, 30.0, 10.0, 40.0).to_grid_box().unwrap();
        assert!(grid.lon.is_wrapped());
        assert_eq!(
            grid.lon_ranges(),
            vec![LonRange::new(350.0, 359.5), LonRange::new(0.0, 10.0)]
        );
    }

    #[test]
    fn test_box_across_dateline_is_single_range() {
        let grid = BoundingBox::new(170.0, 0.0, -170.0, 10.0).to_grid_box().unwrap();
        assert_eq!(grid.lon_ranges(), vec![LonRange::new(170.0, 190.0)]);
    }

    #[test]
    fn test_world_box_fetches_everything() {
        let grid = BoundingBox::new(-180.0, -90.0, 180.0, 90.0).to_grid_box().unwrap();
        assert_eq!(grid.lon, LonSpan::global());
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0).to_grid_box().unwrap_err();
        assert_eq!(err, BboxError::NotFinite("west"));
    }

    #[test]
    fn test_around_point() {
        let grid = GridBox::around_point(-33.9, 18.4).unwrap();
        assert_eq!(grid.south, -34.5);
        assert_eq!(grid.north, -33.5);
        assert_eq!(grid.lon_ranges(), vec![LonRange::new(18.0, 19.0)]);
    }

    #[test]
    fn test_around_point_at_grid_edge() {
        let grid = GridBox::around_point(90.0, 0.0).unwrap();
        assert_eq!(grid.north, 90.0);
        assert_eq!(grid.lon_ranges(), vec![LonRange::new(0.0, 0.5)]);
    }

    #[test]
    fn test_parse_coord() {
        assert_eq!(parse_coord("west", Some(" -10.5 ")), Ok(-10.5));
        assert_eq!(parse_coord("west", None), Err(BboxError::Missing("west")));
        assert_eq!(parse_coord("west", Some("")), Err(BboxError::Missing("west")));
        assert_eq!(
            parse_coord("north", Some("abc")),
            Err(BboxError::InvalidNumber {
                param: "north",
                value: "abc".to_string()
            })
        );
        assert_eq!(
            parse_coord("south", Some("NaN")),
            Err(BboxError::NotFinite("south"))
        );
    }
}
