//! Griddap query construction.
//!
//! A slice query selects both wind variables over one lat/lon box at one time:
//!
//! ```text
//! {base}/{dataset}.json?ugrd10m[(T)][(S):(N)][(W):(E)],vgrd10m[(T)][(S):(N)][(W):(E)]
//! ```
//!
//! No stride is given, so every grid line inside the box is returned.

use wind_common::{LonRange, TimeExpr, WindColumns};

/// One rectangular sub-box at one time, longitudes on the 0..360 grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceRequest {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
    pub time: TimeExpr,
}

impl SliceRequest {
    pub fn new(south: f64, north: f64, lon: LonRange, time: TimeExpr) -> Self {
        Self {
            south,
            north,
            west: lon.west,
            east: lon.east,
            time,
        }
    }
}

/// Where and what to query on the upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct GriddapEndpoint {
    /// Base griddap URL, e.g. `https://coastwatch.pfeg.noaa.gov/erddap/griddap`.
    pub base_url: String,
    /// Dataset identifier.
    pub dataset: String,
    /// Names of the wind component variables.
    pub columns: WindColumns,
    /// The dataset stores latitude north to south, so ranges go high to low.
    pub latitude_descending: bool,
}

impl GriddapEndpoint {
    fn dataset_url(&self) -> String {
        format!(
            "{}/{}.json",
            self.base_url.trim_end_matches('/'),
            self.dataset
        )
    }

    /// URL selecting both components over the request box.
    pub fn slice_url(&self, request: &SliceRequest) -> String {
        let (lat_from, lat_to) = if self.latitude_descending {
            (request.north, request.south)
        } else {
            (request.south, request.north)
        };

        let selector = format!(
            "[({})][({}):({})][({}):({})]",
            request.time.selector(),
            lat_from,
            lat_to,
            request.west,
            request.east
        );

        format!(
            "{}?{}{},{}{}",
            self.dataset_url(),
            self.columns.u,
            selector,
            self.columns.v,
            selector
        )
    }

    /// URL asking only for the newest time coordinate.
    pub fn latest_time_url(&self) -> String {
        format!("{}?time[(last)]", self.dataset_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn endpoint() -> GriddapEndpoint {
        GriddapEndpoint {
            base_url: "https://example.org/erddap/griddap/".to_string(),
            dataset: "NCEP_Global_Best".to_string(),
            columns: WindColumns::default(),
            latitude_descending: false,
        }
    }

    #[test]
    fn test_slice_url_explicit_time() {
        let time = TimeExpr::At(Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap());
        let req = SliceRequest::new(30.0, 40.0, LonRange::new(350.0, 359.5), time);

        assert_eq!(
            endpoint().slice_url(&req),
            "https://example.org/erddap/griddap/NCEP_Global_Best.json?\
             ugrd10m[(2024-01-15T12:00:00Z)][(30):(40)][(350):(359.5)],\
             vgrd10m[(2024-01-15T12:00:00Z)][(30):(40)][(350):(359.5)]"
        );
    }

    #[test]
    fn test_slice_url_latest() {
        let req = SliceRequest::new(-0.5, 0.5, LonRange::new(0.0, 0.5), TimeExpr::Latest);
        let url = endpoint().slice_url(&req);
        assert!(url.contains("ugrd10m[(last)][(-0.5):(0.5)][(0):(0.5)]"));
        assert!(url.contains(",vgrd10m[(last)]"));
    }

    #[test]
    fn test_descending_latitude_order() {
        let mut ep = endpoint();
        ep.latitude_descending = true;
        let req = SliceRequest::new(30.0, 40.0, LonRange::new(10.0, 20.0), TimeExpr::Latest);
        assert!(ep.slice_url(&req).contains("[(40):(30)]"));
    }

    #[test]
    fn test_latest_time_url() {
        assert_eq!(
            endpoint().latest_time_url(),
            "https://example.org/erddap/griddap/NCEP_Global_Best.json?time[(last)]"
        );
    }
}
