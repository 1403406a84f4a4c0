//! Common test fixtures for wind field tests.

/// Request boxes as `(west, south, east, north)` in -180..180 degrees.
pub mod bbox {
    /// Straddles the Greenwich meridian, the 0/360 seam of the upstream grid.
    pub const GREENWICH: (f64, f64, f64, f64) = (-10.0, 30.0, 10.0, 40.0);

    /// Straddles the antimeridian of -180..180 (contiguous on 0..360).
    pub const PACIFIC: (f64, f64, f64, f64) = (170.0, 0.0, -170.0, 10.0);

    /// A small box east of Greenwich.
    pub const CAPE: (f64, f64, f64, f64) = (17.0, -35.0, 20.0, -33.0);

    /// Degenerate latitude range.
    pub const FLAT: (f64, f64, f64, f64) = (0.0, 10.0, 5.0, 10.0);

    /// Whole globe.
    pub const GLOBAL: (f64, f64, f64, f64) = (-180.0, -90.0, 180.0, 90.0);
}

/// Model times used by the scripted source.
pub mod times {
    /// What the scripted source reports as its newest time step.
    pub const LATEST: &str = "2020-06-01T18:00:00Z";
}
