//! Wind vector math.
//!
//! Meteorological convention: 0° = wind from North, 90° = from East.

/// Metres per second to kilometres per hour.
pub const MS_TO_KMH: f64 = 3.6;

/// A horizontal wind vector in m/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindVector {
    /// Eastward component.
    pub u: f64,
    /// Northward component.
    pub v: f64,
}

impl WindVector {
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    pub fn speed_ms(&self) -> f64 {
        self.u.hypot(self.v)
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed_ms() * MS_TO_KMH
    }

    /// Compass bearing the vector points towards, in `[0, 360)`.
    pub fn to_bearing(&self) -> f64 {
        let bearing = self.u.atan2(self.v).to_degrees().rem_euclid(360.0);
        // rem_euclid rounds tiny negative angles up to exactly 360
        if bearing >= 360.0 {
            0.0
        } else {
            bearing
        }
    }

    /// Compass bearing the wind blows from, in `[0, 360)`.
    pub fn from_bearing(&self) -> f64 {
        (self.to_bearing() + 180.0) % 360.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_north_wind() {
        // Blowing due south, so it comes from the north
        let w = WindVector::new(0.0, -5.0);
        assert!(approx(w.from_bearing(), 0.0));
        assert!(approx(w.speed_ms(), 5.0));
    }

    #[test]
    fn test_cardinal_sources() {
        assert!(approx(WindVector::new(-10.0, 0.0).from_bearing(), 90.0));
        assert!(approx(WindVector::new(0.0, 10.0).from_bearing(), 180.0));
        assert!(approx(WindVector::new(10.0, 0.0).from_bearing(), 270.0));
    }

    #[test]
    fn test_diagonal() {
        // Blowing towards the north-east, from the south-west
        let w = WindVector::new(3.0, 3.0);
        assert!(approx(w.to_bearing(), 45.0));
        assert!(approx(w.from_bearing(), 225.0));
    }

    #[test]
    fn test_speed_conversion() {
        let w = WindVector::new(3.0, 4.0);
        assert!(approx(w.speed_ms(), 5.0));
        assert!(approx(w.speed_kmh(), 18.0));
    }

    #[test]
    fn test_bearing_just_west_of_north() {
        let w = WindVector::new(-1e-20, 1.0);
        assert_eq!(w.to_bearing(), 0.0);
        assert_eq!(w.from_bearing(), 180.0);
    }

    #[test]
    fn test_bearing_range() {
        for (u, v) in [(0.0, 0.0), (-1.0, -1.0), (1.0, -0.001), (-0.001, 1.0)] {
            let b = WindVector::new(u, v).from_bearing();
            assert!((0.0..360.0).contains(&b), "bearing {} for ({}, {})", b, u, v);
        }
    }
}
