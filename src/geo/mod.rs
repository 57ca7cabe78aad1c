//! Geographic primitives
//!
//! Coordinates, the region of interest, and the regular lattice of grid
//! points sampled over it.

use crate::constants::detection::MAX_GRID_POINTS;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tolerance used when deciding whether a lattice step reaches the range end
const LATTICE_EPSILON: f64 = 1e-9;

/// A geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidRegion(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(Error::InvalidRegion(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lon
            )));
        }
        Ok(())
    }

    /// GeoJSON position order: `[lon, lat]`
    pub fn to_position(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// A grid point of the sampling lattice
pub type GridPoint = Coordinates;

/// Region of interest sampled on a regular lattice
///
/// Ranges are half-open: `lat_min` is sampled, `lat_max` is not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    /// Create a new bounding box
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Check that the box is non-empty and inside valid coordinate ranges
    pub fn validate(&self) -> Result<()> {
        Coordinates::new(self.lat_min, self.lon_min).validate()?;
        Coordinates::new(self.lat_max, self.lon_max).validate()?;

        if self.lat_min >= self.lat_max || self.lon_min >= self.lon_max {
            return Err(Error::InvalidRegion(format!(
                "Empty bounding box: lat [{}, {}), lon [{}, {})",
                self.lat_min, self.lat_max, self.lon_min, self.lon_max
            )));
        }
        Ok(())
    }

    /// Enumerate lattice points row by row (latitude outer, longitude inner)
    ///
    /// # Arguments
    /// * `step` - Lattice spacing in degrees, applied on both axes
    pub fn lattice(&self, step: f64) -> Result<Vec<GridPoint>> {
        self.validate()?;
        if !step.is_finite() || step <= 0.0 {
            return Err(Error::InvalidRegion(format!(
                "Grid step must be positive, got {}",
                step
            )));
        }

        let count = axis_len(self.lat_min, self.lat_max, step)
            * axis_len(self.lon_min, self.lon_max, step);
        if count > MAX_GRID_POINTS as f64 {
            return Err(Error::InvalidRegion(format!(
                "Grid of {} points exceeds the limit of {}",
                count, MAX_GRID_POINTS
            )));
        }

        let lats = axis(self.lat_min, self.lat_max, step);
        let lons = axis(self.lon_min, self.lon_max, step);

        let mut points = Vec::with_capacity(lats.len() * lons.len());
        for &lat in &lats {
            for &lon in &lons {
                points.push(Coordinates::new(lat, lon));
            }
        }
        Ok(points)
    }
}

/// Number of values [`axis`] yields, without enumerating them
fn axis_len(start: f64, end: f64, step: f64) -> f64 {
    ((end - LATTICE_EPSILON - start) / step).ceil().max(0.0)
}

/// Values `start, start + step, ...` strictly below `end`
///
/// Each value is computed by multiplication so rounding does not accumulate.
fn axis(start: f64, end: f64, step: f64) -> Vec<f64> {
    let mut values = Vec::new();
    let mut i = 0usize;
    loop {
        let value = start + i as f64 * step;
        if value >= end - LATTICE_EPSILON {
            break;
        }
        values.push(value);
        i += 1;
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_region_lattice_is_5x5() {
        let bbox = BoundingBox::new(10.0, 20.0, 108.0, 118.0);
        let points = bbox.lattice(2.0).unwrap();

        assert_eq!(points.len(), 25);
        assert_eq!(points[0], Coordinates::new(10.0, 108.0));
        assert_eq!(points[4], Coordinates::new(10.0, 116.0));
        assert_eq!(points[24], Coordinates::new(18.0, 116.0));
    }

    #[test]
    fn test_lattice_excludes_range_end() {
        let bbox = BoundingBox::new(10.0, 20.0, 108.0, 116.0);
        let points = bbox.lattice(2.0).unwrap();

        // 5 latitudes x 4 longitudes, like numpy's arange
        assert_eq!(points.len(), 20);
        assert!(points.iter().all(|p| p.lat < 20.0 && p.lon < 116.0));
    }

    #[test]
    fn test_lattice_fractional_step() {
        let bbox = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        let points = bbox.lattice(0.1).unwrap();
        assert_eq!(points.len(), 100);
    }

    #[test]
    fn test_lattice_rejects_bad_step() {
        let bbox = BoundingBox::new(10.0, 20.0, 108.0, 118.0);
        assert!(bbox.lattice(0.0).is_err());
        assert!(bbox.lattice(-1.0).is_err());
        assert!(bbox.lattice(f64::NAN).is_err());
    }

    #[test]
    fn test_lattice_point_limit() {
        let bbox = BoundingBox::new(0.0, 10.0, 0.0, 10.0);
        assert_eq!(bbox.lattice(0.1).unwrap().len(), MAX_GRID_POINTS);

        let whole_globe = BoundingBox::new(-80.0, 80.0, -170.0, 170.0);
        assert!(matches!(
            whole_globe.lattice(0.5),
            Err(Error::InvalidRegion(_))
        ));
        assert!(matches!(
            bbox.lattice(1e-9),
            Err(Error::InvalidRegion(_))
        ));
    }

    #[test]
    fn test_empty_box_rejected() {
        let bbox = BoundingBox::new(20.0, 10.0, 108.0, 118.0);
        assert!(bbox.validate().is_err());
    }

    #[test]
    fn test_coordinates_validate() {
        assert!(Coordinates::new(16.0, 108.0).validate().is_ok());
        assert!(Coordinates::new(91.0, 108.0).validate().is_err());
        assert!(Coordinates::new(16.0, 181.0).validate().is_err());
    }

    #[test]
    fn test_position_order() {
        assert_eq!(Coordinates::new(12.0, 110.0).to_position(), [110.0, 12.0]);
    }
}
