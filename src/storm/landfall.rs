//! Landfall testing against land anchor points
//!
//! A coarse bounding-box proximity test, not great-circle distance: a
//! waypoint makes landfall when it is within the tolerance of an anchor on
//! both axes. The anchor set comes from an external reference file.

use crate::constants::track::LANDFALL_TOLERANCE_DEG;
use crate::error::{Error, Result};
use crate::storm::track::TrackPath;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A known land anchor point (e.g., a province centroid)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl LandPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            name: None,
            latitude,
            longitude,
        }
    }
}

/// Unordered collection of land anchor points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandReference {
    points: Vec<LandPoint>,
}

impl LandReference {
    pub fn new(points: Vec<LandPoint>) -> Self {
        Self { points }
    }

    /// An empty reference set (landfall is never reported)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON array of `{name?, latitude, longitude}` objects
    pub fn from_json(content: &str) -> Result<Self> {
        let reference: Self = serde_json::from_str(content)
            .map_err(|e| Error::LandReference(format!("Failed to parse land reference: {}", e)))?;

        if let Some(bad) = reference
            .points
            .iter()
            .find(|p| !p.latitude.is_finite() || !p.longitude.is_finite())
        {
            return Err(Error::LandReference(format!(
                "Non-finite land coordinate: {:?}",
                bad
            )));
        }
        Ok(reference)
    }

    /// Load the reference set from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::LandReference(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn points(&self) -> &[LandPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Is a `[lon, lat]` position strictly within `tolerance` of an anchor on both axes?
pub fn near_land(position: [f64; 2], land: &LandReference, tolerance: f64) -> bool {
    let [lon, lat] = position;
    land.points
        .iter()
        .any(|p| (lat - p.latitude).abs() < tolerance && (lon - p.longitude).abs() < tolerance)
}

/// Check every waypoint after the origin with the default tolerance
pub fn check_landfall(track: &TrackPath, land: &LandReference) -> bool {
    check_landfall_with(track, land, LANDFALL_TOLERANCE_DEG)
}

/// Check every waypoint after the origin
pub fn check_landfall_with(track: &TrackPath, land: &LandReference, tolerance: f64) -> bool {
    track
        .waypoints()
        .iter()
        .any(|&position| near_land(position, land, tolerance))
}
