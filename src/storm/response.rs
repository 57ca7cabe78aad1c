//! Pipeline output shapes
//!
//! Every pass ends in exactly one of four JSON shapes:
//! - `{ "no_storm": true, "message": ... }`
//! - a fixed GeoJSON `FeatureCollection` placeholder track
//! - `{ "storm_detected": true, "center": [lat, lon], "track": LineString, "landfall_vn": bool, "warning": level }`
//! - `{ "error": ... }`

use crate::storm::track::TrackPath;
use crate::storm::{StormCenter, WarningLevel};
use serde::{Deserialize, Serialize};

/// Message returned when too few anomalies were found
pub const NO_STORM_MESSAGE: &str = "No storm detected";

/// Message returned when the grid could not be sampled in time
pub const NO_DATA_MESSAGE: &str = "No storm data available";

/// GeoJSON geometry subset used by the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    LineString { coordinates: Vec<[f64; 2]> },
    Point { coordinates: [f64; 2] },
}

/// GeoJSON feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry,
            properties: None,
        }
    }

    pub fn with_properties(mut self, properties: serde_json::Value) -> Self {
        self.properties = Some(properties);
        self
    }
}

/// GeoJSON feature collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }
}

/// Placeholder track returned when anomalies exist but none cluster
///
/// A fixed demonstration path so the response is always structurally
/// valid. Swap it through `StormDetector::with_fallback`.
pub fn demonstration_track() -> FeatureCollection {
    FeatureCollection::new(vec![
        Feature::new(Geometry::LineString {
            coordinates: vec![[118.0, 12.0], [117.0, 12.5], [116.0, 13.0], [114.5, 14.0]],
        }),
        Feature::new(Geometry::Point {
            coordinates: [114.5, 14.0],
        })
        .with_properties(serde_json::json!({ "name": "Storm center (t+0)" })),
    ])
}

/// `{ "no_storm": true, "message": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoStorm {
    pub no_storm: bool,
    pub message: String,
}

/// Normal detection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StormDetected {
    pub storm_detected: bool,
    /// `[lat, lon]`
    pub center: [f64; 2],
    pub track: Geometry,
    pub landfall_vn: bool,
    pub warning: WarningLevel,
}

/// `{ "error": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

/// Result of one pipeline pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StormResponse {
    NoStorm(NoStorm),
    Detected(StormDetected),
    Fallback(FeatureCollection),
    Error(ErrorPayload),
}

impl StormResponse {
    pub fn no_storm(message: impl Into<String>) -> Self {
        Self::NoStorm(NoStorm {
            no_storm: true,
            message: message.into(),
        })
    }

    pub fn detected(center: StormCenter, track: TrackPath, landfall: bool, warning: WarningLevel) -> Self {
        Self::Detected(StormDetected {
            storm_detected: true,
            center: [center.lat, center.lon],
            track: Geometry::LineString {
                coordinates: track.into_positions(),
            },
            landfall_vn: landfall,
            warning,
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorPayload {
            error: message.into(),
        })
    }

    /// Short name of the shape, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoStorm(_) => "no_storm",
            Self::Detected(_) => "storm_detected",
            Self::Fallback(_) => "fallback",
            Self::Error(_) => "error",
        }
    }

    /// Track coordinates, if the shape carries one
    pub fn track_positions(&self) -> Option<&[[f64; 2]]> {
        let geometry = match self {
            Self::Detected(d) => &d.track,
            Self::Fallback(fc) => &fc.features.first()?.geometry,
            _ => return None,
        };
        match geometry {
            Geometry::LineString { coordinates } => Some(coordinates),
            Geometry::Point { .. } => None,
        }
    }
}
