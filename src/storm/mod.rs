//! Storm detection and track pipeline
//!
//! This module handles:
//! - Sampling the weather grid over the region of interest
//! - Threshold-based anomaly detection per grid point
//! - Density-based clustering of anomalies into a storm candidate
//! - Track extrapolation, landfall testing and warning classification
//!
//! All values produced here live for a single pipeline pass; nothing is
//! persisted between passes.

pub mod anomaly;
pub mod cluster;
pub mod landfall;
pub mod pipeline;
pub mod response;
pub mod sampler;
pub mod track;
pub mod warning;

use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};

/// A grid point whose series satisfied the storm threshold rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub lat: f64,
    pub lon: f64,
    /// Minimum pressure over the whole series (hPa)
    pub intensity: f64,
    /// Maximum wind over the whole series (m/s)
    pub max_wind: f64,
}

impl Anomaly {
    /// Position of the anomaly
    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// Mean position of the dominant cluster
pub type StormCenter = Coordinates;

pub use pipeline::{DetectionParams, StormDetector};
pub use response::StormResponse;
pub use warning::WarningLevel;
