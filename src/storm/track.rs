//! Track construction from predicted proxy values
//!
//! A simplified kinematic proxy, not a physical track model. Each predicted
//! value nudges the storm westward, more sharply the further it sits below
//! the baseline, and every other step drifts one degree north.

use crate::constants::track::{BASELINE_PROXY, MAX_WAYPOINTS};
use crate::storm::StormCenter;
use serde::{Deserialize, Serialize};

/// Ordered `[lon, lat]` positions starting at the storm center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackPath {
    positions: Vec<[f64; 2]>,
}

impl TrackPath {
    /// Build a path from raw `[lon, lat]` positions
    pub fn from_positions(positions: Vec<[f64; 2]>) -> Self {
        Self { positions }
    }

    /// All positions, origin included
    pub fn positions(&self) -> &[[f64; 2]] {
        &self.positions
    }

    /// Positions after the origin
    pub fn waypoints(&self) -> &[[f64; 2]] {
        self.positions.get(1..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn into_positions(self) -> Vec<[f64; 2]> {
        self.positions
    }
}

/// Longitude step for one predicted value
pub fn lon_delta(value: f64) -> f64 {
    if value < BASELINE_PROXY {
        -2.0 * (1.0 - value / BASELINE_PROXY)
    } else {
        -1.0
    }
}

/// Latitude step for the `step`-th waypoint (0-based)
pub fn lat_delta(step: usize) -> f64 {
    if step % 2 == 0 {
        1.0
    } else {
        0.0
    }
}

/// Build a track with at most [`MAX_WAYPOINTS`] waypoints
pub fn build_track(center: StormCenter, predictions: &[f64]) -> TrackPath {
    build_track_with(center, predictions, MAX_WAYPOINTS)
}

/// Build a track with at most `max_waypoints` cumulative waypoints
///
/// Path length is `1 + min(max_waypoints, predictions.len())`.
pub fn build_track_with(center: StormCenter, predictions: &[f64], max_waypoints: usize) -> TrackPath {
    let mut positions = Vec::with_capacity(1 + max_waypoints.min(predictions.len()));
    let mut current = center.to_position();
    positions.push(current);

    for (step, &value) in predictions.iter().take(max_waypoints).enumerate() {
        current = [current[0] + lon_delta(value), current[1] + lat_delta(step)];
        positions.push(current);
    }

    TrackPath { positions }
}
