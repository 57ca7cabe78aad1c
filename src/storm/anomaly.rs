//! Threshold-based anomaly detection
//!
//! A grid point is storm-like when, within a single hour of its series,
//! pressure drops below the pressure threshold while wind exceeds the wind
//! threshold.

use crate::constants::detection::{PRESSURE_THRESHOLD_HPA, WIND_THRESHOLD_MS};
use crate::storm::Anomaly;
use crate::weather::SampleSeries;
use serde::{Deserialize, Serialize};

/// Threshold pair of the storm rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Pressure must be strictly below this (hPa)
    pub pressure_hpa: f64,
    /// Wind must be strictly above this (m/s)
    pub wind_ms: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            pressure_hpa: PRESSURE_THRESHOLD_HPA,
            wind_ms: WIND_THRESHOLD_MS,
        }
    }
}

/// Does any single hour satisfy both thresholds?
pub fn is_storm_like(series: &SampleSeries, thresholds: &Thresholds) -> bool {
    series
        .samples
        .iter()
        .any(|s| s.pressure_hpa < thresholds.pressure_hpa && s.wind_speed_ms > thresholds.wind_ms)
}

/// Evaluate one series
///
/// The anomaly's intensity and max wind are extrema over the full series,
/// not only the hour that triggered the rule.
pub fn evaluate(series: &SampleSeries, thresholds: &Thresholds) -> Option<Anomaly> {
    if !is_storm_like(series, thresholds) {
        return None;
    }

    Some(Anomaly {
        lat: series.point.lat,
        lon: series.point.lon,
        intensity: series.min_pressure()?,
        max_wind: series.max_wind()?,
    })
}

/// Flag every storm-like series, preserving input order
pub fn detect_anomalies(series: &[SampleSeries], thresholds: &Thresholds) -> Vec<Anomaly> {
    series
        .iter()
        .filter_map(|s| evaluate(s, thresholds))
        .collect()
}
