//! Weather provider backends
//!
//! This module defines the `WeatherProvider` trait and the hourly series it
//! returns. The grid sampler only depends on the trait, so the upstream
//! weather service can be swapped without touching the detection pipeline.
//!
//! ## Flex Point
//! Adding a new provider requires:
//! 1. Create `src/weather/{provider_name}.rs` implementing `WeatherProvider`
//! 2. Add `pub mod {provider_name};` below

pub mod open_meteo;

use crate::constants::api::TIME_FORMAT;
use crate::error::{Error, Result};
use crate::geo::GridPoint;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Trait for upstream weather sources
///
/// Implementations must be thread-safe (Send + Sync) because grid points are
/// fetched concurrently.
pub trait WeatherProvider: Send + Sync {
    /// Returns the provider name (e.g., "open-meteo")
    fn name(&self) -> &'static str;

    /// Fetch the forward-looking hourly pressure/wind series for one point
    ///
    /// # Arguments
    /// * `point` - Grid point to sample
    /// * `forecast_days` - Days of forecast requested upstream
    /// * `horizon_hours` - Leading hours kept in the returned series
    fn hourly_series(
        &self,
        point: GridPoint,
        forecast_days: u32,
        horizon_hours: usize,
    ) -> impl std::future::Future<Output = Result<SampleSeries>> + Send;
}

/// One hourly reading at a grid point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    pub time: NaiveDateTime,
    /// Mean sea level pressure in hPa
    pub pressure_hpa: f64,
    /// 10 m wind speed in m/s
    pub wind_speed_ms: f64,
}

/// Ordered hourly readings covering the detection horizon of one grid point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSeries {
    pub point: GridPoint,
    pub samples: Vec<HourlySample>,
}

impl SampleSeries {
    /// Build a series from parallel hourly arrays, keeping the first `horizon` hours
    ///
    /// The arrays are considered malformed if any of them is shorter than the
    /// horizon, or if a value or timestamp inside the horizon is missing or
    /// unparseable.
    pub fn from_hourly(
        point: GridPoint,
        times: &[String],
        pressures: &[Option<f64>],
        winds: &[Option<f64>],
        horizon: usize,
    ) -> Result<Self> {
        let available = times.len().min(pressures.len()).min(winds.len());
        if available < horizon {
            return Err(Error::MalformedSeries(format!(
                "({}, {}) has {} hourly values, need {}",
                point.lat, point.lon, available, horizon
            )));
        }

        let mut samples = Vec::with_capacity(horizon);
        for hour in 0..horizon {
            let time = NaiveDateTime::parse_from_str(&times[hour], TIME_FORMAT).map_err(|e| {
                Error::MalformedSeries(format!("invalid timestamp '{}': {}", times[hour], e))
            })?;

            let (pressure_hpa, wind_speed_ms) = match (pressures[hour], winds[hour]) {
                (Some(p), Some(w)) if p.is_finite() && w.is_finite() => (p, w),
                _ => {
                    return Err(Error::MalformedSeries(format!(
                        "({}, {}) missing reading at hour {}",
                        point.lat, point.lon, hour
                    )));
                }
            };

            samples.push(HourlySample {
                time,
                pressure_hpa,
                wind_speed_ms,
            });
        }

        Ok(Self { point, samples })
    }

    /// Lowest pressure in the series
    pub fn min_pressure(&self) -> Option<f64> {
        self.samples
            .iter()
            .map(|s| s.pressure_hpa)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Highest wind speed in the series
    pub fn max_wind(&self) -> Option<f64> {
        self.samples
            .iter()
            .map(|s| s.wind_speed_ms)
            .max_by(|a, b| a.total_cmp(b))
    }
}

/// Get the default weather provider
pub fn get_provider(base_url: &str, timeout_secs: u64) -> Result<open_meteo::OpenMeteoProvider> {
    open_meteo::OpenMeteoProvider::new(base_url, timeout_secs)
}
