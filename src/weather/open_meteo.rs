//! Open-Meteo forecast backend
//!
//! Uses the free Open-Meteo forecast API (no key required).
//! Wind is requested in m/s so detection thresholds apply without conversion.

use crate::constants::api::{HOURLY_VARIABLES, WIND_SPEED_UNIT};
use crate::error::{Error, Result};
use crate::geo::GridPoint;
use crate::weather::{SampleSeries, WeatherProvider};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("storm-track/", env!("CARGO_PKG_VERSION"));

/// Open-Meteo weather provider
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    client: reqwest::Client,
    base_url: String,
}

/// Forecast response body
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    hourly: Option<HourlyBlock>,
}

/// Parallel hourly arrays; Open-Meteo emits `null` for unavailable hours
#[derive(Debug, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    pressure_msl: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
}

/// Error body: `{"error": true, "reason": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    reason: Option<String>,
}

impl OpenMeteoProvider {
    /// Create a provider against the given forecast endpoint
    ///
    /// # Arguments
    /// * `base_url` - Forecast endpoint, e.g. `https://api.open-meteo.com/v1/forecast`
    /// * `timeout_secs` - Per-request timeout
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Endpoint this provider queries
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl WeatherProvider for OpenMeteoProvider {
    fn name(&self) -> &'static str {
        "open-meteo"
    }

    async fn hourly_series(
        &self,
        point: GridPoint,
        forecast_days: u32,
        horizon_hours: usize,
    ) -> Result<SampleSeries> {
        debug!("Fetching hourly series for ({}, {})", point.lat, point.lon);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", point.lat.to_string()),
                ("longitude", point.lon.to_string()),
                ("hourly", HOURLY_VARIABLES.to_string()),
                ("forecast_days", forecast_days.to_string()),
                ("wind_speed_unit", WIND_SPEED_UNIT.to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Open-Meteo request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let reason = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.reason)
                .unwrap_or_else(|| "no reason given".to_string());
            return Err(Error::Provider(format!(
                "Open-Meteo returned status {}: {}",
                status, reason
            )));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| Error::MalformedSeries(format!("Failed to parse Open-Meteo response: {}", e)))?;

        let hourly = body.hourly.ok_or_else(|| {
            Error::MalformedSeries("Open-Meteo response has no hourly block".to_string())
        })?;

        SampleSeries::from_hourly(
            point,
            &hourly.time,
            &hourly.pressure_msl,
            &hourly.wind_speed_10m,
            horizon_hours,
        )
    }
}
