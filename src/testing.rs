//! Shared test fixtures
//!
//! An in-memory weather provider and an in-process fake of the Open-Meteo
//! endpoint, so pipeline and HTTP tests never touch the network.

use crate::error::{Error, Result};
use crate::geo::{Coordinates, GridPoint};
use crate::weather::{HourlySample, SampleSeries, WeatherProvider};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const CALM_PRESSURE: f64 = 1008.0;
pub const CALM_WIND: f64 = 8.0;
pub const STORM_PRESSURE: f64 = 975.0;
pub const STORM_WIND: f64 = 35.0;

/// Hour (within the horizon) at which storm points peak
const STORM_HOUR: usize = 5;

fn start_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 18)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap()
}

fn same_point(a: &GridPoint, b: &GridPoint) -> bool {
    (a.lat - b.lat).abs() < 1e-9 && (a.lon - b.lon).abs() < 1e-9
}

/// `hours` readings: calm everywhere, with one storm hour reaching `peak_wind`
pub fn storm_readings(hours: usize, peak_wind: f64) -> Vec<(f64, f64)> {
    (0..hours)
        .map(|h| {
            if h == STORM_HOUR {
                (STORM_PRESSURE, peak_wind)
            } else {
                (1002.0, 12.0)
            }
        })
        .collect()
}

/// `hours` calm readings
pub fn calm_readings(hours: usize) -> Vec<(f64, f64)> {
    vec![(CALM_PRESSURE, CALM_WIND); hours]
}

/// Build a series at `point` from `(pressure, wind)` pairs
pub fn series_from(point: GridPoint, readings: &[(f64, f64)]) -> SampleSeries {
    let start = start_time();
    SampleSeries {
        point,
        samples: readings
            .iter()
            .enumerate()
            .map(|(h, &(pressure_hpa, wind_speed_ms))| HourlySample {
                time: start + ChronoDuration::hours(h as i64),
                pressure_hpa,
                wind_speed_ms,
            })
            .collect(),
    }
}

enum FixedEntry {
    Readings(Vec<(f64, f64)>),
    Failure,
}

/// In-memory provider: unknown points are calm
#[derive(Default)]
pub struct FixedProvider {
    entries: Vec<(GridPoint, FixedEntry)>,
    delay: Option<Duration>,
}

impl FixedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storm(self, point: GridPoint, peak_wind: f64) -> Self {
        self.with_readings(point, storm_readings(72, peak_wind))
    }

    pub fn with_readings(mut self, point: GridPoint, readings: Vec<(f64, f64)>) -> Self {
        self.entries.push((point, FixedEntry::Readings(readings)));
        self
    }

    pub fn with_failure(mut self, point: GridPoint) -> Self {
        self.entries.push((point, FixedEntry::Failure));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl WeatherProvider for FixedProvider {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn hourly_series(
        &self,
        point: GridPoint,
        _forecast_days: u32,
        horizon_hours: usize,
    ) -> Result<SampleSeries> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let entry = self.entries.iter().find(|(p, _)| same_point(p, &point));
        match entry {
            Some((_, FixedEntry::Failure)) => {
                Err(Error::Provider(format!("no data for ({}, {})", point.lat, point.lon)))
            }
            Some((_, FixedEntry::Readings(readings))) => {
                if readings.len() < horizon_hours {
                    return Err(Error::MalformedSeries("short series".to_string()));
                }
                Ok(series_from(point, &readings[..horizon_hours]))
            }
            None => Ok(series_from(point, &calm_readings(horizon_hours))),
        }
    }
}

/// Builder for an in-process fake of the Open-Meteo forecast endpoint
#[derive(Default, Clone)]
pub struct FakeUpstream {
    storms: Vec<(Coordinates, f64)>,
    malformed: Vec<Coordinates>,
    failures: Vec<Coordinates>,
}

/// A running fake upstream; aborted on drop
pub struct RunningUpstream {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl RunningUpstream {
    pub fn url(&self) -> String {
        format!("http://{}/v1/forecast", self.addr)
    }
}

impl Drop for RunningUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storm(self, point: Coordinates) -> Self {
        self.with_storm_wind(point, STORM_WIND)
    }

    pub fn with_storm_wind(mut self, point: Coordinates, peak_wind: f64) -> Self {
        self.storms.push((point, peak_wind));
        self
    }

    pub fn with_malformed(mut self, point: Coordinates) -> Self {
        self.malformed.push(point);
        self
    }

    pub fn with_failure(mut self, point: Coordinates) -> Self {
        self.failures.push(point);
        self
    }

    pub async fn spawn(self) -> RunningUpstream {
        let app = Router::new()
            .route("/v1/forecast", get(forecast_handler))
            .with_state(Arc::new(self));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        RunningUpstream { addr, handle }
    }
}

fn hourly_payload(readings: &[(f64, f64)]) -> serde_json::Value {
    let start = start_time();
    let time: Vec<String> = (0..readings.len())
        .map(|h| {
            (start + ChronoDuration::hours(h as i64))
                .format(crate::constants::api::TIME_FORMAT)
                .to_string()
        })
        .collect();
    let pressure: Vec<f64> = readings.iter().map(|r| r.0).collect();
    let wind: Vec<f64> = readings.iter().map(|r| r.1).collect();

    json!({
        "latitude": 0.0,
        "longitude": 0.0,
        "hourly_units": { "pressure_msl": "hPa", "wind_speed_10m": "m/s" },
        "hourly": {
            "time": time,
            "pressure_msl": pressure,
            "wind_speed_10m": wind,
        }
    })
}

async fn forecast_handler(
    State(fake): State<Arc<FakeUpstream>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let lat = params.get("latitude").and_then(|v| v.parse::<f64>().ok());
    let lon = params.get("longitude").and_then(|v| v.parse::<f64>().ok());
    let point = match (lat, lon) {
        (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": true, "reason": "missing coordinates" })),
            )
                .into_response();
        }
    };

    if fake.failures.iter().any(|p| same_point(p, &point)) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": true, "reason": "upstream unavailable" })),
        )
            .into_response();
    }

    if fake.malformed.iter().any(|p| same_point(p, &point)) {
        return Json(hourly_payload(&calm_readings(10))).into_response();
    }

    let readings = match fake.storms.iter().find(|(p, _)| same_point(p, &point)) {
        Some((_, wind)) => storm_readings(72, *wind),
        None => calm_readings(72),
    };
    Json(hourly_payload(&readings)).into_response()
}
