//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/storm-track/config.toml

pub mod defaults;

use crate::constants::{api, detection, track};
use crate::error::{Error, Result};
use crate::model::EstimatorKind;
use crate::storm::cluster::validate_radius;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Region of interest and grid spacing
    #[serde(default)]
    pub region: RegionConfig,

    /// Detection thresholds and track parameters
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Weather provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Track prediction model
    #[serde(default)]
    pub model: ModelConfig,

    /// Land reference geometry
    #[serde(default)]
    pub land: LandConfig,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Region of interest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    #[serde(default = "default_lat_min")]
    pub lat_min: f64,
    #[serde(default = "default_lat_max")]
    pub lat_max: f64,
    #[serde(default = "default_lon_min")]
    pub lon_min: f64,
    #[serde(default = "default_lon_max")]
    pub lon_max: f64,

    /// Grid step in degrees
    #[serde(default = "default_step")]
    pub step: f64,
}

/// Detection thresholds and track parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Pressure must fall strictly below this (hPa)
    #[serde(default = "default_pressure_threshold")]
    pub pressure_threshold_hpa: f64,

    /// Wind must rise strictly above this (m/s)
    #[serde(default = "default_wind_threshold")]
    pub wind_threshold_ms: f64,

    /// Anomalies needed before clustering is attempted
    #[serde(default = "default_min_anomalies")]
    pub min_anomalies: usize,

    /// Hours of each series examined
    #[serde(default = "default_horizon_hours")]
    pub horizon_hours: usize,

    /// Forecast days requested from the provider
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,

    /// DBSCAN neighborhood radius (degrees)
    #[serde(default = "default_cluster_radius")]
    pub cluster_radius_deg: f64,

    /// DBSCAN minimum neighborhood size
    #[serde(default = "default_cluster_min_size")]
    pub cluster_min_size: usize,

    /// Per-axis landfall tolerance (degrees)
    #[serde(default = "default_landfall_tolerance")]
    pub landfall_tolerance_deg: f64,

    /// Waypoints emitted after the origin
    #[serde(default = "default_track_waypoints")]
    pub track_waypoints: usize,

    /// Rollout steps
    #[serde(default = "default_prediction_steps")]
    pub prediction_steps: usize,
}

/// Weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Forecast endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Deadline for the whole grid in seconds
    #[serde(default = "default_deadline")]
    pub deadline_secs: u64,

    /// Maximum in-flight requests
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

/// Track prediction model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Which estimator to use
    #[serde(default)]
    pub estimator: EstimatorKind,

    /// Persisted model file; defaults to the data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Seed value for the temperature-like proxy
    #[serde(default = "default_seed_temperature")]
    pub seed_temperature: f64,
}

/// Land reference geometry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandConfig {
    /// JSON file of land anchor points; none means no landfall checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_path: Option<PathBuf>,
}

// Default value functions for serde
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_lat_min() -> f64 {
    DEFAULT_LAT_MIN
}
fn default_lat_max() -> f64 {
    DEFAULT_LAT_MAX
}
fn default_lon_min() -> f64 {
    DEFAULT_LON_MIN
}
fn default_lon_max() -> f64 {
    DEFAULT_LON_MAX
}
fn default_step() -> f64 {
    DEFAULT_GRID_STEP
}
fn default_pressure_threshold() -> f64 {
    detection::PRESSURE_THRESHOLD_HPA
}
fn default_wind_threshold() -> f64 {
    detection::WIND_THRESHOLD_MS
}
fn default_min_anomalies() -> usize {
    detection::MIN_ANOMALIES
}
fn default_horizon_hours() -> usize {
    detection::HORIZON_HOURS
}
fn default_forecast_days() -> u32 {
    detection::FORECAST_DAYS
}
fn default_cluster_radius() -> f64 {
    detection::CLUSTER_RADIUS_DEG
}
fn default_cluster_min_size() -> usize {
    detection::CLUSTER_MIN_SIZE
}
fn default_landfall_tolerance() -> f64 {
    track::LANDFALL_TOLERANCE_DEG
}
fn default_track_waypoints() -> usize {
    track::MAX_WAYPOINTS
}
fn default_prediction_steps() -> usize {
    track::PREDICTION_STEPS
}
fn default_base_url() -> String {
    api::OPEN_METEO_URL.to_string()
}
fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
fn default_deadline() -> u64 {
    DEFAULT_DEADLINE_SECS
}
fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}
fn default_seed_temperature() -> f64 {
    DEFAULT_SEED_TEMPERATURE
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            lat_min: default_lat_min(),
            lat_max: default_lat_max(),
            lon_min: default_lon_min(),
            lon_max: default_lon_max(),
            step: default_step(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            pressure_threshold_hpa: default_pressure_threshold(),
            wind_threshold_ms: default_wind_threshold(),
            min_anomalies: default_min_anomalies(),
            horizon_hours: default_horizon_hours(),
            forecast_days: default_forecast_days(),
            cluster_radius_deg: default_cluster_radius(),
            cluster_min_size: default_cluster_min_size(),
            landfall_tolerance_deg: default_landfall_tolerance(),
            track_waypoints: default_track_waypoints(),
            prediction_steps: default_prediction_steps(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            deadline_secs: default_deadline(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            estimator: EstimatorKind::default(),
            path: None,
            seed_temperature: default_seed_temperature(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Resolved model file: the configured path, else the data directory default
    pub fn model_path(&self) -> Option<PathBuf> {
        self.model
            .path
            .clone()
            .or_else(|| Self::data_dir().ok().map(|d| d.join(MODEL_FILE_NAME)))
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        let path_string = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        match parts.as_slice() {
            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["region", "lat_min"] => Some(self.region.lat_min.to_string()),
            ["region", "lat_max"] => Some(self.region.lat_max.to_string()),
            ["region", "lon_min"] => Some(self.region.lon_min.to_string()),
            ["region", "lon_max"] => Some(self.region.lon_max.to_string()),
            ["region", "step"] => Some(self.region.step.to_string()),

            ["detection", "pressure_threshold_hpa"] => {
                Some(self.detection.pressure_threshold_hpa.to_string())
            }
            ["detection", "wind_threshold_ms"] => Some(self.detection.wind_threshold_ms.to_string()),
            ["detection", "min_anomalies"] => Some(self.detection.min_anomalies.to_string()),
            ["detection", "horizon_hours"] => Some(self.detection.horizon_hours.to_string()),
            ["detection", "forecast_days"] => Some(self.detection.forecast_days.to_string()),
            ["detection", "cluster_radius_deg"] => {
                Some(self.detection.cluster_radius_deg.to_string())
            }
            ["detection", "cluster_min_size"] => Some(self.detection.cluster_min_size.to_string()),
            ["detection", "landfall_tolerance_deg"] => {
                Some(self.detection.landfall_tolerance_deg.to_string())
            }
            ["detection", "track_waypoints"] => Some(self.detection.track_waypoints.to_string()),
            ["detection", "prediction_steps"] => Some(self.detection.prediction_steps.to_string()),

            ["provider", "base_url"] => Some(self.provider.base_url.clone()),
            ["provider", "request_timeout_secs"] => {
                Some(self.provider.request_timeout_secs.to_string())
            }
            ["provider", "deadline_secs"] => Some(self.provider.deadline_secs.to_string()),
            ["provider", "max_concurrency"] => Some(self.provider.max_concurrency.to_string()),

            ["model", "estimator"] => Some(self.model.estimator.to_string()),
            ["model", "path"] => Some(path_string(&self.model.path)),
            ["model", "seed_temperature"] => Some(self.model.seed_temperature.to_string()),

            ["land", "reference_path"] => Some(path_string(&self.land.reference_path)),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong. An empty value
    /// clears optional paths.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse_value(key, value)?,

            ["region", "lat_min"] => self.region.lat_min = parse_value(key, value)?,
            ["region", "lat_max"] => self.region.lat_max = parse_value(key, value)?,
            ["region", "lon_min"] => self.region.lon_min = parse_value(key, value)?,
            ["region", "lon_max"] => self.region.lon_max = parse_value(key, value)?,
            ["region", "step"] => self.region.step = parse_value(key, value)?,

            ["detection", "pressure_threshold_hpa"] => {
                self.detection.pressure_threshold_hpa = parse_value(key, value)?
            }
            ["detection", "wind_threshold_ms"] => {
                self.detection.wind_threshold_ms = parse_value(key, value)?
            }
            ["detection", "min_anomalies"] => self.detection.min_anomalies = parse_value(key, value)?,
            ["detection", "horizon_hours"] => self.detection.horizon_hours = parse_value(key, value)?,
            ["detection", "forecast_days"] => self.detection.forecast_days = parse_value(key, value)?,
            ["detection", "cluster_radius_deg"] => {
                let radius = parse_value(key, value)?;
                validate_radius(radius)?;
                self.detection.cluster_radius_deg = radius;
            }
            ["detection", "cluster_min_size"] => {
                self.detection.cluster_min_size = parse_value(key, value)?
            }
            ["detection", "landfall_tolerance_deg"] => {
                self.detection.landfall_tolerance_deg = parse_value(key, value)?
            }
            ["detection", "track_waypoints"] => {
                self.detection.track_waypoints = parse_value(key, value)?
            }
            ["detection", "prediction_steps"] => {
                self.detection.prediction_steps = parse_value(key, value)?
            }

            ["provider", "base_url"] => self.provider.base_url = value.to_string(),
            ["provider", "request_timeout_secs"] => {
                self.provider.request_timeout_secs = parse_value(key, value)?
            }
            ["provider", "deadline_secs"] => self.provider.deadline_secs = parse_value(key, value)?,
            ["provider", "max_concurrency"] => {
                self.provider.max_concurrency = parse_value(key, value)?
            }

            ["model", "estimator"] => {
                self.model.estimator = value.parse().map_err(Error::Config)?;
            }
            ["model", "path"] => self.model.path = optional_path(value),
            ["model", "seed_temperature"] => {
                self.model.seed_temperature = parse_value(key, value)?
            }

            ["land", "reference_path"] => self.land.reference_path = optional_path(value),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "server.host",
            "server.port",
            "region.lat_min",
            "region.lat_max",
            "region.lon_min",
            "region.lon_max",
            "region.step",
            "detection.pressure_threshold_hpa",
            "detection.wind_threshold_ms",
            "detection.min_anomalies",
            "detection.horizon_hours",
            "detection.forecast_days",
            "detection.cluster_radius_deg",
            "detection.cluster_min_size",
            "detection.landfall_tolerance_deg",
            "detection.track_waypoints",
            "detection.prediction_steps",
            "provider.base_url",
            "provider.request_timeout_secs",
            "provider.deadline_secs",
            "provider.max_concurrency",
            "model.estimator",
            "model.path",
            "model.seed_temperature",
            "land.reference_path",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
