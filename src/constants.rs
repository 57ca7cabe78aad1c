//! Centralized constants for the storm-track crate
//!
//! Values shared by the configuration defaults and the pipeline stages.

/// External API endpoints
pub mod api {
    /// Open-Meteo hourly forecast endpoint
    pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

    /// Hourly variables requested per grid point
    pub const HOURLY_VARIABLES: &str = "pressure_msl,wind_speed_10m";

    /// Wind unit requested from the provider (thresholds are in m/s)
    pub const WIND_SPEED_UNIT: &str = "ms";

    /// Timestamp layout of Open-Meteo `hourly.time` entries
    pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
}

/// Storm detection thresholds
pub mod detection {
    /// Pressure below which an hour counts as storm-like (hPa)
    pub const PRESSURE_THRESHOLD_HPA: f64 = 980.0;

    /// Wind speed above which an hour counts as storm-like (m/s)
    pub const WIND_THRESHOLD_MS: f64 = 33.0;

    /// Fewer anomalies than this short-circuits to "no storm"
    pub const MIN_ANOMALIES: usize = 3;

    /// Hours of each series examined by the detector
    pub const HORIZON_HOURS: usize = 24;

    /// Forecast days requested from the provider
    pub const FORECAST_DAYS: u32 = 3;

    /// DBSCAN neighborhood radius in degrees
    pub const CLUSTER_RADIUS_DEG: f64 = 2.0;

    /// DBSCAN minimum samples (the point itself included)
    pub const CLUSTER_MIN_SIZE: usize = 3;

    /// Upper bound on lattice points sampled in one pass
    pub const MAX_GRID_POINTS: usize = 10_000;
}

/// Track extrapolation constants
pub mod track {
    /// Number of autoregressive steps
    pub const PREDICTION_STEPS: usize = 24;

    /// Maximum number of waypoints appended after the storm center
    pub const MAX_WAYPOINTS: usize = 3;

    /// Baseline of the temperature-like proxy value
    pub const BASELINE_PROXY: f64 = 25.0;

    /// Per-step pressure decay factor applied during rollout
    pub const PRESSURE_DECAY: f64 = 0.99;

    /// Per-step wind growth factor applied during rollout
    pub const WIND_GROWTH: f64 = 1.01;

    /// Coarse landfall tolerance in degrees (both axes)
    pub const LANDFALL_TOLERANCE_DEG: f64 = 0.5;
}
