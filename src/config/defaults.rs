//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7979;

/// Region of interest (degrees), half-open on the upper bounds
pub const DEFAULT_LAT_MIN: f64 = 10.0;
pub const DEFAULT_LAT_MAX: f64 = 20.0;
pub const DEFAULT_LON_MIN: f64 = 108.0;
pub const DEFAULT_LON_MAX: f64 = 118.0;

/// Grid step in degrees
pub const DEFAULT_GRID_STEP: f64 = 2.0;

/// Per-request timeout against the weather provider
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Deadline for sampling the whole grid
pub const DEFAULT_DEADLINE_SECS: u64 = 30;

/// Maximum in-flight provider requests
pub const DEFAULT_MAX_CONCURRENCY: usize = 25;

/// Seed value for the temperature-like proxy
pub const DEFAULT_SEED_TEMPERATURE: f64 = 25.0;

/// Persisted model file name (under the data directory)
pub const MODEL_FILE_NAME: &str = "storm_model.json";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "storm-track";
