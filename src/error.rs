//! Error types for storm-track

use thiserror::Error;

/// Main error type for storm-track operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Weather provider error: {0}")]
    Provider(String),

    #[error("Malformed series: {0}")]
    MalformedSeries(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Prediction error: {0}")]
    Prediction(String),

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Land reference error: {0}")]
    LandReference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for storm-track operations
pub type Result<T> = std::result::Result<T, Error>;
