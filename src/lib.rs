//! storm-track: storm detection and short-horizon track extrapolation
//!
//! A library and CLI tool that samples a weather grid over a region of
//! interest, flags storm-like grid points, clusters them into a storm
//! candidate and extrapolates a coarse track.
//!
//! ## Features
//!
//! - Concurrent grid sampling from Open-Meteo (pluggable `WeatherProvider`)
//! - Threshold-based anomaly detection and DBSCAN clustering
//! - Autoregressive track rollout over a reloadable estimator
//! - Landfall check against a land reference and warning classification
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use storm_track::geo::Coordinates;
//! use storm_track::storm::track::build_track;
//! use storm_track::storm::warning::classify;
//!
//! let center = Coordinates::new(15.0, 111.0);
//! let track = build_track(center, &[25.0, 24.0, 23.5]);
//! println!("Track: {:?}", track.positions());
//! println!("Warning: {}", classify(38.0));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod geo;
pub mod model;
pub mod server;
pub mod storm;
pub mod weather;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use geo::{BoundingBox, Coordinates};
pub use storm::{DetectionParams, StormDetector, StormResponse, WarningLevel};
