//! Server shared state
//!
//! Holds configuration and the detector shared by all requests.

use crate::config::Config;
use crate::error::Result;
use crate::model::ModelHandle;
use crate::storm::StormDetector;
use crate::weather::open_meteo::OpenMeteoProvider;
use std::time::Instant;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Config,

    detector: StormDetector<OpenMeteoProvider>,
    started_at: Instant,
}

impl AppState {
    /// Create application state around an existing detector
    pub fn new(config: Config, detector: StormDetector<OpenMeteoProvider>) -> Self {
        Self {
            config,
            detector,
            started_at: Instant::now(),
        }
    }

    /// Build the detector from configuration and wrap it
    pub async fn build(config: Config) -> Result<Self> {
        let detector = StormDetector::from_config(&config).await?;
        Ok(Self::new(config, detector))
    }

    pub fn detector(&self) -> &StormDetector<OpenMeteoProvider> {
        &self.detector
    }

    pub fn model(&self) -> &ModelHandle {
        self.detector.model()
    }

    /// Number of lattice points one pass samples (0 if the region is invalid)
    pub fn grid_points(&self) -> usize {
        let params = self.detector.params();
        params
            .region
            .lattice(params.grid_step)
            .map(|points| points.len())
            .unwrap_or(0)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
