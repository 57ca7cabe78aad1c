//! Storm detection pipeline
//!
//! GridSampler -> AnomalyDetector -> SpatialClusterer -> rollout ->
//! TrackBuilder -> LandfallChecker + WarningClassifier. One pass runs to
//! completion per call and shares nothing mutable with other passes except
//! the read-only estimator behind the [`ModelHandle`].

use crate::config::Config;
use crate::error::Result;
use crate::geo::BoundingBox;
use crate::model::{AutoregressiveRollout, FeatureRow, ModelHandle, TrackPredictor};
use crate::storm::anomaly::{detect_anomalies, Thresholds};
use crate::storm::cluster::{dominant_cluster, Dbscan};
use crate::storm::landfall::{check_landfall_with, LandReference};
use crate::storm::response::{demonstration_track, FeatureCollection, NO_DATA_MESSAGE, NO_STORM_MESSAGE};
use crate::storm::sampler::{sample_grid, SamplerOptions};
use crate::storm::track::build_track_with;
use crate::storm::warning::classify;
use crate::storm::StormResponse;
use crate::weather::open_meteo::OpenMeteoProvider;
use crate::weather::{get_provider, WeatherProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Every tunable of a pipeline pass
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionParams {
    pub region: BoundingBox,
    pub grid_step: f64,
    pub sampler: SamplerOptions,
    pub thresholds: Thresholds,
    pub min_anomalies: usize,
    pub clustering: Dbscan,
    pub prediction_steps: usize,
    pub track_waypoints: usize,
    pub landfall_tolerance: f64,
    /// Seed `temp_lag1` when no observation is available
    pub seed_temperature: f64,
}

impl DetectionParams {
    /// Collect the pipeline parameters from configuration
    pub fn from_config(config: &Config) -> Self {
        let region = &config.region;
        let detection = &config.detection;
        let provider = &config.provider;

        Self {
            region: BoundingBox::new(region.lat_min, region.lat_max, region.lon_min, region.lon_max),
            grid_step: region.step,
            sampler: SamplerOptions {
                forecast_days: detection.forecast_days,
                horizon_hours: detection.horizon_hours,
                max_concurrency: provider.max_concurrency,
                deadline: Duration::from_secs(provider.deadline_secs),
            },
            thresholds: Thresholds {
                pressure_hpa: detection.pressure_threshold_hpa,
                wind_ms: detection.wind_threshold_ms,
            },
            min_anomalies: detection.min_anomalies,
            clustering: Dbscan::new(detection.cluster_radius_deg, detection.cluster_min_size),
            prediction_steps: detection.prediction_steps,
            track_waypoints: detection.track_waypoints,
            landfall_tolerance: detection.landfall_tolerance_deg,
            seed_temperature: config.model.seed_temperature,
        }
    }
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Load the configured land reference, or an empty set when none is configured
pub fn load_land_reference(config: &Config) -> Result<LandReference> {
    match &config.land.reference_path {
        Some(path) => {
            let land = LandReference::load(path)?;
            info!("Loaded {} land anchor points from {}", land.len(), path.display());
            Ok(land)
        }
        None => {
            info!("No land reference configured; landfall checks always report false");
            Ok(LandReference::empty())
        }
    }
}

/// Runs the full detection pipeline against a weather provider
pub struct StormDetector<P> {
    provider: Arc<P>,
    model: ModelHandle,
    land: Arc<LandReference>,
    params: DetectionParams,
    fallback: fn() -> FeatureCollection,
}

impl StormDetector<OpenMeteoProvider> {
    /// Build a detector against Open-Meteo from configuration
    ///
    /// The model is loaded eagerly; a load failure is logged and retried on
    /// the first pass, which then reports it as an error payload.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let provider = get_provider(&config.provider.base_url, config.provider.request_timeout_secs)?;
        let land = load_land_reference(config)?;
        let model = ModelHandle::new(config.model.estimator, config.model_path());

        if let Err(e) = model.load().await {
            warn!("Model not loaded at startup: {}", e);
        }

        Ok(Self::new(
            Arc::new(provider),
            model,
            Arc::new(land),
            DetectionParams::from_config(config),
        ))
    }
}

impl<P> StormDetector<P>
where
    P: WeatherProvider + 'static,
{
    pub fn new(provider: Arc<P>, model: ModelHandle, land: Arc<LandReference>, params: DetectionParams) -> Self {
        Self {
            provider,
            model,
            land,
            params,
            fallback: demonstration_track,
        }
    }

    /// Replace the placeholder returned when no cluster forms
    pub fn with_fallback(mut self, fallback: fn() -> FeatureCollection) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    pub fn land(&self) -> &LandReference {
        &self.land
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run one pass; every failure becomes an error payload
    pub async fn run(&self) -> StormResponse {
        let request_id = Uuid::new_v4();
        let span = info_span!("storm_track", %request_id);

        async {
            let response = match self.detect().await {
                Ok(response) => response,
                Err(e) => {
                    warn!("Storm detection failed: {}", e);
                    StormResponse::error(e.to_string())
                }
            };
            info!("Storm detection finished: {}", response.kind());
            response
        }
        .instrument(span)
        .await
    }

    /// Run one pass, surfacing failures as errors
    pub async fn detect(&self) -> Result<StormResponse> {
        let params = &self.params;
        let points = params.region.lattice(params.grid_step)?;
        params.clustering.validate()?;
        info!(
            "Sampling {} grid points from {}",
            points.len(),
            self.provider.name()
        );

        let outcome = sample_grid(Arc::clone(&self.provider), &points, &params.sampler).await;
        if outcome.timed_out {
            return Ok(StormResponse::no_storm(NO_DATA_MESSAGE));
        }

        let anomalies = detect_anomalies(&outcome.series, &params.thresholds);
        info!(
            "{} anomalies across {} sampled points ({} skipped)",
            anomalies.len(),
            outcome.series.len(),
            outcome.failed
        );
        if anomalies.len() < params.min_anomalies {
            return Ok(StormResponse::no_storm(NO_STORM_MESSAGE));
        }

        let coords: Vec<_> = anomalies.iter().map(|a| a.coords()).collect();
        let labels = params.clustering.fit(&coords);
        let Some(cluster) = dominant_cluster(&anomalies, &labels) else {
            info!("No anomaly cluster formed; returning placeholder track");
            return Ok(StormResponse::Fallback((self.fallback)()));
        };
        debug!(
            "Dominant cluster {} with {} members, center ({:.3}, {:.3})",
            cluster.label,
            cluster.members.len(),
            cluster.center.lat,
            cluster.center.lon
        );

        let estimator = self.model.get_or_load().await?;
        let predictor = AutoregressiveRollout::new(estimator).with_steps(params.prediction_steps);
        let seed = FeatureRow::new(params.seed_temperature, cluster.min_pressure, cluster.max_wind);
        let predictions = predictor.predict_sequence(seed)?;

        let track = build_track_with(cluster.center, &predictions, params.track_waypoints);

        let landfall = check_landfall_with(&track, &self.land, params.landfall_tolerance);
        let warning = classify(cluster.max_wind);

        Ok(StormResponse::detected(cluster.center, track, landfall, warning))
    }
}
