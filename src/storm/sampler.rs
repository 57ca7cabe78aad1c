//! Grid sampling
//!
//! Fans one provider request per grid point out over a bounded pool of
//! tasks and collects whatever succeeds before the deadline. A failed or
//! malformed point is logged and skipped; it never aborts the pass.

use crate::constants::detection::{FORECAST_DAYS, HORIZON_HOURS};
use crate::geo::GridPoint;
use crate::weather::{SampleSeries, WeatherProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Knobs of one sampling pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerOptions {
    pub forecast_days: u32,
    pub horizon_hours: usize,
    /// Upper bound on in-flight provider requests
    pub max_concurrency: usize,
    /// Overall deadline for the whole grid
    pub deadline: Duration,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            forecast_days: FORECAST_DAYS,
            horizon_hours: HORIZON_HOURS,
            max_concurrency: 25,
            deadline: Duration::from_secs(30),
        }
    }
}

/// Series collected from the grid
#[derive(Debug, Clone, Default)]
pub struct SamplingOutcome {
    /// Successful series, in lattice order
    pub series: Vec<SampleSeries>,
    /// Points excluded because their fetch failed
    pub failed: usize,
    /// The deadline elapsed and outstanding fetches were aborted
    pub timed_out: bool,
}

/// Fetch every grid point concurrently
pub async fn sample_grid<P>(
    provider: Arc<P>,
    points: &[GridPoint],
    options: &SamplerOptions,
) -> SamplingOutcome
where
    P: WeatherProvider + 'static,
{
    let permits = Arc::new(Semaphore::new(options.max_concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, &point) in points.iter().enumerate() {
        let provider = Arc::clone(&provider);
        let permits = Arc::clone(&permits);
        let forecast_days = options.forecast_days;
        let horizon_hours = options.horizon_hours;

        tasks.spawn(async move {
            // The semaphore is never closed, so acquisition only fails on shutdown
            let _permit = permits.acquire_owned().await;
            let result = provider
                .hourly_series(point, forecast_days, horizon_hours)
                .await;
            (index, result)
        });
    }

    let mut collected: Vec<(usize, SampleSeries)> = Vec::with_capacity(points.len());
    let mut failed = 0usize;

    let drained = tokio::time::timeout(options.deadline, async {
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(series))) => collected.push((index, series)),
                Ok((index, Err(e))) => {
                    let point = points[index];
                    warn!("Skipping grid point ({}, {}): {}", point.lat, point.lon, e);
                    failed += 1;
                }
                Err(e) => {
                    warn!("Grid fetch task failed: {}", e);
                    failed += 1;
                }
            }
        }
    })
    .await;

    let timed_out = drained.is_err();
    if timed_out {
        let outstanding = tasks.len();
        tasks.abort_all();
        warn!(
            "Grid sampling deadline of {:?} elapsed with {} fetches outstanding",
            options.deadline, outstanding
        );
    }

    collected.sort_by_key(|(index, _)| *index);
    debug!(
        "Sampled {}/{} grid points ({} failed)",
        collected.len(),
        points.len(),
        failed
    );

    SamplingOutcome {
        series: collected.into_iter().map(|(_, series)| series).collect(),
        failed,
        timed_out,
    }
}
