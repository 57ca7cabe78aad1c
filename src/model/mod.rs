//! Track prediction model
//!
//! This module defines the `Estimator` capability (one feature row in, one
//! value out), the reloadable `ModelHandle` that owns the loaded estimator,
//! and the autoregressive rollout that turns single-step predictions into a
//! sequence.
//!
//! ## Flex Point
//! Adding a new estimator requires:
//! 1. Create `src/model/{estimator_name}.rs` implementing `Estimator`
//! 2. Add `pub mod {estimator_name};` below
//! 3. Register it in [`EstimatorKind`]

pub mod handle;
pub mod linear;
pub mod persistence;

pub use handle::ModelHandle;

use crate::constants::track::{PREDICTION_STEPS, PRESSURE_DECAY, WIND_GROWTH};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lagged feature row fed to the estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Temperature-like proxy at the previous step
    pub temp_lag1: f64,
    /// Pressure at the previous step (hPa)
    pub pressure_lag1: f64,
    /// Wind speed at the previous step (m/s)
    pub wind_lag1: f64,
}

impl FeatureRow {
    pub fn new(temp_lag1: f64, pressure_lag1: f64, wind_lag1: f64) -> Self {
        Self {
            temp_lag1,
            pressure_lag1,
            wind_lag1,
        }
    }
}

/// A pre-trained single-step regression estimator
///
/// Implementations must be thread-safe (Send + Sync): one loaded estimator
/// is shared read-only by concurrent requests.
pub trait Estimator: Send + Sync {
    /// Returns the estimator name (e.g., "linear")
    fn name(&self) -> &'static str;

    /// Predict one value from one feature row
    fn predict(&self, row: &FeatureRow) -> Result<f64>;
}

/// Estimator implementations selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    /// Linear regression loaded from a persisted coefficient file
    Linear,
    /// Identity on `temp_lag1`; needs no file
    Persistence,
}

impl Default for EstimatorKind {
    fn default() -> Self {
        Self::Linear
    }
}

impl std::fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Persistence => write!(f, "persistence"),
        }
    }
}

impl std::str::FromStr for EstimatorKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "persistence" => Ok(Self::Persistence),
            _ => Err(format!("Unknown estimator: {}", s)),
        }
    }
}

/// Produces a multi-step sequence from a seed row
///
/// The seam where a true multivariate track model can replace the rollout.
pub trait TrackPredictor: Send + Sync {
    fn predict_sequence(&self, seed: FeatureRow) -> Result<Vec<f64>>;
}

/// Predictions plus the feature rows that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct Rollout {
    pub predictions: Vec<f64>,
    /// `rows[i]` is the input of step `i`
    pub rows: Vec<FeatureRow>,
}

/// Iterative feedback extrapolation
///
/// After each step: `temp_lag1` becomes the prediction, `pressure_lag1` is
/// multiplied by the decay factor and `wind_lag1` by the growth factor.
#[derive(Clone)]
pub struct AutoregressiveRollout {
    estimator: Arc<dyn Estimator>,
    steps: usize,
    pressure_decay: f64,
    wind_growth: f64,
}

impl AutoregressiveRollout {
    /// Rollout with the standard step count and decay/growth factors
    pub fn new(estimator: Arc<dyn Estimator>) -> Self {
        Self {
            estimator,
            steps: PREDICTION_STEPS,
            pressure_decay: PRESSURE_DECAY,
            wind_growth: WIND_GROWTH,
        }
    }

    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Run the rollout, keeping the intermediate feature rows
    pub fn rollout(&self, seed: FeatureRow) -> Result<Rollout> {
        let mut predictions = Vec::with_capacity(self.steps);
        let mut rows = Vec::with_capacity(self.steps);
        let mut row = seed;

        for step in 0..self.steps {
            let value = self.estimator.predict(&row)?;
            if !value.is_finite() {
                return Err(Error::Prediction(format!(
                    "{} estimator produced a degenerate value ({}) at step {}",
                    self.estimator.name(),
                    value,
                    step
                )));
            }

            rows.push(row);
            predictions.push(value);

            row = FeatureRow {
                temp_lag1: value,
                pressure_lag1: row.pressure_lag1 * self.pressure_decay,
                wind_lag1: row.wind_lag1 * self.wind_growth,
            };
        }

        Ok(Rollout { predictions, rows })
    }
}

impl TrackPredictor for AutoregressiveRollout {
    fn predict_sequence(&self, seed: FeatureRow) -> Result<Vec<f64>> {
        Ok(self.rollout(seed)?.predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::persistence::PersistenceEstimator;

    /// Returns NaN once `temp_lag1` passes a limit
    struct Diverging;

    impl Estimator for Diverging {
        fn name(&self) -> &'static str {
            "diverging"
        }

        fn predict(&self, row: &FeatureRow) -> Result<f64> {
            if row.temp_lag1 > 30.0 {
                Ok(f64::NAN)
            } else {
                Ok(row.temp_lag1 + 3.0)
            }
        }
    }

    struct Failing;

    impl Estimator for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn predict(&self, _row: &FeatureRow) -> Result<f64> {
            Err(Error::Prediction("feature mismatch".to_string()))
        }
    }

    #[test]
    fn test_rollout_length() {
        let rollout = AutoregressiveRollout::new(Arc::new(PersistenceEstimator));
        let seed = FeatureRow::new(25.0, 975.0, 35.0);

        let predictions = rollout.predict_sequence(seed).unwrap();
        assert_eq!(predictions.len(), 24);
        assert!(predictions.iter().all(|&v| v == 25.0));
    }

    #[test]
    fn test_rollout_feature_updates_compound() {
        let rollout = AutoregressiveRollout::new(Arc::new(PersistenceEstimator));
        let seed = FeatureRow::new(25.0, 975.0, 35.0);

        let result = rollout.rollout(seed).unwrap();

        assert_eq!(result.rows[0], seed);
        let mut pressure = 975.0;
        let mut wind = 35.0;
        for row in &result.rows {
            assert_eq!(row.pressure_lag1, pressure);
            assert_eq!(row.wind_lag1, wind);
            pressure *= 0.99;
            wind *= 1.01;
        }
    }

    #[test]
    fn test_rollout_is_reproducible() {
        let rollout = AutoregressiveRollout::new(Arc::new(PersistenceEstimator));
        let seed = FeatureRow::new(24.3, 972.5, 38.1);

        let a = rollout.rollout(seed).unwrap();
        let b = rollout.rollout(seed).unwrap();

        assert_eq!(a, b);
        let bits_a: Vec<u64> = a.predictions.iter().map(|v| v.to_bits()).collect();
        let bits_b: Vec<u64> = b.predictions.iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits_a, bits_b);
    }

    #[test]
    fn test_prediction_feeds_back() {
        let rollout = AutoregressiveRollout::new(Arc::new(Diverging)).with_steps(3);
        let predictions = rollout.predict_sequence(FeatureRow::new(20.0, 1000.0, 10.0)).unwrap();
        assert_eq!(predictions, vec![23.0, 26.0, 29.0]);
    }

    #[test]
    fn test_degenerate_prediction_is_an_error() {
        let rollout = AutoregressiveRollout::new(Arc::new(Diverging));
        let result = rollout.predict_sequence(FeatureRow::new(20.0, 1000.0, 10.0));
        assert!(matches!(result, Err(Error::Prediction(_))));
    }

    #[test]
    fn test_estimator_error_propagates() {
        let rollout = AutoregressiveRollout::new(Arc::new(Failing));
        assert!(rollout.predict_sequence(FeatureRow::new(25.0, 1000.0, 10.0)).is_err());
    }

    #[test]
    fn test_zero_steps() {
        let rollout = AutoregressiveRollout::new(Arc::new(PersistenceEstimator)).with_steps(0);
        assert!(rollout.predict_sequence(FeatureRow::new(25.0, 1000.0, 10.0)).unwrap().is_empty());
    }

    #[test]
    fn test_estimator_kind_parse() {
        assert_eq!("linear".parse::<EstimatorKind>(), Ok(EstimatorKind::Linear));
        assert_eq!("Persistence".parse::<EstimatorKind>(), Ok(EstimatorKind::Persistence));
        assert!("forest".parse::<EstimatorKind>().is_err());
        assert_eq!(EstimatorKind::default().to_string(), "linear");
    }
}
