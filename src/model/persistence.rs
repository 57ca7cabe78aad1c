//! Persistence estimator
//!
//! Predicts that the proxy value stays where it was (`temp_lag1`). Needs no
//! model file, so it is always ready; useful offline and as a deterministic
//! stand-in for tests.

use crate::error::Result;
use crate::model::{Estimator, FeatureRow};

/// Identity on `temp_lag1`
#[derive(Debug, Clone, Copy, Default)]
pub struct PersistenceEstimator;

impl Estimator for PersistenceEstimator {
    fn name(&self) -> &'static str {
        "persistence"
    }

    fn predict(&self, row: &FeatureRow) -> Result<f64> {
        Ok(row.temp_lag1)
    }
}
