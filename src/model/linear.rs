//! Linear regression estimator
//!
//! Loaded from a persisted JSON coefficient file:
//!
//! ```json
//! { "intercept": 1.2, "temp_lag1": 0.95, "pressure_lag1": 0.001, "wind_lag1": -0.02 }
//! ```

use crate::error::{Error, Result};
use crate::model::{Estimator, FeatureRow};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;

/// `y = intercept + Σ coefficient · feature`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearEstimator {
    pub intercept: f64,
    pub temp_lag1: f64,
    pub pressure_lag1: f64,
    pub wind_lag1: f64,
}

impl LinearEstimator {
    /// Parse and validate a coefficient document
    pub fn from_json(content: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(content)
            .map_err(|e| Error::ModelUnavailable(format!("Failed to parse model file: {}", e)))?;

        let coefficients = [
            model.intercept,
            model.temp_lag1,
            model.pressure_lag1,
            model.wind_lag1,
        ];
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(Error::ModelUnavailable(
                "Model file contains non-finite coefficients".to_string(),
            ));
        }
        Ok(model)
    }

    /// Load from a coefficient file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                Error::ModelUnavailable(format!("Model file not found at {}", path.display()))
            }
            _ => Error::ModelUnavailable(format!("Failed to read {}: {}", path.display(), e)),
        })?;
        Self::from_json(&content)
    }
}

impl Estimator for LinearEstimator {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn predict(&self, row: &FeatureRow) -> Result<f64> {
        Ok(self.intercept
            + self.temp_lag1 * row.temp_lag1
            + self.pressure_lag1 * row.pressure_lag1
            + self.wind_lag1 * row.wind_lag1)
    }
}
