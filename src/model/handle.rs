//! Reloadable estimator handle
//!
//! Owns the currently loaded estimator behind a read/write lock. Readers
//! clone an `Arc` to a fully built estimator; a reload builds the new
//! estimator first and swaps it in under the write lock, so a reader never
//! observes a partially loaded model. Reloads are serialized.

use crate::error::{Error, Result};
use crate::model::linear::LinearEstimator;
use crate::model::persistence::PersistenceEstimator;
use crate::model::{Estimator, EstimatorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

/// Shared, reloadable handle to the active estimator
#[derive(Clone)]
pub struct ModelHandle {
    kind: EstimatorKind,
    path: Option<PathBuf>,
    current: Arc<RwLock<Option<Arc<dyn Estimator>>>>,
    reload_lock: Arc<Mutex<()>>,
}

impl ModelHandle {
    /// Create an empty handle; nothing is loaded until `load` is called
    pub fn new(kind: EstimatorKind, path: Option<PathBuf>) -> Self {
        Self {
            kind,
            path,
            current: Arc::new(RwLock::new(None)),
            reload_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Create a handle that already holds an estimator
    pub fn with_estimator(estimator: Arc<dyn Estimator>) -> Self {
        let handle = Self::new(EstimatorKind::Persistence, None);
        Self {
            current: Arc::new(RwLock::new(Some(estimator))),
            ..handle
        }
    }

    pub fn kind(&self) -> EstimatorKind {
        self.kind
    }

    /// Persisted model location, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Is an estimator loaded and ready to predict?
    pub async fn is_ready(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Name of the loaded estimator
    pub async fn estimator_name(&self) -> Option<&'static str> {
        self.current.read().await.as_ref().map(|e| e.name())
    }

    /// The loaded estimator, if any
    pub async fn current(&self) -> Option<Arc<dyn Estimator>> {
        self.current.read().await.clone()
    }

    /// Build the configured estimator and swap it in
    ///
    /// On failure the previously loaded estimator (if any) stays active.
    pub async fn load(&self) -> Result<Arc<dyn Estimator>> {
        let _guard = self.reload_lock.lock().await;
        self.load_locked().await
    }

    /// Alias of [`ModelHandle::load`] for externally triggered reloads
    pub async fn reload(&self) -> Result<Arc<dyn Estimator>> {
        info!("Reloading {} estimator", self.kind);
        self.load().await
    }

    /// Return the loaded estimator, loading it first if necessary
    pub async fn get_or_load(&self) -> Result<Arc<dyn Estimator>> {
        if let Some(estimator) = self.current().await {
            return Ok(estimator);
        }

        let _guard = self.reload_lock.lock().await;
        // Another caller may have loaded it while we waited
        if let Some(estimator) = self.current().await {
            return Ok(estimator);
        }
        self.load_locked().await
    }

    async fn load_locked(&self) -> Result<Arc<dyn Estimator>> {
        let built = match self.build().await {
            Ok(estimator) => estimator,
            Err(e) => {
                warn!("Failed to load {} estimator: {}", self.kind, e);
                return Err(e);
            }
        };

        *self.current.write().await = Some(Arc::clone(&built));
        info!("Loaded {} estimator", built.name());
        Ok(built)
    }

    async fn build(&self) -> Result<Arc<dyn Estimator>> {
        match self.kind {
            EstimatorKind::Persistence => {
                if let Some(existing) = self.current().await {
                    return Ok(existing);
                }
                Ok(Arc::new(PersistenceEstimator))
            }
            EstimatorKind::Linear => {
                let path = self.path.as_ref().ok_or_else(|| {
                    Error::ModelUnavailable("No model path configured".to_string())
                })?;
                Ok(Arc::new(LinearEstimator::load(path).await?))
            }
        }
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("kind", &self.kind)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FeatureRow;
    use tempfile::TempDir;

    const MODEL_JSON: &str =
        r#"{"intercept": 1.0, "temp_lag1": 1.0, "pressure_lag1": 0.0, "wind_lag1": 0.0}"#;

    #[tokio::test]
    async fn test_not_ready_until_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storm_model.json");
        std::fs::write(&path, MODEL_JSON).unwrap();

        let handle = ModelHandle::new(EstimatorKind::Linear, Some(path));
        assert!(!handle.is_ready().await);

        handle.load().await.unwrap();
        assert!(handle.is_ready().await);
        assert_eq!(handle.estimator_name().await, Some("linear"));
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let handle = ModelHandle::new(EstimatorKind::Linear, Some(dir.path().join("absent.json")));

        let result = handle.get_or_load().await;
        assert!(matches!(result, Err(Error::ModelUnavailable(_))));
        assert!(!handle.is_ready().await);
    }

    #[tokio::test]
    async fn test_no_path_is_unavailable() {
        let handle = ModelHandle::new(EstimatorKind::Linear, None);
        assert!(matches!(handle.load().await, Err(Error::ModelUnavailable(_))));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_model() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storm_model.json");
        std::fs::write(&path, MODEL_JSON).unwrap();

        let handle = ModelHandle::new(EstimatorKind::Linear, Some(path.clone()));
        handle.load().await.unwrap();

        std::fs::write(&path, "{ corrupted").unwrap();
        assert!(handle.reload().await.is_err());

        let estimator = handle.current().await.unwrap();
        let value = estimator.predict(&FeatureRow::new(24.0, 1000.0, 30.0)).unwrap();
        assert_eq!(value, 25.0);
    }

    #[tokio::test]
    async fn test_reload_picks_up_new_coefficients() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storm_model.json");
        std::fs::write(&path, MODEL_JSON).unwrap();

        let handle = ModelHandle::new(EstimatorKind::Linear, Some(path.clone()));
        handle.load().await.unwrap();

        std::fs::write(
            &path,
            r#"{"intercept": 0.0, "temp_lag1": 2.0, "pressure_lag1": 0.0, "wind_lag1": 0.0}"#,
        )
        .unwrap();
        let reloaded = handle.reload().await.unwrap();

        assert_eq!(reloaded.predict(&FeatureRow::new(10.0, 0.0, 0.0)).unwrap(), 20.0);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let handle = ModelHandle::new(EstimatorKind::Persistence, None);
        let clone = handle.clone();

        handle.load().await.unwrap();
        assert!(clone.is_ready().await);
        assert_eq!(clone.estimator_name().await, Some("persistence"));
    }

    #[tokio::test]
    async fn test_with_estimator_is_ready() {
        let handle = ModelHandle::with_estimator(Arc::new(PersistenceEstimator));
        assert!(handle.is_ready().await);
        assert!(handle.get_or_load().await.is_ok());
        assert!(handle.reload().await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_see_whole_model_during_reloads() {
        const OTHER_JSON: &str =
            r#"{"intercept": 0.0, "temp_lag1": 2.0, "pressure_lag1": 0.0, "wind_lag1": 0.0}"#;

        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        let active = dir.path().join("storm_model.json");
        std::fs::write(&first, MODEL_JSON).unwrap();
        std::fs::write(&second, OTHER_JSON).unwrap();
        std::fs::copy(&first, &active).unwrap();

        let handle = ModelHandle::new(EstimatorKind::Linear, Some(active.clone()));
        handle.load().await.unwrap();

        let row = FeatureRow::new(10.0, 1000.0, 30.0);
        let mut readers = Vec::new();
        for _ in 0..8 {
            let h = handle.clone();
            readers.push(tokio::spawn(async move {
                let mut seen = Vec::new();
                for _ in 0..200 {
                    let estimator = h.get_or_load().await.unwrap();
                    seen.push(estimator.predict(&row).unwrap());
                    tokio::task::yield_now().await;
                }
                seen
            }));
        }

        for i in 0..40 {
            let source = if i % 2 == 0 { &second } else { &first };
            let staged = dir.path().join("staged.json");
            std::fs::copy(source, &staged).unwrap();
            std::fs::rename(&staged, &active).unwrap();
            handle.reload().await.unwrap();
            tokio::task::yield_now().await;
        }

        for reader in readers {
            for value in reader.await.unwrap() {
                // 1 + 10 from the first model, 2 * 10 from the second
                assert!(value == 11.0 || value == 20.0, "mixed model output {}", value);
            }
        }
        assert_eq!(
            handle.current().await.unwrap().predict(&row).unwrap(),
            11.0
        );
    }
}
