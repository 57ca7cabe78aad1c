//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::error::Error;
use crate::server::state::AppState;
use crate::storm::warning::all_levels;
use crate::storm::{StormResponse, WarningLevel};

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Locate the static frontend: `./static`, else next to the executable
fn static_dir() -> PathBuf {
    let local = PathBuf::from("static");
    if local.exists() {
        return local;
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("static")))
        .filter(|path| path.exists())
        .unwrap_or(local)
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_path = static_dir();

    Router::new()
        .route("/api/storm_track", get(storm_track_handler))
        .route("/api/model/reload", post(model_reload_handler))
        .route("/api/status", get(status_handler))
        .route("/api/warning_levels", get(warning_levels_handler))
        .nest_service(
            "/",
            ServeDir::new(static_path).append_index_html_on_directories(true),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code.as_str() {
            "MODEL_UNAVAILABLE" => StatusCode::SERVICE_UNAVAILABLE,
            "CONFIG_ERROR" | "INVALID_REGION" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            Error::InvalidRegion(_) => "INVALID_REGION",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Provider(_) | Error::Http(_) => "PROVIDER_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

/// Run one detection pass
///
/// GET /api/storm_track
///
/// Always 200; failures are reported in the body as `{ "error": ... }`.
async fn storm_track_handler(State(state): State<Arc<AppState>>) -> Json<StormResponse> {
    Json(state.detector().run().await)
}

/// Model reload response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub ready: bool,
    pub estimator: String,
}

/// Re-read the persisted model and swap it in
///
/// POST /api/model/reload
async fn model_reload_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReloadResponse>, ApiError> {
    let estimator = state.model().reload().await.map_err(ApiError::from)?;

    Ok(Json(ReloadResponse {
        ready: true,
        estimator: estimator.name().to_string(),
    }))
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// An estimator is loaded
    pub model_ready: bool,
    /// Loaded estimator, or the configured kind when nothing is loaded
    pub estimator: String,
    /// Land anchor points available to the landfall check
    pub land_points: usize,
    /// Grid points sampled per pass
    pub grid_points: usize,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let model = state.model();
    let estimator = match model.estimator_name().await {
        Some(name) => name.to_string(),
        None => model.kind().to_string(),
    };

    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_ready: model.is_ready().await,
        estimator,
        land_points: state.detector().land().len(),
        grid_points: state.grid_points(),
        uptime_secs: state.uptime_secs(),
    })
}

/// One warning level and where it starts
#[derive(Debug, Serialize, Deserialize)]
pub struct WarningLevelInfo {
    pub level: WarningLevel,
    pub label: String,
    pub min_wind_ms: f64,
}

/// Warning levels response
#[derive(Debug, Serialize, Deserialize)]
pub struct WarningLevelsResponse {
    pub levels: Vec<WarningLevelInfo>,
}

/// List warning levels, weakest first
///
/// GET /api/warning_levels
async fn warning_levels_handler() -> Json<WarningLevelsResponse> {
    let levels = all_levels()
        .into_iter()
        .map(|level| WarningLevelInfo {
            level,
            label: level.label().to_string(),
            min_wind_ms: level.lower_bound_ms(),
        })
        .collect();

    Json(WarningLevelsResponse { levels })
}
