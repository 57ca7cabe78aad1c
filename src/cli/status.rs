//! Status command handler
//!
//! Shows model readiness, land reference size and (optionally) server status.

use crate::config::Config;
use crate::error::Result;
use crate::model::ModelHandle;
use crate::storm::pipeline::load_land_reference;
use crate::storm::DetectionParams;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Check if server is running (tries to connect)
    #[arg(long)]
    pub server: bool,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;

    if args.server {
        check_server_status(&config).await;
    }

    println!("storm-track v{}", env!("CARGO_PKG_VERSION"));
    println!();

    let params = DetectionParams::from_config(&config);
    match params.region.lattice(params.grid_step) {
        Ok(points) => println!("Grid: {} points (step {}°)", points.len(), params.grid_step),
        Err(e) => println!("Grid: INVALID ({})", e),
    }
    println!("Provider: {}", config.provider.base_url);
    println!();

    let model_path = config.model_path();
    let model = ModelHandle::new(config.model.estimator, model_path.clone());
    println!("Model: {}", config.model.estimator);
    if let Some(path) = &model_path {
        println!("  Path: {}", path.display());
    }
    match model.load().await {
        Ok(estimator) => println!("  Status: READY ({})", estimator.name()),
        Err(e) => println!("  Status: UNAVAILABLE ({})", e),
    }
    println!();

    match load_land_reference(&config) {
        Ok(land) if land.is_empty() => println!("Land reference: none (landfall always false)"),
        Ok(land) => println!("Land reference: {} points", land.len()),
        Err(e) => println!("Land reference: ERROR ({})", e),
    }

    Ok(())
}

/// Check if the server is running
async fn check_server_status(config: &Config) {
    let url = format!("http://{}/api/status", config.server_addr());

    match reqwest::get(&url).await {
        Ok(response) => {
            if response.status().is_success() {
                println!("Server: RUNNING on {}", config.server_addr());
                if let Ok(status) = response.json::<serde_json::Value>().await {
                    if let Some(version) = status.get("version").and_then(|v| v.as_str()) {
                        println!("  Version: {}", version);
                    }
                    if let Some(ready) = status.get("model_ready").and_then(|v| v.as_bool()) {
                        println!("  Model ready: {}", ready);
                    }
                }
            } else {
                println!("Server: ERROR (status {})", response.status());
            }
        }
        Err(_) => {
            println!("Server: NOT RUNNING on {}", config.server_addr());
        }
    }
    println!();
}
