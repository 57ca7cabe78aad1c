//! storm-track CLI entry point
//!
//! Storm detection pipeline - CLI + web app

use storm_track::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
