//! Detect command handler
//!
//! Runs one pipeline pass against the configured provider and prints it.

use crate::cli::init_logging;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter};
use crate::model::EstimatorKind;
use crate::storm::StormDetector;
use clap::Args;
use std::path::PathBuf;

/// Detect command arguments
#[derive(Args)]
pub struct DetectArgs {
    /// Output format
    #[arg(long, short = 'f', default_value = "json")]
    pub format: String,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Persisted model file (overrides config)
    #[arg(long, short = 'm')]
    pub model: Option<PathBuf>,

    /// Estimator: linear or persistence (overrides config)
    #[arg(long, short = 'e')]
    pub estimator: Option<EstimatorKind>,

    /// Land reference file (overrides config)
    #[arg(long, short = 'l')]
    pub land: Option<PathBuf>,

    /// Grid step in degrees (overrides config)
    #[arg(long)]
    pub step: Option<f64>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Apply command-line overrides on top of the loaded config
fn apply_overrides(config: &mut Config, args: &DetectArgs) {
    if let Some(model) = &args.model {
        config.model.path = Some(model.clone());
    }
    if let Some(estimator) = args.estimator {
        config.model.estimator = estimator;
    }
    if let Some(land) = &args.land {
        config.land.reference_path = Some(land.clone());
    }
    if let Some(step) = args.step {
        config.region.step = step;
    }
}

/// Run the detect command
pub async fn run(args: DetectArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    init_logging();

    let formatter = get_formatter(&args.format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", args.format)))?;

    let mut config = Config::load()?;
    apply_overrides(&mut config, &args);

    let detector = StormDetector::from_config(&config).await?;
    let response = detector.run().await;
    let output = formatter.format(&response)?;

    if let Some(path) = &args.output {
        std::fs::write(path, &output)?;
        eprintln!("Output written to {}", path.display());
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}
