//! RustRide Compliance
//!
//! Command-line entry point: analyzes one request file and prints the result
//! as JSON.
//!
//! Usage: `rustride-compliance <request.json> [config.toml]`

use std::path::PathBuf;

use anyhow::{bail, Context};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rustride_compliance::storage::config::{load_config, load_config_from};
use rustride_compliance::{AnalysisRequest, ComplianceAnalyzer, HRZones, WorkoutComplianceAnalysis};

#[derive(Serialize)]
struct Report {
    analysis: WorkoutComplianceAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    hr_zones: Option<HRZones>,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting RustRide Compliance v{}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let Some(request_path) = args.next().map(PathBuf::from) else {
        bail!("usage: rustride-compliance <request.json> [config.toml]");
    };

    let config = match args.next() {
        Some(path) => load_config_from(&PathBuf::from(path)),
        None => load_config(),
    }
    .context("failed to load configuration")?;

    let content = std::fs::read_to_string(&request_path)
        .with_context(|| format!("failed to read {}", request_path.display()))?;
    let request: AnalysisRequest = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", request_path.display()))?;

    let analyzer = ComplianceAnalyzer::with_config(config)?;
    let analysis = analyzer.analyze_request(&request)?;
    let hr_zones = request.lthr.map(HRZones::from_lthr).transpose()?;

    let report = Report { analysis, hr_zones };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
