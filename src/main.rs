//! Irrigation Advisor - precision irrigation pump decisions
//!
//! # Usage
//!
//! ```bash
//! # Serve the dashboard and JSON API
//! cargo run --release
//!
//! # One-shot decision on the terminal
//! irrigation-advisor predict --temperature 35 --soil-moisture 300 --crop rice
//!
//! # Validate config and artifacts without serving
//! irrigation-advisor --config irrigation.toml check
//! ```
//!
//! # Environment Variables
//!
//! - `IRRIGATION_CONFIG`: Path to the TOML config (default: ./irrigation.toml)
//! - `IRRIGATION_SERVER_ADDR`: Override the bind address
//! - `RUST_LOG`: Logging level (default: info)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use irrigation_advisor::api::{create_app, AdvisorState};
use irrigation_advisor::config::{defaults, AdvisorConfig};
use irrigation_advisor::{ArtifactRegistry, Crop, DecisionEngine, ReadingInput};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "irrigation-advisor")]
#[command(about = "AI + IoT-powered precision irrigation advisor")]
#[command(version)]
struct CliArgs {
    /// Path to the TOML config file. Errors in an explicit file are fatal.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "IRRIGATION_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Serve the dashboard and JSON API (default)
    Serve {
        /// Override the server address (default: "0.0.0.0:8080")
        #[arg(short, long, value_name = "HOST:PORT")]
        addr: Option<String>,
    },

    /// Decide once for the given readings and print the result
    Predict(PredictArgs),

    /// Load config and artifacts, print a summary and exit
    Check,
}

#[derive(clap::Args, Debug)]
struct PredictArgs {
    /// Temperature in °C
    #[arg(long, default_value_t = defaults::TEMPERATURE)]
    temperature: f64,

    #[arg(long, default_value_t = defaults::SOIL_MOISTURE)]
    soil_moisture: f64,

    /// Day number within the month
    #[arg(long, default_value_t = defaults::DAY)]
    day: u32,

    /// Hour of day
    #[arg(long, default_value_t = defaults::TIME)]
    time: f64,

    #[arg(long, default_value_t = defaults::MOISTURE_TREND)]
    moisture_trend: f64,

    /// cotton, wheat, rice or maize
    #[arg(long, default_value_t = Crop::Cotton.to_string())]
    crop: String,

    /// Print the full decision report as JSON
    #[arg(long)]
    json: bool,
}

impl From<&PredictArgs> for ReadingInput {
    fn from(args: &PredictArgs) -> Self {
        Self {
            temperature: Some(args.temperature),
            soil_moisture: Some(args.soil_moisture),
            day: Some(args.day),
            time: Some(args.time),
            moisture_trend: Some(args.moisture_trend),
            crop: Some(args.crop.clone()),
        }
    }
}

// ============================================================================
// Startup
// ============================================================================

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

/// Explicit `--config` is fatal on error; otherwise fall back through the
/// search order.
fn load_config(explicit: Option<&Path>) -> Result<AdvisorConfig> {
    AdvisorConfig::resolve(explicit).context("Failed to load config from --config")
}

fn load_artifacts(config: &AdvisorConfig) -> Result<ArtifactRegistry> {
    match ArtifactRegistry::load(config.artifacts.clone()) {
        Ok(registry) => Ok(registry),
        Err(e) => {
            error!(error = %e, "Failed to load model artifacts");
            Err(e).context("Artifacts must load before the advisor can start")
        }
    }
}

// ============================================================================
// Subcommands
// ============================================================================

async fn run_server(config: AdvisorConfig, registry: ArtifactRegistry, addr: Option<String>) -> Result<()> {
    let server_addr = addr.unwrap_or_else(|| config.server.addr.clone());

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  💧 IoT Smart Irrigation System");
    info!("  AI + IoT-powered Precision Farming Dashboard");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let state = AdvisorState::new(Arc::new(registry), Arc::new(config));
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind {server_addr}"))?;
    info!("🌐 Dashboard: http://{}", server_addr);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("🛑 Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
            info!("[HttpServer] Received shutdown signal");
        })
        .await
        .context("HTTP server error")?;

    info!("✓ Irrigation advisor shutdown complete");
    Ok(())
}

fn run_predict(config: &AdvisorConfig, registry: &ArtifactRegistry, args: &PredictArgs) -> Result<()> {
    let reading = ReadingInput::from(args)
        .validate(&config.inputs)
        .context("Invalid reading")?;
    let engine = DecisionEngine::new(registry.current(), config.rules.clone());
    let report = engine.evaluate(&reading).context("Prediction failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.headline);
        println!("  {}", report.detail);
        println!("  Model Raw Prediction: {}", report.raw_prediction);
        println!("  Temperature: {} °C", reading.temperature());
        println!("  Soil Moisture: {}", reading.soil_moisture());
        println!("  Rule: {}", report.reason);
    }
    Ok(())
}

fn run_check(config: &AdvisorConfig, registry: &ArtifactRegistry) -> Result<()> {
    let bundle = registry.current();
    println!("Config: OK");
    println!("  Server address: {}", config.server.addr);
    println!(
        "  Rules: moisture ≥ {} → OFF, moisture ≤ {} & temperature ≥ {} → ON",
        config.rules.moisture_high_min, config.rules.dry_moisture_max, config.rules.hot_temperature_min
    );
    println!("Artifacts: OK");
    println!("  Schema: {} ({} columns)", registry.paths().schema.display(), bundle.schema().len());
    println!("  Scaler: {} ({})", registry.paths().scaler.display(), bundle.scaler().kind());
    println!("  Model:  {} ({})", registry.paths().model.display(), bundle.model().kind());
    for column in bundle.schema().unknown_columns() {
        println!("  Warning: column '{column}' is never set by the feature builder");
    }
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let config = load_config(args.config.as_deref())?;
    let registry = load_artifacts(&config)?;

    match args.command {
        None => run_server(config, registry, None).await,
        Some(SubCommand::Serve { addr }) => run_server(config, registry, addr).await,
        Some(SubCommand::Predict(predict)) => run_predict(&config, &registry, &predict),
        Some(SubCommand::Check) => run_check(&config, &registry),
    }
}
