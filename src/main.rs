//! nemdata API Server
//!
//! Run with: cargo run --bin nemdata
//!
//! Configuration is read from `--config`, else the default locations
//! (see [`Config::load_default`]), with `NEMDATA_*` overrides.

use clap::Parser;
use nemdata::api::{serve, AppState};
use nemdata::config::Config;
use nemdata::store::{InfluxClient, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "nemdata")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Electricity market data API")]
struct Args {
    /// Config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    nemdata::logging::init(&config.logging);
    tracing::info!("Starting nemdata API server v{}", env!("CARGO_PKG_VERSION"));

    let units = Arc::new(SqliteStore::open(&config.sqlite.path)?);
    tracing::info!(
        "InfluxDB {} (org {}, bucket {})",
        config.influx.url,
        config.influx.org,
        config.influx.bucket
    );
    let series = Arc::new(InfluxClient::new(config.influx.clone())?);

    let api = config.api.clone();
    serve(AppState::new(config, units, series), &api).await?;

    Ok(())
}
