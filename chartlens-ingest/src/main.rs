//! chartlens-ingest - CSV load pipeline entry point
//!
//! Reads a music-streaming CSV export, normalizes it, and upserts it into the
//! chartlens SQLite database. Re-runs over the same export are idempotent;
//! per-row failures are reported at the end rather than aborting the run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chartlens_ingest::csv_reader::read_csv;
use chartlens_ingest::{normalize, UpsertLoader, NUMERIC_COLUMNS};

/// Command-line arguments for chartlens-ingest
#[derive(Parser, Debug)]
#[command(name = "chartlens-ingest")]
#[command(about = "Load a music-streaming CSV export into the chartlens database")]
#[command(version)]
struct Args {
    /// CSV file to load
    csv_file: PathBuf,

    /// Database file (overrides CHARTLENS_DB and the config file)
    #[arg(short, long, env = "CHARTLENS_DB")]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chartlens_ingest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting chartlens-ingest v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let db_path = chartlens_common::config::resolve_database_path(
        args.database.as_deref().and_then(|p| p.to_str()),
    );
    info!("Database: {}", db_path.display());

    let pool = chartlens_common::db::init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    let raw = read_csv(&args.csv_file)
        .with_context(|| format!("Failed to read {}", args.csv_file.display()))?;
    info!("Read {} raw row(s) from {}", raw.rows.len(), args.csv_file.display());

    let cleaned = normalize(raw, NUMERIC_COLUMNS);
    info!("{} row(s) after normalization", cleaned.rows.len());

    let report = UpsertLoader::new().load(&pool, &cleaned).await;

    for error in &report.errors {
        warn!("{}", error);
    }
    if report.is_clean() {
        info!("Data loaded successfully");
    } else {
        warn!("Load finished with {} error(s)", report.errors.len());
    }

    pool.close().await;

    Ok(())
}
