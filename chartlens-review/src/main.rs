//! chartlens-review - analytical report service entry point
//!
//! Read-only HTTP service over the database populated by chartlens-ingest.
//! Serves the fixed report catalog and a small web UI for viewing results.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chartlens_review::{build_router, db, AppState};

/// Command-line arguments for chartlens-review
#[derive(Parser, Debug)]
#[command(name = "chartlens-review")]
#[command(about = "Read-only report service for the chartlens database")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5730", env = "CHARTLENS_REVIEW_PORT")]
    port: u16,

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
                .unwrap_or_else(|_| "chartlens_review=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting chartlens-review v{} [{}] built {} ({})",
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

    let pool = db::connect_readonly(&db_path).await?;
    info!("Connected to database (read-only)");

    let state = AppState::new(pool);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("chartlens-review listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
