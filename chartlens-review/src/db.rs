//! Database access for chartlens-review
//!
//! All connections are read-only; the review service never mutates the schema
//! the load pipeline owns.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::Path;

/// Connect to the database in read-only mode
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        anyhow::bail!(
            "Database not found: {}\nRun chartlens-ingest first to load a CSV export.",
            db_path.display()
        );
    }

    // mode=ro prevents any write operation at the SQLite level
    let db_url = format!("sqlite://{}?mode=ro", db_path.display());

    let pool = SqlitePool::connect(&db_url)
        .await
        .context("Failed to connect to database in read-only mode")?;

    Ok(pool)
}
