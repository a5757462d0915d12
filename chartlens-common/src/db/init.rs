//! Database initialization
//!
//! Opens (creating if necessary) the chartlens SQLite database and brings the
//! schema up idempotently. Surrogate ids are INTEGER PRIMARY KEY columns
//! assigned by SQLite on first insert; natural keys (artist_name, track_name)
//! carry UNIQUE constraints so loads can rely on ON CONFLICT upserts.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode allows concurrent readers (the review service) with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all chartlens tables (idempotent - safe to call multiple times)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_artists_table(pool).await?;
    create_tracks_table(pool).await?;

    // Linking and per-track tables reference artists/tracks, so they come last
    create_artist_tracks_table(pool).await?;
    create_streaming_metrics_table(pool).await?;
    create_musical_attributes_table(pool).await?;

    Ok(())
}

async fn create_artists_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artists (
            artist_id INTEGER PRIMARY KEY AUTOINCREMENT,
            artist_name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_tracks_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tracks (
            track_id INTEGER PRIMARY KEY AUTOINCREMENT,
            track_name TEXT NOT NULL UNIQUE,
            artist_count INTEGER NOT NULL DEFAULT 0,
            release_date TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_artist_tracks_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artist_tracks (
            artist_id INTEGER NOT NULL REFERENCES artists(artist_id),
            track_id INTEGER NOT NULL REFERENCES tracks(track_id),
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (artist_id, track_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_streaming_metrics_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS streaming_metrics (
            track_id INTEGER PRIMARY KEY REFERENCES tracks(track_id),
            streams INTEGER NOT NULL DEFAULT 0,
            in_spotify_playlists INTEGER NOT NULL DEFAULT 0,
            in_spotify_charts INTEGER NOT NULL DEFAULT 0,
            in_deezer_playlists INTEGER NOT NULL DEFAULT 0,
            in_deezer_charts INTEGER NOT NULL DEFAULT 0,
            in_shazam_charts INTEGER NOT NULL DEFAULT 0,
            in_apple_charts INTEGER NOT NULL DEFAULT 0,
            in_apple_playlists INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_musical_attributes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS musical_attributes (
            track_id INTEGER PRIMARY KEY REFERENCES tracks(track_id),
            bpm INTEGER NOT NULL DEFAULT 0,
            key TEXT NOT NULL DEFAULT '',
            mode TEXT NOT NULL DEFAULT '',
            danceability INTEGER NOT NULL DEFAULT 0,
            energy INTEGER NOT NULL DEFAULT 0,
            valence INTEGER NOT NULL DEFAULT 0,
            liveness INTEGER NOT NULL DEFAULT 0,
            acousticness INTEGER NOT NULL DEFAULT 0,
            instrumentalness INTEGER NOT NULL DEFAULT 0,
            speechiness INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
