//! Track table operations

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use sqlx::SqlitePool;

/// Upsert a track by name and return its surrogate id.
///
/// On a natural-key conflict only artist_count is refreshed; release_date
/// stays as first recorded.
pub async fn upsert_track(
    pool: &SqlitePool,
    track_name: &str,
    artist_count: i64,
    release_date: Option<NaiveDate>,
) -> Result<i64> {
    sqlx::query(
        r#"
        INSERT INTO tracks (track_name, artist_count, release_date, created_at, updated_at)
        VALUES (?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        ON CONFLICT(track_name) DO UPDATE SET
            artist_count = excluded.artist_count,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(track_name)
    .bind(artist_count)
    .bind(release_date)
    .execute(pool)
    .await?;

    let track_id: Option<i64> =
        sqlx::query_scalar("SELECT track_id FROM tracks WHERE track_name = ?")
            .bind(track_name)
            .fetch_optional(pool)
            .await?;

    track_id.ok_or_else(|| anyhow!("Track '{}' not found after upsert", track_name))
}
