//! Artist table operations

use anyhow::{anyhow, Result};
use sqlx::SqlitePool;

/// Upsert an artist by name and return its surrogate id.
///
/// The natural key is artist_name; on conflict the name is re-affirmed (a
/// no-op update) so the statement never fails on duplicates. The id is then
/// resolved with a keyed SELECT because last-insert-rowid is meaningless after
/// a conflict-update.
pub async fn upsert_artist(pool: &SqlitePool, artist_name: &str) -> Result<i64> {
    sqlx::query(
        r#"
        INSERT INTO artists (artist_name, created_at, updated_at)
        VALUES (?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        ON CONFLICT(artist_name) DO UPDATE SET
            artist_name = excluded.artist_name,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(artist_name)
    .execute(pool)
    .await?;

    let artist_id: Option<i64> =
        sqlx::query_scalar("SELECT artist_id FROM artists WHERE artist_name = ?")
            .bind(artist_name)
            .fetch_optional(pool)
            .await?;

    artist_id.ok_or_else(|| anyhow!("Artist '{}' not found after upsert", artist_name))
}

/// Upsert an artist-track link row. Idempotent on the composite key.
pub async fn link_artist_track(pool: &SqlitePool, artist_id: i64, track_id: i64) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO artist_tracks (artist_id, track_id, created_at)
        VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(artist_id, track_id) DO NOTHING
        "#,
    )
    .bind(artist_id)
    .bind(track_id)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        chartlens_common::db::create_schema(&pool)
            .await
            .expect("Schema initialization failed");
        pool
    }

    #[tokio::test]
    async fn test_upsert_artist_returns_stable_id() {
        let pool = test_pool().await;

        let first = upsert_artist(&pool, "Dua Lipa").await.expect("First upsert failed");
        let second = upsert_artist(&pool, "Dua Lipa").await.expect("Second upsert failed");
        assert_eq!(first, second);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM artists")
            .fetch_one(&pool)
            .await
            .expect("Count failed");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_link_artist_track_is_idempotent() {
        let pool = test_pool().await;

        let artist_id = upsert_artist(&pool, "A").await.expect("Artist upsert failed");
        let track_id = crate::db::upsert_track(&pool, "T", 1, None)
            .await
            .expect("Track upsert failed");

        link_artist_track(&pool, artist_id, track_id).await.expect("First link failed");
        link_artist_track(&pool, artist_id, track_id).await.expect("Second link failed");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM artist_tracks")
            .fetch_one(&pool)
            .await
            .expect("Count failed");
        assert_eq!(count, 1);
    }
}
