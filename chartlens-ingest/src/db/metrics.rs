//! Streaming metrics table operations

use anyhow::Result;
use sqlx::SqlitePool;

/// Per-track platform counters
#[derive(Debug, Clone, Default)]
pub struct StreamingMetrics {
    pub track_id: i64,
    pub streams: i64,
    pub in_spotify_playlists: i64,
    pub in_spotify_charts: i64,
    pub in_deezer_playlists: i64,
    pub in_deezer_charts: i64,
    pub in_shazam_charts: i64,
    pub in_apple_charts: i64,
    pub in_apple_playlists: i64,
}

/// Upsert the metrics row for a track; streams is refreshed on conflict
pub async fn upsert_streaming_metrics(pool: &SqlitePool, metrics: &StreamingMetrics) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO streaming_metrics (
            track_id, streams, in_spotify_playlists, in_spotify_charts,
            in_deezer_playlists, in_deezer_charts, in_shazam_charts,
            in_apple_charts, in_apple_playlists, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(track_id) DO UPDATE SET
            streams = excluded.streams,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(metrics.track_id)
    .bind(metrics.streams)
    .bind(metrics.in_spotify_playlists)
    .bind(metrics.in_spotify_charts)
    .bind(metrics.in_deezer_playlists)
    .bind(metrics.in_deezer_charts)
    .bind(metrics.in_shazam_charts)
    .bind(metrics.in_apple_charts)
    .bind(metrics.in_apple_playlists)
    .execute(pool)
    .await?;

    Ok(())
}
