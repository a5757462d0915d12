//! Musical attributes table operations

use anyhow::Result;
use sqlx::SqlitePool;

/// Per-track audio features, tonal key/mode, and tempo
#[derive(Debug, Clone, Default)]
pub struct MusicalAttributes {
    pub track_id: i64,
    pub bpm: i64,
    pub key: String,
    pub mode: String,
    pub danceability: i64,
    pub energy: i64,
    pub valence: i64,
    pub liveness: i64,
    pub acousticness: i64,
    pub instrumentalness: i64,
    pub speechiness: i64,
}

/// Upsert the attributes row for a track; bpm is refreshed on conflict
pub async fn upsert_musical_attributes(
    pool: &SqlitePool,
    attributes: &MusicalAttributes,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO musical_attributes (
            track_id, bpm, key, mode, danceability, energy, valence,
            liveness, acousticness, instrumentalness, speechiness, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(track_id) DO UPDATE SET
            bpm = excluded.bpm,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(attributes.track_id)
    .bind(attributes.bpm)
    .bind(&attributes.key)
    .bind(&attributes.mode)
    .bind(attributes.danceability)
    .bind(attributes.energy)
    .bind(attributes.valence)
    .bind(attributes.liveness)
    .bind(attributes.acousticness)
    .bind(attributes.instrumentalness)
    .bind(attributes.speechiness)
    .execute(pool)
    .await?;

    Ok(())
}
