//! Fixed catalog of analytical report queries
//!
//! Every report is a pre-written read-only SELECT against the chartlens
//! schema; the catalog is static and no ad-hoc SQL is ever accepted from a
//! caller. Queries join Artist - Artist_Track - Track - StreamingMetrics /
//! MusicalAttributes along the schema's foreign-key paths.

use anyhow::Result;
use serde::Serialize;
use sqlx::{Column, Row, SqlitePool, ValueRef};

/// One named report in the catalog
#[derive(Debug, Clone, Serialize)]
pub struct ReportDef {
    /// URL-safe identifier
    pub slug: &'static str,
    /// Human-readable title shown in the UI
    pub title: &'static str,
    /// The report's SQL (not serialized to clients)
    #[serde(skip)]
    pub sql: &'static str,
}

/// Result of executing one report
#[derive(Debug, Serialize)]
pub struct ReportResult {
    pub slug: String,
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// The report catalog, in UI display order
pub const REPORTS: &[ReportDef] = &[
    ReportDef {
        slug: "top-artists-by-streams",
        title: "Top Artists by Stream Count",
        sql: r#"
            SELECT a.artist_name,
                   SUM(sm.streams) AS total_streams
            FROM artists a
            JOIN artist_tracks at ON a.artist_id = at.artist_id
            JOIN tracks t ON at.track_id = t.track_id
            JOIN streaming_metrics sm ON t.track_id = sm.track_id
            GROUP BY a.artist_name
            ORDER BY total_streams DESC
            LIMIT 10
        "#,
    },
    ReportDef {
        slug: "top-tracks-by-streams",
        title: "Top Songs by Stream Count",
        sql: r#"
            SELECT t.track_name, sm.streams
            FROM tracks t
            JOIN streaming_metrics sm ON t.track_id = sm.track_id
            ORDER BY sm.streams DESC
            LIMIT 10
        "#,
    },
    ReportDef {
        slug: "most-collaborative-artists",
        title: "Most Collaborated Artists",
        sql: r#"
            SELECT a.artist_name,
                   COUNT(DISTINCT at.track_id) AS total_tracks,
                   COUNT(DISTINCT other_at.artist_id) AS artists_collaborated
            FROM artists a
            JOIN artist_tracks at ON a.artist_id = at.artist_id
            JOIN artist_tracks other_at
                 ON at.track_id = other_at.track_id
                AND a.artist_id != other_at.artist_id
            GROUP BY a.artist_name
            ORDER BY artists_collaborated DESC
            LIMIT 10
        "#,
    },
    ReportDef {
        slug: "artists-most-in-playlists",
        title: "Artists Appearing Most in Playlists",
        sql: r#"
            SELECT a.artist_name,
                   (COALESCE(SUM(sm.in_spotify_playlists), 0) +
                    COALESCE(SUM(sm.in_deezer_playlists), 0) +
                    COALESCE(SUM(sm.in_apple_playlists), 0)) AS playlists_count
            FROM artists a
            JOIN artist_tracks at ON a.artist_id = at.artist_id
            JOIN tracks t ON at.track_id = t.track_id
            JOIN streaming_metrics sm ON t.track_id = sm.track_id
            GROUP BY a.artist_name
            ORDER BY playlists_count DESC
            LIMIT 10
        "#,
    },
    ReportDef {
        slug: "minimum-speechiness",
        title: "Minimum Speechiness",
        sql: r#"
            SELECT t.track_name, ma.speechiness
            FROM tracks t
            JOIN musical_attributes ma ON t.track_id = ma.track_id
            WHERE ma.speechiness = (SELECT MIN(speechiness) FROM musical_attributes)
        "#,
    },
    ReportDef {
        slug: "artists-most-in-charts",
        title: "Artists Appearing Most in Charts",
        sql: r#"
            SELECT a.artist_name,
                   (COALESCE(SUM(sm.in_spotify_charts), 0) +
                    COALESCE(SUM(sm.in_apple_charts), 0) +
                    COALESCE(SUM(sm.in_deezer_charts), 0) +
                    COALESCE(SUM(sm.in_shazam_charts), 0)) AS charts_count
            FROM artists a
            JOIN artist_tracks at ON a.artist_id = at.artist_id
            JOIN tracks t ON at.track_id = t.track_id
            JOIN streaming_metrics sm ON t.track_id = sm.track_id
            GROUP BY a.artist_name
            ORDER BY charts_count DESC
            LIMIT 10
        "#,
    },
    ReportDef {
        slug: "artist-popularity-normalized",
        title: "Popularity Score of Artists (Normalized)",
        sql: r#"
            WITH artist_popularity AS (
                SELECT a.artist_name,
                       (COALESCE(SUM(sm.in_spotify_playlists), 0) +
                        COALESCE(SUM(sm.in_spotify_charts), 0) +
                        COALESCE(SUM(sm.in_apple_playlists), 0) +
                        COALESCE(SUM(sm.in_apple_charts), 0) +
                        COALESCE(SUM(sm.in_deezer_playlists), 0) +
                        COALESCE(SUM(sm.in_deezer_charts), 0) +
                        COALESCE(SUM(sm.in_shazam_charts), 0)) AS raw_popularity_score
                FROM artists a
                JOIN artist_tracks at ON a.artist_id = at.artist_id
                JOIN tracks t ON at.track_id = t.track_id
                JOIN streaming_metrics sm ON t.track_id = sm.track_id
                GROUP BY a.artist_name
            ),
            total_popularity AS (
                SELECT SUM(raw_popularity_score) AS total FROM artist_popularity
            )
            SELECT ap.artist_name,
                   ap.raw_popularity_score,
                   CAST(ap.raw_popularity_score AS REAL) / tp.total AS normalized_popularity_score
            FROM artist_popularity ap, total_popularity tp
            ORDER BY normalized_popularity_score DESC
            LIMIT 10
        "#,
    },
    ReportDef {
        slug: "average-danceability-energy",
        title: "Average Danceability and Energy",
        sql: r#"
            SELECT AVG(danceability) AS avg_danceability,
                   AVG(energy) AS avg_energy
            FROM musical_attributes
        "#,
    },
    ReportDef {
        slug: "most-streamed-track-per-year",
        title: "Most Streamed Track per Year",
        sql: r#"
            SELECT strftime('%Y', t.release_date) AS release_year,
                   t.track_name,
                   GROUP_CONCAT(DISTINCT a.artist_name) AS artists,
                   sm.streams
            FROM tracks t
            JOIN streaming_metrics sm ON t.track_id = sm.track_id
            JOIN artist_tracks at ON t.track_id = at.track_id
            JOIN artists a ON at.artist_id = a.artist_id
            WHERE t.release_date IS NOT NULL
              AND sm.streams = (
                  SELECT MAX(sm2.streams)
                  FROM streaming_metrics sm2
                  JOIN tracks t2 ON sm2.track_id = t2.track_id
                  WHERE strftime('%Y', t2.release_date) = strftime('%Y', t.release_date)
              )
            GROUP BY strftime('%Y', t.release_date), t.track_name, sm.streams
            ORDER BY release_year
        "#,
    },
    ReportDef {
        slug: "top-acoustic-tracks",
        title: "Top Acoustic Tracks by Acousticness and Streams",
        sql: r#"
            SELECT t.track_name,
                   SUM(sm.streams) AS total_streams,
                   ma.acousticness,
                   GROUP_CONCAT(DISTINCT a.artist_name) AS artists
            FROM tracks t
            JOIN streaming_metrics sm ON t.track_id = sm.track_id
            JOIN musical_attributes ma ON t.track_id = ma.track_id
            JOIN artist_tracks at ON t.track_id = at.track_id
            JOIN artists a ON at.artist_id = a.artist_id
            WHERE ma.acousticness > 0
            GROUP BY t.track_id
            ORDER BY ma.acousticness DESC, total_streams DESC
            LIMIT 10
        "#,
    },
];

/// Look up a report by its slug
pub fn find_report(slug: &str) -> Option<&'static ReportDef> {
    REPORTS.iter().find(|report| report.slug == slug)
}

/// Execute a catalog report and decode the result dynamically
pub async fn run_report(pool: &SqlitePool, report: &ReportDef) -> Result<ReportResult> {
    let rows = sqlx::query(report.sql).fetch_all(pool).await?;

    let columns: Vec<String> = match rows.first() {
        Some(first_row) => first_row
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect(),
        None => Vec::new(),
    };

    let json_rows: Vec<Vec<serde_json::Value>> = rows
        .iter()
        .map(|row| (0..row.len()).map(|i| decode_cell(row, i)).collect())
        .collect();

    Ok(ReportResult {
        slug: report.slug.to_string(),
        title: report.title.to_string(),
        columns,
        rows: json_rows,
    })
}

/// Convert one SQLite cell to JSON, trying the common types in turn
fn decode_cell(row: &sqlx::sqlite::SqliteRow, i: usize) -> serde_json::Value {
    match row.try_get_raw(i) {
        Ok(value) if value.is_null() => serde_json::Value::Null,
        Ok(_) => row
            .try_get::<String, _>(i)
            .ok()
            .map(serde_json::Value::String)
            .or_else(|| row.try_get::<i64, _>(i).ok().map(|v| serde_json::json!(v)))
            .or_else(|| row.try_get::<f64, _>(i).ok().map(|v| serde_json::json!(v)))
            .unwrap_or(serde_json::Value::Null),
        Err(_) => serde_json::Value::Null,
    }
}
