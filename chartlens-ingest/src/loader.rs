//! Upsert loader
//!
//! Writes a cleaned record set into the schema in five ordered passes:
//! artists, tracks + artist-track links, streaming metrics, musical
//! attributes, finalize. Later passes resolve foreign keys through the id
//! caches populated by earlier ones, so the ordering is load-bearing.
//!
//! Failures are per-entity: each one is captured as a human-readable message
//! in the report and processing moves on. No error aborts a run, and nothing
//! already written is rolled back.

use crate::cache::IdCache;
use crate::db;
use crate::normalize::{RecordSet, Row, ARTIST_FIELD, TRACK_FIELD};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Outcome of one load run. `errors` empty means a fully clean run.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Per-entity failure descriptions, in the order they occurred
    pub errors: Vec<String>,
    /// Distinct artists upserted
    pub artists: usize,
    /// Distinct tracks upserted
    pub tracks: usize,
    /// Artist-track links upserted
    pub links: usize,
    /// Streaming metrics rows upserted
    pub metrics_rows: usize,
    /// Musical attributes rows upserted
    pub attribute_rows: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// One load run over one cleaned record set.
///
/// Owns the artist and track id caches for the duration of the run; a fresh
/// loader is constructed per run, so state never leaks across batches.
#[derive(Debug, Default)]
pub struct UpsertLoader {
    artist_ids: IdCache,
    track_ids: IdCache,
    report: LoadReport,
}

impl UpsertLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run all five passes and return the accumulated report
    pub async fn load(mut self, pool: &SqlitePool, records: &RecordSet) -> LoadReport {
        info!("Loading {} cleaned row(s)", records.rows.len());

        self.load_artists(pool, records).await;
        self.load_tracks_and_links(pool, records).await;
        self.load_streaming_metrics(pool, records).await;
        self.load_musical_attributes(pool, records).await;
        self.finalize(pool).await;

        info!(
            "Load complete: {} artist(s), {} track(s), {} link(s), {} metrics row(s), {} attribute row(s), {} error(s)",
            self.report.artists,
            self.report.tracks,
            self.report.links,
            self.report.metrics_rows,
            self.report.attribute_rows,
            self.report.errors.len()
        );

        self.report
    }

    /// Pass 1: upsert every credited artist and cache its surrogate id
    async fn load_artists(&mut self, pool: &SqlitePool, records: &RecordSet) {
        for row in &records.rows {
            for artist_name in split_artists(field(row, ARTIST_FIELD)) {
                if self.artist_ids.contains(artist_name) {
                    continue;
                }
                match db::upsert_artist(pool, artist_name).await {
                    Ok(artist_id) => {
                        self.artist_ids.insert(artist_name, artist_id);
                        self.report.artists += 1;
                    }
                    Err(err) => {
                        self.report
                            .errors
                            .push(format!("Error inserting artist '{}': {:#}", artist_name, err));
                    }
                }
            }
        }
    }

    /// Pass 2: upsert tracks, then link each track to its cached artists
    async fn load_tracks_and_links(&mut self, pool: &SqlitePool, records: &RecordSet) {
        for row in &records.rows {
            let track_name = field(row, TRACK_FIELD);

            if !self.track_ids.contains(track_name) {
                let artist_count = int_field(row, "artist_count");
                let release_date = compose_release_date(row);

                match db::upsert_track(pool, track_name, artist_count, release_date).await {
                    Ok(track_id) => {
                        self.track_ids.insert(track_name, track_id);
                        self.report.tracks += 1;
                    }
                    Err(err) => {
                        self.report
                            .errors
                            .push(format!("Error inserting track '{}': {:#}", track_name, err));
                    }
                }
            }

            // Links require both surrogate ids; either one missing from cache
            // means its upsert failed above, so the link is skipped silently
            let Some(track_id) = self.track_ids.get(track_name) else {
                continue;
            };
            for artist_name in split_artists(field(row, ARTIST_FIELD)) {
                let Some(artist_id) = self.artist_ids.get(artist_name) else {
                    continue;
                };
                match db::link_artist_track(pool, artist_id, track_id).await {
                    Ok(()) => self.report.links += 1,
                    Err(err) => {
                        self.report.errors.push(format!(
                            "Error inserting artist_tracks link for '{}' and '{}': {:#}",
                            artist_name, track_name, err
                        ));
                    }
                }
            }
        }
    }

    /// Pass 3: upsert platform counters for every resolved track
    async fn load_streaming_metrics(&mut self, pool: &SqlitePool, records: &RecordSet) {
        for row in &records.rows {
            let track_name = field(row, TRACK_FIELD);
            let Some(track_id) = self.track_ids.get(track_name) else {
                continue;
            };

            let metrics = db::StreamingMetrics {
                track_id,
                streams: int_field(row, "streams"),
                in_spotify_playlists: int_field(row, "in_spotify_playlists"),
                in_spotify_charts: int_field(row, "in_spotify_charts"),
                in_deezer_playlists: int_field(row, "in_deezer_playlists"),
                in_deezer_charts: int_field(row, "in_deezer_charts"),
                in_shazam_charts: int_field(row, "in_shazam_charts"),
                in_apple_charts: int_field(row, "in_apple_charts"),
                in_apple_playlists: int_field(row, "in_apple_playlists"),
            };

            match db::upsert_streaming_metrics(pool, &metrics).await {
                Ok(()) => self.report.metrics_rows += 1,
                Err(err) => {
                    self.report.errors.push(format!(
                        "Error inserting streaming metrics for track '{}': {:#}",
                        track_name, err
                    ));
                }
            }
        }
    }

    /// Pass 4: upsert audio features for every resolved track
    async fn load_musical_attributes(&mut self, pool: &SqlitePool, records: &RecordSet) {
        for row in &records.rows {
            let track_name = field(row, TRACK_FIELD);
            let Some(track_id) = self.track_ids.get(track_name) else {
                continue;
            };

            let attributes = db::MusicalAttributes {
                track_id,
                bpm: int_field(row, "bpm"),
                key: field(row, "key").to_string(),
                mode: field(row, "mode").to_string(),
                danceability: int_field(row, "danceability_%"),
                energy: int_field(row, "energy_%"),
                valence: int_field(row, "valence_%"),
                liveness: int_field(row, "liveness_%"),
                acousticness: int_field(row, "acousticness_%"),
                instrumentalness: int_field(row, "instrumentalness_%"),
                speechiness: int_field(row, "speechiness_%"),
            };

            match db::upsert_musical_attributes(pool, &attributes).await {
                Ok(()) => self.report.attribute_rows += 1,
                Err(err) => {
                    self.report.errors.push(format!(
                        "Error inserting musical attributes for track '{}': {:#}",
                        track_name, err
                    ));
                }
            }
        }
    }

    /// Pass 5: checkpoint the WAL so every write is durable before the caller
    /// tears the pool down
    async fn finalize(&mut self, pool: &SqlitePool) {
        if let Err(err) = sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)").execute(pool).await {
            // Non-WAL databases (e.g. in-memory) have nothing to checkpoint
            debug!("WAL checkpoint skipped: {}", err);
        }
    }
}

/// Split a credited-artists cell on the `", "` delimiter, trimming whitespace
/// and discarding empty fragments
fn split_artists(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(", ").map(str::trim).filter(|name| !name.is_empty())
}

/// Cell accessor; normalization guarantees presence, absence reads as empty
fn field<'a>(row: &'a Row, name: &str) -> &'a str {
    row.get(name).map(String::as_str).unwrap_or("")
}

/// Integer cell accessor; normalized numeric cells are canonical integers,
/// anything else reads as 0
fn int_field(row: &Row, name: &str) -> i64 {
    row.get(name).and_then(|v| v.parse().ok()).unwrap_or(0)
}

/// Compose the release date only when year, month, and day are all present,
/// non-empty, and form a real calendar date
fn compose_release_date(row: &Row) -> Option<NaiveDate> {
    let year: i32 = non_empty(row, "released_year")?.parse().ok()?;
    let month: u32 = non_empty(row, "released_month")?.parse().ok()?;
    let day: u32 = non_empty(row, "released_day")?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn non_empty<'a>(row: &'a Row, name: &str) -> Option<&'a str> {
    row.get(name).map(String::as_str).filter(|v| !v.is_empty())
}
