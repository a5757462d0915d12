//! Record normalization
//!
//! Turns the raw CSV rows into a regular record set the loader can consume
//! without special-casing absence: rows missing their identity fields are
//! dropped, numeric columns are sanitized to canonical integers, and every
//! remaining missing cell becomes an empty string.

use crate::sanitize::{is_malformed_numeric, sanitize_numeric};
use std::collections::HashMap;
use tracing::debug;

/// Column holding the track's natural key
pub const TRACK_FIELD: &str = "track_name";

/// Column holding the comma-separated credited artist names
pub const ARTIST_FIELD: &str = "artist(s)_name";

/// Numeric columns of the streaming dataset. The set is intersected with the
/// columns actually present in the input, so narrower exports still load.
pub const NUMERIC_COLUMNS: &[&str] = &[
    "streams",
    "in_spotify_playlists",
    "in_spotify_charts",
    "in_deezer_playlists",
    "in_deezer_charts",
    "in_shazam_charts",
    "in_apple_charts",
    "in_apple_playlists",
    "bpm",
    "artist_count",
    "danceability_%",
    "energy_%",
    "valence_%",
    "liveness_%",
    "acousticness_%",
    "instrumentalness_%",
    "speechiness_%",
];

/// One tabular row, column name -> cell value
pub type Row = HashMap<String, String>;

/// An ordered set of rows sharing one column set
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Normalize a raw record set.
///
/// - Drops rows whose track name or artist-name cell is absent or empty
///   (they cannot be keyed, so they are excluded silently, not reported).
/// - Sanitizes every cell of each numeric column present in the input.
/// - Fills any other absent cell with an empty string.
///
/// Row order and the column set are preserved.
pub fn normalize(raw: RecordSet, numeric_columns: &[&str]) -> RecordSet {
    let RecordSet { columns, rows: raw_rows } = raw;

    let numeric: Vec<&str> = numeric_columns
        .iter()
        .copied()
        .filter(|col| columns.iter().any(|c| c == col))
        .collect();

    let input_rows = raw_rows.len();
    let mut defaulted_cells = 0usize;

    let rows: Vec<Row> = raw_rows
        .into_iter()
        .filter(|row| has_identity(row))
        .map(|mut row| {
            for col in &columns {
                if numeric.contains(&col.as_str()) {
                    let cell = row.get(col.as_str()).map(String::as_str).unwrap_or("");
                    if is_malformed_numeric(cell) {
                        defaulted_cells += 1;
                    }
                    row.insert(col.clone(), sanitize_numeric(cell).to_string());
                } else if !row.contains_key(col.as_str()) {
                    row.insert(col.clone(), String::new());
                }
            }
            row
        })
        .collect();

    if input_rows != rows.len() {
        debug!(
            "Dropped {} row(s) missing track or artist name",
            input_rows - rows.len()
        );
    }
    if defaulted_cells > 0 {
        debug!("Defaulted {} malformed numeric cell(s) to 0", defaulted_cells);
    }

    RecordSet { columns, rows }
}

/// A row is loadable only when both natural-key cells are present and non-empty
fn has_identity(row: &Row) -> bool {
    let present = |field: &str| row.get(field).map(|v| !v.is_empty()).unwrap_or(false);
    present(TRACK_FIELD) && present(ARTIST_FIELD)
}
