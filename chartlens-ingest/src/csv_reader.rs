//! CSV source reader
//!
//! Reads a UTF-8 comma-separated export into a RecordSet. Record lengths are
//! allowed to vary; cells beyond a short record are simply absent and left for
//! normalization to fill.

use crate::normalize::{RecordSet, Row};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Read a CSV file into a raw RecordSet keyed by its header row
pub fn read_csv(path: &Path) -> Result<RecordSet> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let columns: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header: {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows: Vec<Row> = Vec::new();
    for record in reader.records() {
        let record = record.context("Failed to read CSV record")?;
        let mut row = Row::new();
        for (i, col) in columns.iter().enumerate() {
            if let Some(value) = record.get(i) {
                row.insert(col.clone(), value.to_string());
            }
        }
        rows.push(row);
    }

    debug!("Read {} row(s), {} column(s) from {}", rows.len(), columns.len(), path.display());

    Ok(RecordSet { columns, rows })
}
