//! Raw cell value sanitization
//!
//! The source dataset renders large counters with thousands separators
//! ("1,234,567") and leaves malformed odds and ends in otherwise numeric
//! columns. Malformed cells degrade to zero rather than aborting a load.

/// Strip grouping commas and parse as an integer, defaulting to 0 on any
/// failure (non-numeric content, empty string).
pub fn sanitize_numeric(raw: &str) -> i64 {
    let stripped: String = raw.chars().filter(|c| *c != ',').collect();
    stripped.trim().parse().unwrap_or(0)
}

/// True when the cell holds something that is neither empty nor a parseable
/// integer, i.e. sanitize_numeric will silently default it. Used by the
/// normalizer to count data-quality casualties.
pub(crate) fn is_malformed_numeric(raw: &str) -> bool {
    let stripped: String = raw.chars().filter(|c| *c != ',').collect();
    let trimmed = stripped.trim();
    !trimmed.is_empty() && trimmed.parse::<i64>().is_err()
}
