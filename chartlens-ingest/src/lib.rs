//! chartlens-ingest library
//!
//! The load pipeline: CSV source -> record normalization -> upsert load into
//! the chartlens schema. Exposed as a library so the integration tests can
//! exercise each stage against in-memory databases.

pub mod cache;
pub mod csv_reader;
pub mod db;
pub mod loader;
pub mod normalize;
pub mod sanitize;

pub use cache::IdCache;
pub use loader::{LoadReport, UpsertLoader};
pub use normalize::{normalize, RecordSet, Row, NUMERIC_COLUMNS};
pub use sanitize::sanitize_numeric;
