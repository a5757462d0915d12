//! Database write operations for the load pipeline
//!
//! One module per target table. Every write is an upsert against the natural
//! key (never select-then-insert), and surrogate ids are resolved with a keyed
//! SELECT after the upsert settles.

pub mod artists;
pub mod attributes;
pub mod metrics;
pub mod tracks;

pub use artists::{link_artist_track, upsert_artist};
pub use attributes::{upsert_musical_attributes, MusicalAttributes};
pub use metrics::{upsert_streaming_metrics, StreamingMetrics};
pub use tracks::upsert_track;
