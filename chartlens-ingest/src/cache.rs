//! Surrogate identifier cache
//!
//! Maps natural keys (artist name, track name) to the surrogate ids storage
//! assigned when the row was first upserted, so later passes resolve foreign
//! keys without another round-trip. One cache per natural-key space, owned by
//! the loader for the duration of a single run; unbounded on purpose (the key
//! space of one dataset fits in memory).

use std::collections::HashMap;

/// In-memory natural key -> surrogate id mapping
#[derive(Debug, Default)]
pub struct IdCache {
    ids: HashMap<String, i64>,
}

impl IdCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the surrogate id for a natural key
    pub fn get(&self, key: &str) -> Option<i64> {
        self.ids.get(key).copied()
    }

    /// Record the surrogate id for a natural key
    pub fn insert(&mut self, key: impl Into<String>, id: i64) {
        self.ids.insert(key.into(), id);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.ids.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
