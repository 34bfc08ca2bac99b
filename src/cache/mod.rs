//! Explicit memoization of pipeline runs.
//!
//! The pipeline is pure, so caching a run by (input bytes, configuration) is
//! safe and transparent. The cache is an ordinary value owned by the hosting
//! layer, never module-global state; dropping it drops every memoized table.

use std::hash::Hasher;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHasher};
use serde::Serialize;

use crate::error::Result;
use crate::pipeline::PipelineOutput;

/// Memoization cache keyed by input hash + configuration snapshot.
#[derive(Debug, Default)]
pub struct PipelineCache {
    entries: FxHashMap<u64, Arc<PipelineOutput>>,
}

impl PipelineCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for an input table and any serializable configuration
    /// (pipeline config, or pipeline config plus filter parameters).
    pub fn key<C: Serialize>(input: &[u8], config: &C) -> Result<u64> {
        let snapshot = serde_json::to_string(config)?;
        let mut hasher = FxHasher::default();
        hasher.write(input);
        hasher.write(snapshot.as_bytes());
        Ok(hasher.finish())
    }

    /// Return the memoized output for (input, config), computing and storing
    /// it on a miss.
    pub fn get_or_compute<C, F>(
        &mut self,
        input: &[u8],
        config: &C,
        compute: F,
    ) -> Result<Arc<PipelineOutput>>
    where
        C: Serialize,
        F: FnOnce() -> Result<PipelineOutput>,
    {
        let key = Self::key(input, config)?;
        if let Some(output) = self.entries.get(&key) {
            return Ok(Arc::clone(output));
        }
        let output = Arc::new(compute()?);
        self.entries.insert(key, Arc::clone(&output));
        Ok(output)
    }

    /// Number of memoized runs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all memoized runs.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
