//! Report cache
//!
//! A BLAKE3-keyed in-memory cache of generated phase reports, so that
//! re-executing a phase with unchanged inputs does not call the generation
//! service again.

use blake3::Hasher;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::types::ProjectInputs;

/// Statistics for cache performance tracking
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub writes: usize,
}

impl CacheStats {
    /// Calculate cache hit ratio
    #[must_use]
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// A generated report held in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedReport {
    pub text: String,
    /// Endpoint that produced the text.
    pub engine: String,
    pub cached_at: DateTime<Utc>,
}

/// Compute the cache key for a phase and its inputs.
///
/// The key is the hex BLAKE3 digest over the phase index followed by the
/// JSON encoding of the inputs. Struct field order is fixed, so the JSON is
/// stable for equal inputs.
#[must_use]
pub fn cache_key(phase: usize, inputs: &ProjectInputs) -> String {
    let mut hasher = Hasher::new();
    hasher.update(&(phase as u64).to_le_bytes());
    // Serializing a struct of strings and integers cannot fail.
    let json = serde_json::to_vec(inputs).unwrap_or_default();
    hasher.update(&json);
    hasher.finalize().to_hex().to_string()
}

/// In-memory report cache with hit/miss accounting.
#[derive(Debug, Default)]
pub struct ReportCache {
    entries: HashMap<String, CachedReport>,
    stats: CacheStats,
}

impl ReportCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a report, counting the hit or miss.
    pub fn get(&mut self, phase: usize, inputs: &ProjectInputs) -> Option<CachedReport> {
        let key = cache_key(phase, inputs);
        match self.entries.get(&key) {
            Some(report) => {
                self.stats.hits += 1;
                debug!(phase, key = %&key[..16], "Report cache hit");
                Some(report.clone())
            }
            None => {
                self.stats.misses += 1;
                debug!(phase, key = %&key[..16], "Report cache miss");
                None
            }
        }
    }

    pub fn insert(
        &mut self,
        phase: usize,
        inputs: &ProjectInputs,
        text: impl Into<String>,
        engine: impl Into<String>,
    ) {
        let key = cache_key(phase, inputs);
        self.entries.insert(
            key,
            CachedReport {
                text: text.into(),
                engine: engine.into(),
                cached_at: Utc::now(),
            },
        );
        self.stats.writes += 1;
    }
}
