//! User-agent matching over a loaded catalog.
//!
//! An uncached query tests every leaf pattern against the input and keeps
//! the most specific match. That linear scan (tens of thousands of patterns
//! in a full browscap release) is the dominant cost of the whole library,
//! so results are memoized in an LRU cache keyed by the exact input string.
//! Workloads are heavily repetitive (a server sees the same handful of
//! browser strings all day), which makes the cache hit rate very high in
//! practice.

use crate::catalog::Catalog;
use lru::LruCache;
use rustc_hash::FxHasher;
use serde::Serialize;
use std::hash::BuildHasherDefault;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Default LRU cache size for match results
pub const DEFAULT_MATCH_CACHE_SIZE: usize = 10_000;

type MatchCache = LruCache<String, Option<String>, BuildHasherDefault<FxHasher>>;

/// Counters for matcher activity.
///
/// All counters are monotonically increasing over the lifetime of one
/// database generation; a reload starts from zero.
#[derive(Debug, Default)]
pub struct MatcherStats {
    /// Queries answered from the match cache
    cache_hits: AtomicU64,
    /// Queries that had to scan the catalog
    cache_misses: AtomicU64,
    /// Full catalog scans performed (equals cache_misses, kept separate so
    /// tests can assert a cached re-query does not rescan)
    scans: AtomicU64,
}

impl MatcherStats {
    /// Takes a point-in-time snapshot of the counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            scans: self.scans.load(Ordering::Relaxed),
        }
    }
}

/// Plain-value snapshot of [`MatcherStats`].
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatsSnapshot {
    /// Queries answered from the match cache
    pub cache_hits: u64,
    /// Queries that had to scan the catalog
    pub cache_misses: u64,
    /// Full catalog scans performed
    pub scans: u64,
}

impl StatsSnapshot {
    /// Cache hit rate in [0.0, 1.0]; 0.0 when nothing was queried yet.
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

/// One immutable database generation: catalog plus its match cache.
///
/// The catalog is read-only after construction, so any number of threads
/// may query concurrently; only the cache is behind a lock. Cache inserts
/// racing on the same key are idempotent: the selection for a given string
/// is deterministic, so last-write-wins is safe.
pub struct Matcher {
    catalog: Catalog,
    cache: Mutex<MatchCache>,
    stats: MatcherStats,
}

impl Matcher {
    /// Wraps a freshly built catalog with a default-capacity cache.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_cache_capacity(catalog, DEFAULT_MATCH_CACHE_SIZE)
    }

    /// Wraps a catalog with an explicit cache capacity.
    ///
    /// A capacity of zero is treated as one: a cache entry must always be
    /// representable so that repeated identical queries stay cheap.
    pub fn with_cache_capacity(catalog: Catalog, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
        Self {
            catalog,
            cache: Mutex::new(LruCache::with_hasher(capacity, Default::default())),
            stats: MatcherStats::default(),
        }
    }

    /// The catalog this matcher answers from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Matcher activity counters.
    pub fn stats(&self) -> &MatcherStats {
        &self.stats
    }

    /// Finds the leaf identifier whose pattern best matches `user_agent`.
    ///
    /// Among all matching patterns the one with the greatest identifier
    /// character count wins; equal lengths are broken by picking the
    /// lexicographically smallest identifier, so selection is deterministic
    /// regardless of catalog iteration order. Returns `None` when nothing
    /// matches. Both outcomes are cached.
    pub fn match_user_agent(&self, user_agent: &str) -> Option<String> {
        if let Some(cached) = self.cache.lock().unwrap().get(user_agent) {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            return cached.clone();
        }
        self.stats.cache_misses.fetch_add(1, Ordering::Relaxed);

        let selected = self.scan(user_agent);

        // The lock is not held across the scan, so two racing queries for
        // the same string may both scan; they compute the same selection
        self.cache
            .lock()
            .unwrap()
            .put(user_agent.to_string(), selected.clone());

        selected
    }

    /// Uncached linear scan over every leaf pattern.
    fn scan(&self, user_agent: &str) -> Option<String> {
        self.stats.scans.fetch_add(1, Ordering::Relaxed);

        let mut best: Option<(&str, usize)> = None;
        for (identifier, entry) in self.catalog.iter() {
            if !entry.pattern().matches(user_agent) {
                continue;
            }
            let more_specific = match best {
                None => true,
                Some((best_id, best_len)) => {
                    entry.specificity() > best_len
                        || (entry.specificity() == best_len && identifier < best_id)
                }
            };
            if more_specific {
                best = Some((identifier, entry.specificity()));
            }
        }
        best.map(|(identifier, _)| identifier.to_string())
    }
}
