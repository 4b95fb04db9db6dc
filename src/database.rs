//! Unified user-agent database API
//!
//! [`UserAgentDatabase`] is the primary public type: load a browscap
//! database once (from a file or from pre-parsed sections), then query
//! user-agent strings against it from any number of threads.
//!
//! Each load builds a complete new catalog and match cache off to the side
//! and publishes them in a single swap. Queries running against the previous
//! generation keep their consistent view; queries arriving after the swap
//! see only the new one. A failed file load leaves the previous generation
//! untouched.

use crate::catalog::Catalog;
use crate::error::{BrowscapError, Result};
use crate::ini;
use crate::matcher::{Matcher, StatsSnapshot, DEFAULT_MATCH_CACHE_SIZE};
use crate::resolver::{PropertyMap, SectionMap};
use rustc_hash::FxHashSet;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// User-agent capabilities database.
///
/// This struct is `Send + Sync`; wrap it in `Arc` to share across threads.
///
/// # Examples
///
/// ```no_run
/// use browscap::UserAgentDatabase;
///
/// let db = UserAgentDatabase::new();
/// db.load_file("browscap.ini")?;
///
/// let props = db.query("Mozilla/5.0 (X11; U; Linux i686; de; rv:1.8.0.5) \
///                       Gecko/20060731 Firefox/1.5.0.5")?;
/// println!("{} {}", props["browser"], props["version"]);
/// # Ok::<(), browscap::BrowscapError>(())
/// ```
pub struct UserAgentDatabase {
    /// Current generation; `None` until the first successful load
    matcher: RwLock<Option<Arc<Matcher>>>,
    cache_capacity: usize,
}

impl Default for UserAgentDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl UserAgentDatabase {
    /// Creates an empty database. Queries fail with
    /// [`BrowscapError::Uninitialized`] until a load succeeds.
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_MATCH_CACHE_SIZE)
    }

    /// Creates an empty database with an explicit match-cache capacity.
    ///
    /// The cache dramatically improves performance for workloads with
    /// repeated user-agent strings, which is the common case for servers.
    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            matcher: RwLock::new(None),
            cache_capacity: capacity,
        }
    }

    /// Loads a browscap.ini file from disk, replacing any prior contents.
    ///
    /// # Errors
    ///
    /// [`BrowscapError::Io`] if the file cannot be read and
    /// [`BrowscapError::Parse`] if it is not valid INI text. On error the
    /// previously loaded database (if any) remains in effect.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let raw = ini::parse_file(path)?;
        self.load_sections(raw.sections, raw.leaf_ids);
        Ok(())
    }

    /// Loads pre-parsed sections, replacing any prior contents.
    ///
    /// `sections` maps every section identifier to its raw properties;
    /// `leaf_ids` is the subset never referenced as a `parent`. Sections
    /// that fail to compile or resolve are logged and skipped; they are
    /// simply absent from the resulting catalog.
    pub fn load_sections(&self, sections: SectionMap, leaf_ids: FxHashSet<String>) {
        // Build the whole generation before taking the write lock, so
        // readers only ever observe a complete catalog
        let catalog = Catalog::build(&sections, &leaf_ids);
        let matcher = Arc::new(Matcher::with_cache_capacity(catalog, self.cache_capacity));

        *self.matcher.write().unwrap() = Some(matcher);
    }

    /// True once any load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.matcher.read().unwrap().is_some()
    }

    /// Number of queryable leaf sections in the current generation.
    pub fn len(&self) -> usize {
        self.current().map(|m| m.catalog().len()).unwrap_or(0)
    }

    /// True if no generation is loaded or the loaded catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up the given user-agent string, strictly.
    ///
    /// Returns a copy of the resolved properties of the most specific
    /// matching pattern.
    ///
    /// # Errors
    ///
    /// - [`BrowscapError::Uninitialized`] if nothing was ever loaded
    /// - [`BrowscapError::UnknownUserAgent`] if no pattern matches
    pub fn query(&self, user_agent: &str) -> Result<PropertyMap> {
        let matcher = self.require_loaded()?;
        match matcher.match_user_agent(user_agent) {
            Some(identifier) => Ok(Self::properties_of(&matcher, &identifier)),
            None => Err(BrowscapError::UnknownUserAgent(user_agent.to_string())),
        }
    }

    /// Looks up the given user-agent string, leniently.
    ///
    /// Like [`query`](Self::query) but an unmatched string yields an empty
    /// property map instead of an error; callers check for absent keys
    /// rather than catching anything. Querying before any load still fails
    /// with [`BrowscapError::Uninitialized`].
    pub fn query_lenient(&self, user_agent: &str) -> Result<PropertyMap> {
        let matcher = self.require_loaded()?;
        match matcher.match_user_agent(user_agent) {
            Some(identifier) => Ok(Self::properties_of(&matcher, &identifier)),
            None => Ok(PropertyMap::default()),
        }
    }

    /// Returns a sorted snapshot of all known user-agent patterns.
    ///
    /// # Errors
    ///
    /// [`BrowscapError::Uninitialized`] if nothing was ever loaded.
    pub fn known_user_agents(&self) -> Result<Vec<String>> {
        let matcher = self.require_loaded()?;
        let mut agents: Vec<String> = matcher
            .catalog()
            .identifiers()
            .map(str::to_string)
            .collect();
        agents.sort_unstable();
        Ok(agents)
    }

    /// Match-cache and scan counters for the current generation.
    ///
    /// Returns `None` before the first load. Counters reset on reload.
    pub fn stats(&self) -> Option<StatsSnapshot> {
        self.current().map(|m| m.stats().snapshot())
    }

    /// Clones out the current generation so queries run without holding
    /// the lock.
    fn current(&self) -> Option<Arc<Matcher>> {
        self.matcher.read().unwrap().clone()
    }

    fn require_loaded(&self) -> Result<Arc<Matcher>> {
        self.current().ok_or(BrowscapError::Uninitialized)
    }

    fn properties_of(matcher: &Matcher, identifier: &str) -> PropertyMap {
        // The identifier came from this matcher's own catalog, so the entry
        // is present; return a defensive copy
        matcher
            .catalog()
            .get(identifier)
            .map(|entry| entry.properties().clone())
            .unwrap_or_default()
    }
}
