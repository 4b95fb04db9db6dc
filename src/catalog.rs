//! The loaded catalog: one entry per leaf section.
//!
//! A catalog is built once per load from the raw section map plus the set of
//! leaf identifiers, and is immutable afterwards. Each entry pairs the leaf's
//! compiled pattern with its fully resolved property set, so queries never
//! touch the raw database again.

use crate::error::BrowscapError;
use crate::glob::UaPattern;
use crate::resolver::{PropertyMap, PropertyResolver, SectionMap};
use log::{debug, warn};
use rustc_hash::{FxHashMap, FxHashSet};

/// One queryable leaf: compiled pattern plus resolved properties.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pattern: UaPattern,
    /// Identifier character count, precomputed for most-specific selection
    specificity: usize,
    properties: PropertyMap,
}

impl CatalogEntry {
    /// The compiled pattern for this leaf.
    pub fn pattern(&self) -> &UaPattern {
        &self.pattern
    }

    /// Identifier character count.
    pub fn specificity(&self) -> usize {
        self.specificity
    }

    /// Fully resolved properties (parent chain already applied).
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }
}

/// All queryable leaves of one loaded database generation.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: FxHashMap<String, CatalogEntry>,
}

impl Catalog {
    /// Builds a catalog from the raw database.
    ///
    /// For every leaf identifier the pattern is compiled and the property
    /// chain resolved. A leaf that fails either step is dropped with a
    /// warning and the build continues; a bad section never aborts the load.
    pub fn build(sections: &SectionMap, leaf_ids: &FxHashSet<String>) -> Self {
        let mut entries =
            FxHashMap::with_capacity_and_hasher(leaf_ids.len(), Default::default());
        let mut resolver = PropertyResolver::new(sections);
        let mut skipped = 0usize;

        for leaf in leaf_ids {
            match Self::build_entry(leaf, &mut resolver) {
                Ok(entry) => {
                    entries.insert(leaf.clone(), entry);
                }
                Err(err) => {
                    warn!("skipping section [{}]: {}", leaf, err);
                    skipped += 1;
                }
            }
        }

        debug!(
            "catalog built: {} entries, {} sections skipped",
            entries.len(),
            skipped
        );

        Self { entries }
    }

    fn build_entry(
        leaf: &str,
        resolver: &mut PropertyResolver<'_>,
    ) -> Result<CatalogEntry, BrowscapError> {
        let pattern = UaPattern::parse(leaf)?;
        let properties = resolver.resolve(leaf)?;
        Ok(CatalogEntry {
            specificity: pattern.specificity(),
            pattern,
            properties,
        })
    }

    /// Looks up one leaf entry by its identifier.
    pub fn get(&self, identifier: &str) -> Option<&CatalogEntry> {
        self.entries.get(identifier)
    }

    /// Iterates over (identifier, entry) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Iterates over leaf identifiers.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of queryable leaves.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no leaf survived the build (or nothing was given).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
