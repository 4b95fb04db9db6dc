//! Property inheritance resolution.
//!
//! Sections in a browscap database form a forest: each section may name a
//! `parent` section whose properties it inherits. Resolving a section means
//! resolving its parent first, then overlaying the section's own raw
//! properties so that values lower in the tree override those higher up.
//!
//! Resolution is memoized per section. Thousands of leaves share a handful
//! of ancestor chains (`Mozilla/5.0 (Windows*` leaves all hang off a few
//! `Firefox`/`Mozilla` internals), so each ancestor is resolved once and
//! reused.

use crate::error::BrowscapError;
use rustc_hash::{FxHashMap, FxHashSet};

/// Resolved or raw properties of one section: name → value.
pub type PropertyMap = FxHashMap<String, String>;

/// The raw database as produced by a loading collaborator: section
/// identifier → raw (not yet inherited) properties.
pub type SectionMap = FxHashMap<String, PropertyMap>;

/// Property key that links a section to its parent.
///
/// Loaders lower-case option keys, so this is the exact key to look for.
pub const PARENT_KEY: &str = "parent";

/// Resolves inherited properties over a raw [`SectionMap`].
///
/// Borrows the section map for the duration of one catalog build and caches
/// every fully resolved section it encounters along the way.
pub struct PropertyResolver<'a> {
    sections: &'a SectionMap,
    resolved: FxHashMap<String, PropertyMap>,
}

impl<'a> PropertyResolver<'a> {
    /// Creates a resolver over the given raw section map.
    pub fn new(sections: &'a SectionMap) -> Self {
        Self {
            sections,
            resolved: FxHashMap::default(),
        }
    }

    /// Resolves the full property set for `section`.
    ///
    /// Walks the parent chain to its root, then overlays each level's raw
    /// properties on the way back down. The literal `parent` key survives in
    /// the output as an ordinary property; callers that don't care can
    /// simply ignore it.
    ///
    /// # Errors
    ///
    /// - [`BrowscapError::UnknownSection`] if `section` itself is absent
    /// - [`BrowscapError::MissingParent`] if a named parent is absent
    /// - [`BrowscapError::CyclicInheritance`] if the parent chain loops
    pub fn resolve(&mut self, section: &str) -> Result<PropertyMap, BrowscapError> {
        let mut in_progress = FxHashSet::default();
        self.resolve_inner(section, &mut in_progress)
    }

    fn resolve_inner(
        &mut self,
        section: &str,
        in_progress: &mut FxHashSet<String>,
    ) -> Result<PropertyMap, BrowscapError> {
        if let Some(cached) = self.resolved.get(section) {
            return Ok(cached.clone());
        }

        // Re-entering a section already on the chain means the parent
        // references loop; without this check resolution would recurse
        // forever
        if !in_progress.insert(section.to_string()) {
            return Err(BrowscapError::CyclicInheritance {
                section: section.to_string(),
            });
        }

        let raw = self
            .sections
            .get(section)
            .ok_or_else(|| BrowscapError::UnknownSection(section.to_string()))?;

        let mut result = match raw.get(PARENT_KEY) {
            Some(parent) => {
                if !self.sections.contains_key(parent) {
                    return Err(BrowscapError::MissingParent {
                        section: section.to_string(),
                        parent: parent.clone(),
                    });
                }
                self.resolve_inner(parent, in_progress)?
            }
            // Base case: a root section resolves to its raw properties
            None => PropertyMap::default(),
        };

        // Children override ancestors on shared keys
        for (key, value) in raw {
            result.insert(key.clone(), value.clone());
        }

        in_progress.remove(section);
        self.resolved.insert(section.to_string(), result.clone());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_no_parent_resolves_to_raw() {
        let mut sections = SectionMap::default();
        sections.insert(
            "Wget".to_string(),
            section(&[("browser", "Wget"), ("crawler", "true")]),
        );

        let mut resolver = PropertyResolver::new(&sections);
        let resolved = resolver.resolve("Wget").unwrap();
        assert_eq!(resolved, sections["Wget"]);
    }

    #[test]
    fn test_child_overrides_parent() {
        let mut sections = SectionMap::default();
        sections.insert(
            "Firefox".to_string(),
            section(&[("browser", "Firefox"), ("version", "0"), ("frames", "true")]),
        );
        sections.insert(
            "Firefox/1.5*".to_string(),
            section(&[("parent", "Firefox"), ("version", "1.5")]),
        );

        let mut resolver = PropertyResolver::new(&sections);
        let resolved = resolver.resolve("Firefox/1.5*").unwrap();

        assert_eq!(resolved["browser"], "Firefox", "inherited from parent");
        assert_eq!(resolved["version"], "1.5", "child value wins");
        assert_eq!(resolved["frames"], "true", "inherited from parent");
        assert_eq!(resolved["parent"], "Firefox", "parent key kept as data");
    }

    #[test]
    fn test_grandparent_chain() {
        let mut sections = SectionMap::default();
        sections.insert(
            "DefaultProperties".to_string(),
            section(&[("browser", "Default"), ("cookies", "false"), ("frames", "false")]),
        );
        sections.insert(
            "Firefox".to_string(),
            section(&[("parent", "DefaultProperties"), ("browser", "Firefox"), ("cookies", "true")]),
        );
        sections.insert(
            "Firefox/1.5*".to_string(),
            section(&[("parent", "Firefox"), ("version", "1.5")]),
        );

        let mut resolver = PropertyResolver::new(&sections);
        let resolved = resolver.resolve("Firefox/1.5*").unwrap();

        assert_eq!(resolved["browser"], "Firefox");
        assert_eq!(resolved["cookies"], "true");
        assert_eq!(resolved["frames"], "false", "root value still visible");
        assert_eq!(resolved["version"], "1.5");
    }

    #[test]
    fn test_cycle_detected() {
        let mut sections = SectionMap::default();
        sections.insert("A".to_string(), section(&[("parent", "B"), ("x", "a")]));
        sections.insert("B".to_string(), section(&[("parent", "A"), ("x", "b")]));

        let mut resolver = PropertyResolver::new(&sections);
        let err = resolver.resolve("A").unwrap_err();
        assert!(matches!(err, BrowscapError::CyclicInheritance { .. }));
    }

    #[test]
    fn test_self_cycle_detected() {
        let mut sections = SectionMap::default();
        sections.insert("A".to_string(), section(&[("parent", "A")]));

        let mut resolver = PropertyResolver::new(&sections);
        let err = resolver.resolve("A").unwrap_err();
        assert!(matches!(err, BrowscapError::CyclicInheritance { .. }));
    }

    #[test]
    fn test_missing_parent() {
        let mut sections = SectionMap::default();
        sections.insert("A".to_string(), section(&[("parent", "Ghost")]));

        let mut resolver = PropertyResolver::new(&sections);
        let err = resolver.resolve("A").unwrap_err();
        assert_eq!(
            err,
            BrowscapError::MissingParent {
                section: "A".to_string(),
                parent: "Ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_section() {
        let sections = SectionMap::default();
        let mut resolver = PropertyResolver::new(&sections);
        let err = resolver.resolve("nope").unwrap_err();
        assert_eq!(err, BrowscapError::UnknownSection("nope".to_string()));
    }

    #[test]
    fn test_memoization_shares_ancestors() {
        let mut sections = SectionMap::default();
        sections.insert("Root".to_string(), section(&[("a", "1")]));
        sections.insert(
            "Leaf1".to_string(),
            section(&[("parent", "Root"), ("b", "2")]),
        );
        sections.insert(
            "Leaf2".to_string(),
            section(&[("parent", "Root"), ("c", "3")]),
        );

        let mut resolver = PropertyResolver::new(&sections);
        let r1 = resolver.resolve("Leaf1").unwrap();
        let r2 = resolver.resolve("Leaf2").unwrap();
        assert_eq!(r1["a"], "1");
        assert_eq!(r2["a"], "1");
        // Root was resolved once and cached
        assert!(resolver.resolved.contains_key("Root"));
    }
}
