//! browscap.ini loading collaborator.
//!
//! Parses the INI-like browscap database text into the raw
//! section→properties mapping plus the derived leaf-section set that the
//! catalog consumes. This module owns every quirk of the on-disk format so
//! the core never sees them:
//!
//! - The file is **Latin-1** encoded; each byte maps to the identical
//!   Unicode scalar value, so decoding never fails.
//! - Property keys are lower-cased (the `parent` key must be found whether
//!   the file says `Parent` or `parent`).
//! - Values in the PHP-flavored dialect are double-quoted; surrounding
//!   quotes are stripped.
//! - The meta sections `[*]` and `[GJK_Browscap_Version]` describe the
//!   database itself, not a user agent, and are removed.
//! - Leaf sections are those never cited as a `parent` value.
//!
//! # Example
//!
//! ```
//! use browscap::ini;
//!
//! let raw = ini::parse_str(
//!     "[Firefox]\nBrowser=Firefox\n\n[Mozilla/5.0*Firefox*]\nParent=Firefox\n",
//! )?;
//! assert_eq!(raw.sections.len(), 2);
//! assert!(raw.leaf_ids.contains("Mozilla/5.0*Firefox*"));
//! assert!(!raw.leaf_ids.contains("Firefox"));
//! # Ok::<(), browscap::BrowscapError>(())
//! ```

use crate::error::{BrowscapError, Result};
use crate::resolver::{SectionMap, PARENT_KEY};
use log::debug;
use rustc_hash::FxHashSet;
use std::fs;
use std::path::Path;

/// Sections whose content describes the database, not a user agent.
pub const META_SECTIONS: [&str; 2] = ["*", "GJK_Browscap_Version"];

/// Parsed browscap database, ready to feed to
/// [`UserAgentDatabase::load_sections`](crate::UserAgentDatabase::load_sections).
#[derive(Debug, Default)]
pub struct RawDatabase {
    /// Section identifier → raw properties (keys lower-cased)
    pub sections: SectionMap,
    /// Sections never referenced as a parent
    pub leaf_ids: FxHashSet<String>,
}

/// Reads and parses a browscap.ini file.
///
/// # Errors
///
/// [`BrowscapError::Io`] if the file cannot be read,
/// [`BrowscapError::Parse`] on malformed INI text.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<RawDatabase> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .map_err(|e| BrowscapError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    let text = decode_latin1(&bytes);
    parse_str(&text)
}

/// Parses browscap.ini text.
///
/// # Errors
///
/// [`BrowscapError::Parse`] on a property line outside any section or a
/// property line with no `=` separator.
pub fn parse_str(text: &str) -> Result<RawDatabase> {
    let mut sections = SectionMap::default();
    let mut current: Option<String> = None;

    for (line_number, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            sections.entry(name.to_string()).or_default();
            current = Some(name.to_string());
            continue;
        }

        let section = current.as_ref().ok_or_else(|| {
            BrowscapError::Parse(format!(
                "line {}: property outside any section: {}",
                line_number + 1,
                line
            ))
        })?;

        let (key, value) = line.split_once('=').ok_or_else(|| {
            BrowscapError::Parse(format!(
                "line {}: expected key=value: {}",
                line_number + 1,
                line
            ))
        })?;

        sections
            .get_mut(section)
            .expect("current section was inserted on its header line")
            .insert(
                key.trim().to_lowercase(),
                unquote(value.trim()).to_string(),
            );
    }

    for meta in META_SECTIONS {
        sections.remove(meta);
    }

    let leaf_ids = derive_leaves(&sections);
    debug!(
        "parsed {} sections, {} leaf sections",
        sections.len(),
        leaf_ids.len()
    );

    Ok(RawDatabase { sections, leaf_ids })
}

/// Latin-1 → UTF-8 String; every byte is a valid scalar value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Strips one pair of surrounding double quotes, if present.
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Leaf sections: every section not named as another section's parent.
fn derive_leaves(sections: &SectionMap) -> FxHashSet<String> {
    let mut leaves: FxHashSet<String> = sections.keys().cloned().collect();
    for props in sections.values() {
        if let Some(parent) = props.get(PARENT_KEY) {
            leaves.remove(parent);
        }
    }
    leaves
}
