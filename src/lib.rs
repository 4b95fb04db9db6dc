//! Browscap - Fast User-Agent Capabilities Database
//!
//! Browscap is a library for identifying the browser, platform, and device
//! characteristics implied by an HTTP User-Agent string, driven by a
//! browscap.ini database of glob-style patterns with inherited property
//! sets. Load the database once, then perform repeated point lookups.
//!
//! # Quick Start
//!
//! ```rust
//! use browscap::UserAgentDatabase;
//! # use browscap::ini;
//!
//! let db = UserAgentDatabase::new();
//! # let raw = ini::parse_str("[Firefox]\nBrowser=Firefox\n[Mozilla/5.0*Firefox/1.5*]\nParent=Firefox\nVersion=1.5\n")?;
//! # db.load_sections(raw.sections, raw.leaf_ids);
//! # // For documentation purposes, show it as:
//! # /*
//! db.load_file("browscap.ini")?;
//! # */
//!
//! // Strict lookup: unknown agents are an error
//! let props = db.query("Mozilla/5.0 (X11; U; Linux i686) Firefox/1.5.0.5")?;
//! assert_eq!(props["browser"], "Firefox");
//! assert_eq!(props["version"], "1.5");
//!
//! // Lenient lookup: unknown agents yield an empty map
//! let unknown = db.query_lenient("totally-unknown-agent")?;
//! assert!(unknown.is_empty());
//! # Ok::<(), browscap::BrowscapError>(())
//! ```
//!
//! # Key Features
//!
//! - **Most-specific matching**: among all patterns matching a string, the
//!   longest identifier wins, so `Mozilla/5.0*Firefox/1.5*` beats `Mozilla*`
//! - **Property inheritance**: sections inherit from their `parent` chain,
//!   children overriding ancestors, resolved once at load time
//! - **Memoized queries**: an LRU cache short-circuits repeated lookups of
//!   the same User-Agent string, the common case for servers
//! - **Atomic reloads**: each load publishes a complete new catalog in one
//!   swap; concurrent queries never observe a half-built database
//! - **Tolerant loading**: a malformed section is logged and skipped, never
//!   aborting the rest of the load
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  browscap.ini (Latin-1 INI text)        │
//! └─────────────────────────────────────────┘
//!          ↓ ini: sections + leaf set
//! ┌─────────────────────────────────────────┐
//! │  Catalog (built once per load)          │
//! │  per leaf: compiled pattern             │
//! │            + resolved properties        │
//! └─────────────────────────────────────────┘
//!          ↓ published by atomic swap
//! ┌─────────────────────────────────────────┐
//! │  Matcher (per query)                    │
//! │  LRU cache → linear scan →              │
//! │  most-specific selection                │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The scan is linear in the number of leaf patterns; the cache exists
//! because of it. Grouping patterns by literal prefix is a compatible
//! future optimization as long as selection semantics are preserved.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
/// The loaded catalog of compiled patterns and resolved properties
pub mod catalog;
/// Unified user-agent database API
pub mod database;
/// Error types for browscap operations
pub mod error;
pub mod glob;
/// browscap.ini parsing (the loading collaborator)
pub mod ini;
/// Matching and the memoizing match cache
pub mod matcher;
/// Property inheritance resolution
pub mod resolver;

// Re-exports for consumers

/// User-agent capabilities database, the primary public API
pub use crate::database::UserAgentDatabase;

pub use crate::catalog::{Catalog, CatalogEntry};
pub use crate::error::{BrowscapError, Result};
pub use crate::glob::UaPattern;
pub use crate::matcher::{Matcher, MatcherStats, StatsSnapshot};
pub use crate::resolver::{PropertyMap, PropertyResolver, SectionMap, PARENT_KEY};

// Version information
/// Library version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
