/// Error types for the browscap library
use std::fmt;

/// Result type alias for browscap operations
pub type Result<T> = std::result::Result<T, BrowscapError>;

/// Main error type for browscap operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowscapError {
    /// Pattern-related errors (malformed glob in a section identifier)
    InvalidPattern(String),

    /// A section's parent chain loops back on itself
    CyclicInheritance {
        /// Section whose resolution re-entered the chain
        section: String,
    },

    /// A section names a parent that does not exist in the database
    MissingParent {
        /// Section carrying the dangling reference
        section: String,
        /// The parent name that could not be found
        parent: String,
    },

    /// A section identifier was requested that the database does not contain
    UnknownSection(String),

    /// Query issued before any database was loaded
    Uninitialized,

    /// No pattern in the database matches the given user-agent string
    UnknownUserAgent(String),

    /// I/O errors
    Io(String),

    /// Database text format/parsing errors
    Parse(String),
}

impl fmt::Display for BrowscapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowscapError::InvalidPattern(msg) => write!(f, "Invalid pattern: {}", msg),
            BrowscapError::CyclicInheritance { section } => {
                write!(f, "Cyclic inheritance involving section [{}]", section)
            }
            BrowscapError::MissingParent { section, parent } => {
                write!(f, "Section [{}] names missing parent [{}]", section, parent)
            }
            BrowscapError::UnknownSection(section) => {
                write!(f, "Unknown section: [{}]", section)
            }
            BrowscapError::Uninitialized => {
                write!(f, "Database not initialized: call a load method first")
            }
            BrowscapError::UnknownUserAgent(ua) => {
                write!(f, "Unknown user agent: [{}]", ua)
            }
            BrowscapError::Io(msg) => write!(f, "I/O error: {}", msg),
            BrowscapError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for BrowscapError {}

impl From<std::io::Error> for BrowscapError {
    fn from(err: std::io::Error) -> Self {
        BrowscapError::Io(err.to_string())
    }
}
