//! User-agent pattern matching implementation.
//!
//! Section identifiers in a browscap database are glob-style patterns in a
//! deliberately small dialect: `*` and `?` are wildcards and every other
//! character is literal. In particular `[`, `]`, `.`, `-`, `^`, `$`, `(` and
//! `)` carry no special meaning; real patterns are full of them
//! (`Mozilla/5.0 (Windows*`) and they must match themselves. Patterns are
//! parsed into structured segments and matched against the whole input
//! string, anchored at both ends.
//!
//! # Pattern Syntax
//!
//! - `*` - Matches zero or more of any character
//! - `?` - Matches exactly one of any character
//! - `\x` - Escapes character x (literal `*`, `?` or `\`)
//! - anything else - Matches itself, case-sensitively
//!
//! # Examples
//!
//! ```
//! use browscap::glob::UaPattern;
//!
//! let pattern = UaPattern::parse("Mozilla/5.0*Firefox/1.?.*")?;
//! assert!(pattern.matches("Mozilla/5.0 (X11) Firefox/1.5.0.5"));
//! assert!(!pattern.matches("Mozilla/4.0 Firefox/2.0"));
//! # Ok::<(), browscap::BrowscapError>(())
//! ```

use crate::error::BrowscapError;
use std::fmt;

/// A segment of a parsed user-agent pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text segment (no wildcards)
    Literal(String),

    /// `*` - matches zero or more of any character
    Star,

    /// `?` - matches exactly one character
    Question,
}

/// A compiled user-agent pattern.
///
/// Immutable once parsed. Matching is anchored: the pattern must consume the
/// entire input string, so `Wget*` matches `Wget/1.10.2` but not
/// `GNU Wget/1.10.2`.
#[derive(Debug, Clone)]
pub struct UaPattern {
    /// Original pattern string as written in the database
    pattern: String,
    /// Parsed segments
    segments: Vec<Segment>,
}

impl UaPattern {
    /// Parses a pattern string into a compiled matcher.
    ///
    /// # Errors
    ///
    /// Returns `BrowscapError::InvalidPattern` if the pattern ends in an
    /// unfinished escape (a trailing `\`).
    ///
    /// # Examples
    ///
    /// ```
    /// use browscap::glob::UaPattern;
    ///
    /// let pattern = UaPattern::parse("Opera/9.?? (Windows*")?;
    /// assert!(pattern.matches("Opera/9.64 (Windows NT 5.1; U; en)"));
    /// # Ok::<(), browscap::BrowscapError>(())
    /// ```
    pub fn parse(pattern: &str) -> Result<Self, BrowscapError> {
        let segments = Self::parse_segments(pattern)?;
        Ok(Self {
            pattern: pattern.to_string(),
            segments,
        })
    }

    /// Returns the original pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Pattern specificity: the character count of the identifier as written.
    ///
    /// Used to pick the most specific pattern when several match the same
    /// user-agent string. Counted in characters, not bytes, since browscap
    /// databases are Latin-1 text and may contain non-ASCII identifiers.
    pub fn specificity(&self) -> usize {
        self.pattern.chars().count()
    }

    /// Checks if the pattern matches the given string in full.
    pub fn matches(&self, text: &str) -> bool {
        // Limit backtracking steps so pathological patterns like
        // *a*b*c*d*e* against non-matching text stay bounded
        let mut steps_remaining = 100_000;
        self.matches_impl(text, 0, 0, &mut steps_remaining)
    }

    /// Recursive backtracking matcher.
    ///
    /// `text_pos` is a byte offset and always lands on a char boundary;
    /// advancing is done per `char` so multi-byte UTF-8 input is safe.
    fn matches_impl(
        &self,
        text: &str,
        text_pos: usize,
        seg_idx: usize,
        steps_remaining: &mut usize,
    ) -> bool {
        if *steps_remaining == 0 {
            return false; // exceeded step limit, treat as no match
        }
        *steps_remaining -= 1;

        // All segments consumed: match only if all text is consumed too
        if seg_idx >= self.segments.len() {
            return text_pos >= text.len();
        }

        match &self.segments[seg_idx] {
            Segment::Literal(lit) => {
                if text[text_pos..].starts_with(lit.as_str()) {
                    self.matches_impl(text, text_pos + lit.len(), seg_idx + 1, steps_remaining)
                } else {
                    false
                }
            }

            Segment::Question => {
                // Match exactly one character
                if let Some(ch) = text[text_pos..].chars().next() {
                    self.matches_impl(text, text_pos + ch.len_utf8(), seg_idx + 1, steps_remaining)
                } else {
                    false
                }
            }

            Segment::Star => {
                // Trailing star swallows the rest of the input
                if seg_idx + 1 >= self.segments.len() {
                    return true;
                }

                // Try consuming 0, 1, 2, ... characters, advancing by char
                // boundaries so we never slice mid-UTF-8
                let mut pos = text_pos;
                loop {
                    if self.matches_impl(text, pos, seg_idx + 1, steps_remaining) {
                        return true;
                    }
                    match text[pos..].chars().next() {
                        Some(ch) => pos += ch.len_utf8(),
                        None => break,
                    }
                }
                false
            }
        }
    }

    /// Parses a pattern string into segments.
    fn parse_segments(pattern: &str) -> Result<Vec<Segment>, BrowscapError> {
        let mut segments = Vec::new();
        let mut chars = pattern.chars();
        let mut literal_buf = String::new();

        let flush_literal = |buf: &mut String, segs: &mut Vec<Segment>| {
            if !buf.is_empty() {
                segs.push(Segment::Literal(std::mem::take(buf)));
            }
        };

        while let Some(ch) = chars.next() {
            match ch {
                '*' => {
                    flush_literal(&mut literal_buf, &mut segments);
                    // Collapse runs of stars, they are equivalent to one
                    if segments.last() != Some(&Segment::Star) {
                        segments.push(Segment::Star);
                    }
                }

                '?' => {
                    flush_literal(&mut literal_buf, &mut segments);
                    segments.push(Segment::Question);
                }

                '\\' => {
                    // Escape sequence - next character is literal
                    match chars.next() {
                        Some(escaped) => literal_buf.push(escaped),
                        None => {
                            return Err(BrowscapError::InvalidPattern(
                                "Trailing backslash in pattern".to_string(),
                            ))
                        }
                    }
                }

                _ => {
                    literal_buf.push(ch);
                }
            }
        }

        flush_literal(&mut literal_buf, &mut segments);

        Ok(segments)
    }
}

impl fmt::Display for UaPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}
