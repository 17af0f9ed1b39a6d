// crates/cohost-core/src/core/prefix.rs
// ============================================================================
// Module: Mount Prefix
// Description: Validated path prefix under which an application is mounted.
// Purpose: Enforce prefix well-formedness and segment-boundary matching.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`MountPrefix`] is the routing key for one mounted application. Parsing
//! fails closed: a prefix that constructs is non-empty, rooted at `/`, free
//! of empty segments, and never ends with a slash. Matching respects segment
//! boundaries, so `/main` covers `/main`, `/main/`, and `/main/x` but not
//! `/mainline`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted prefix length in bytes.
pub(crate) const MAX_PREFIX_LENGTH: usize = 256;

// ============================================================================
// SECTION: Prefix Type
// ============================================================================

/// Validated path prefix for a mount.
///
/// # Invariants
/// - Starts with `/`, never ends with `/`, contains no empty segment.
/// - ASCII printable, no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MountPrefix(String);

impl MountPrefix {
    /// Parses and validates a mount prefix.
    ///
    /// # Errors
    ///
    /// Returns [`PrefixError`] when the prefix is empty, unrooted, too long,
    /// ends with a slash, or contains empty segments or whitespace.
    pub fn new(raw: impl Into<String>) -> Result<Self, PrefixError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(PrefixError::Empty);
        }
        if raw.len() > MAX_PREFIX_LENGTH {
            return Err(PrefixError::TooLong {
                length: raw.len(),
            });
        }
        if !raw.starts_with('/') {
            return Err(PrefixError::Unrooted {
                prefix: raw,
            });
        }
        if raw.len() > 1 && raw.ends_with('/') {
            return Err(PrefixError::TrailingSlash {
                prefix: raw,
            });
        }
        if raw.contains("//") {
            return Err(PrefixError::EmptySegment {
                prefix: raw,
            });
        }
        if raw.chars().any(|ch| ch.is_ascii_whitespace() || ch.is_ascii_control()) {
            return Err(PrefixError::Whitespace {
                prefix: raw,
            });
        }
        Ok(Self(raw))
    }

    /// Returns the prefix as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the prefix is the bare root `/`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Returns true when `path` falls under this prefix on a segment boundary.
    #[must_use]
    pub fn covers(&self, path: &str) -> bool {
        if self.is_root() {
            return path.starts_with('/');
        }
        match path.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Returns true when the two prefixes would claim a shared subtree.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.covers(other.as_str()) || other.covers(self.as_str())
    }

    /// Strips this prefix from a covered path, yielding the mount-relative path.
    ///
    /// Returns `/` for an exact match. Callers must check [`Self::covers`]
    /// first; an uncovered path is returned unchanged.
    #[must_use]
    pub fn strip<'a>(&self, path: &'a str) -> &'a str {
        if self.is_root() {
            return path;
        }
        match path.strip_prefix(self.0.as_str()) {
            Some("") => "/",
            Some(rest) if rest.starts_with('/') => rest,
            _ => path,
        }
    }
}

impl std::fmt::Display for MountPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MountPrefix {
    type Error = PrefixError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<MountPrefix> for String {
    fn from(prefix: MountPrefix) -> Self {
        prefix.0
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Mount prefix validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefixError {
    /// Prefix was empty.
    #[error("mount prefix must not be empty")]
    Empty,
    /// Prefix exceeded the length limit.
    #[error("mount prefix length {length} exceeds {MAX_PREFIX_LENGTH} bytes")]
    TooLong {
        /// Offending length in bytes.
        length: usize,
    },
    /// Prefix did not start with a slash.
    #[error("mount prefix {prefix} must start with '/'")]
    Unrooted {
        /// Offending prefix.
        prefix: String,
    },
    /// Prefix ended with a slash.
    #[error("mount prefix {prefix} must not end with '/'")]
    TrailingSlash {
        /// Offending prefix.
        prefix: String,
    },
    /// Prefix contained an empty segment.
    #[error("mount prefix {prefix} contains an empty segment")]
    EmptySegment {
        /// Offending prefix.
        prefix: String,
    },
    /// Prefix contained whitespace or control characters.
    #[error("mount prefix {prefix} contains whitespace or control characters")]
    Whitespace {
        /// Offending prefix.
        prefix: String,
    },
}

// ============================================================================
// SECTION: Tests
// ============================================================================
