// crates/cohost-core/src/core/mux.rs
// ============================================================================
// Module: Path Multiplexer
// Description: Longest-prefix routing table over registered mount prefixes.
// Purpose: Resolve request paths to mount slots deterministically.
// Dependencies: crate::core::prefix, thiserror
// ============================================================================

//! ## Overview
//! [`PathMux`] maps incoming request paths to registered mount slots by
//! longest-prefix match. Registration enforces pairwise non-overlap so
//! resolution is unambiguous for any accepted registration set. Resolution
//! is read-only and safe for concurrent use; the harness freezes the mux
//! behind an `Arc` before serving traffic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::prefix::MountPrefix;

// ============================================================================
// SECTION: Mux Types
// ============================================================================

/// One registered prefix and the mount slot it routes to.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MuxEntry {
    /// Registered mount prefix.
    prefix: MountPrefix,
    /// Slot index of the mount in the owning server.
    slot: usize,
}

/// Result of resolving a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched<'a> {
    /// Matched mount prefix.
    pub prefix: &'a MountPrefix,
    /// Slot index of the matched mount.
    pub slot: usize,
    /// Request path with the mount prefix stripped, always starting with `/`.
    pub app_path: &'a str,
}

/// Longest-prefix routing table.
///
/// # Invariants
/// - Registered prefixes are pairwise non-overlapping.
/// - Resolution is deterministic and side-effect free.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMux {
    /// Registered entries in registration order.
    entries: Vec<MuxEntry>,
}

impl PathMux {
    /// Creates an empty multiplexer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registered prefixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no prefix is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers a prefix for the given mount slot.
    ///
    /// # Errors
    ///
    /// Returns [`MuxError::Conflict`] when the prefix overlaps an existing
    /// registration.
    pub fn register(&mut self, prefix: MountPrefix, slot: usize) -> Result<(), MuxError> {
        if let Some(existing) = self.entries.iter().find(|entry| entry.prefix.overlaps(&prefix)) {
            return Err(MuxError::Conflict {
                prefix: prefix.to_string(),
                existing: existing.prefix.to_string(),
            });
        }
        self.entries.push(MuxEntry {
            prefix,
            slot,
        });
        Ok(())
    }

    /// Resolves a request path to the mount with the longest covering prefix.
    ///
    /// # Errors
    ///
    /// Returns [`MuxError::NotFound`] when no registered prefix covers the
    /// path.
    pub fn resolve<'a>(&'a self, path: &'a str) -> Result<Matched<'a>, MuxError> {
        self.entries
            .iter()
            .filter(|entry| entry.prefix.covers(path))
            .max_by_key(|entry| entry.prefix.as_str().len())
            .map(|entry| Matched {
                prefix: &entry.prefix,
                slot: entry.slot,
                app_path: entry.prefix.strip(path),
            })
            .ok_or_else(|| MuxError::NotFound {
                path: path.to_string(),
            })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Path multiplexer errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MuxError {
    /// A new prefix overlaps an existing registration.
    #[error("mount prefix {prefix} overlaps registered prefix {existing}")]
    Conflict {
        /// Prefix that was being registered.
        prefix: String,
        /// Previously registered prefix it overlaps.
        existing: String,
    },
    /// No registered prefix covers the request path.
    #[error("no mount registered for path {path}")]
    NotFound {
        /// Unmatched request path.
        path: String,
    },
}

// ============================================================================
// SECTION: Tests
// ============================================================================
