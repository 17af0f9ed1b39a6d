// crates/cohost-config/src/lib.rs
// ============================================================================
// Module: Cohost Config Library
// Description: Canonical config model and validation for the harness.
// Purpose: Single source of truth for cohost.toml semantics.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! `cohost-config` defines the canonical configuration model for the Cohost
//! harness. Parsing is strict and fail-closed: unknown fields are rejected,
//! file size is capped, and every loaded configuration is validated before
//! use.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
