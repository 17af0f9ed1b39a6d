// crates/cohost-core/src/core/mod.rs
// ============================================================================
// Module: Cohost Core Types
// Description: Request model, mount prefixes, and the path multiplexer.
// Purpose: Define the data types shared by the harness server and clients.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types are plain data with strict constructors. Validation fails
//! closed: a [`prefix::MountPrefix`] that parses is safe to register, and a
//! [`mux::PathMux`] that accepts a registration set resolves unambiguously.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod http;
pub mod mux;
pub mod prefix;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use http::AppRequest;
pub use http::AppResponse;
pub use http::RequestMethod;
pub use mux::Matched;
pub use mux::MuxError;
pub use mux::PathMux;
pub use prefix::MountPrefix;
pub use prefix::PrefixError;
