// crates/cohost-client/src/lib.rs
// ============================================================================
// Module: Cohost Client Library
// Description: Single-shot HTTP client for harness assertions.
// Purpose: Expose the harness client and its response model.
// Dependencies: crate::client
// ============================================================================

//! ## Overview
//! `cohost-client` issues deterministic single-shot requests against one
//! harness mount. There are no retries and no backoff: an integration test
//! asserting on the response must observe exactly one request.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::ClientError;
pub use client::ClientResponse;
pub use client::HarnessClient;
