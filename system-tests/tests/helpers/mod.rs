// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for Cohost system-tests.
// Purpose: Provide harness spawning, test applications, and readiness probes.
// Dependencies: system-tests, cohost-core, cohost-server, cohost-client
// ============================================================================

//! ## Overview
//! Shared helpers for Cohost system-tests: in-process harness spawning,
//! canned test applications with recording lifecycles, and readiness probes
//! that poll instead of sleeping.

#![allow(
    dead_code,
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Shared helpers are reused across multiple test suites."
)]

pub mod apps;
pub mod harness;
pub mod readiness;
