// system-tests/src/config/mod.rs
// ============================================================================
// Module: System Test Configuration
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env handling for port, timeout, and transport profile.
// Dependencies: crate::config::env
// ============================================================================

//! ## Overview
//! System-test configuration is environment-backed and strictly parsed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod env;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use env::SystemTestConfig;
pub use env::SystemTestEnv;
pub use env::TransportProfile;
