// crates/cohost-server/src/lib.rs
// ============================================================================
// Module: Cohost Server Library
// Description: Harness server hosting several applications on one listener.
// Purpose: Expose the harness server, its lifecycle, and fault reporting.
// Dependencies: crate::{faults, server}
// ============================================================================

//! ## Overview
//! `cohost-server` owns one TCP listener and dispatches every accepted
//! request through a frozen longest-prefix multiplexer to the matching
//! mounted application. Mount lifecycles are driven strictly sequentially:
//! start in registration order, stop in reverse, with teardown faults
//! collected rather than propagated.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod faults;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use faults::FaultSink;
pub use faults::StderrFaultSink;
pub use faults::StopFault;
pub use faults::StopReport;
pub use server::HarnessServer;
pub use server::ServerError;
pub use server::ServerPhase;
