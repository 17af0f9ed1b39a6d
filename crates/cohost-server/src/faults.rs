// crates/cohost-server/src/faults.rs
// ============================================================================
// Module: Teardown Fault Reporting
// Description: Collection and reporting of mount teardown faults.
// Purpose: Keep stop-path failures observable without blocking teardown.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Stop-path failures are partial-failure tolerant: one mount's teardown
//! fault must never block the remaining mounts or the listener close. Faults
//! are collected into a [`StopReport`] and mirrored to a [`FaultSink`] so
//! deployments can plug in their own reporting without redesign.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Fault Types
// ============================================================================

/// One teardown fault collected while stopping a mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopFault {
    /// Prefix of the mount whose teardown failed.
    pub prefix: String,
    /// Failure description.
    pub reason: String,
}

/// Outcome of a harness stop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StopReport {
    /// Faults collected during teardown, in stop order.
    pub faults: Vec<StopFault>,
}

impl StopReport {
    /// Returns true when teardown completed without faults.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

// ============================================================================
// SECTION: Fault Sink
// ============================================================================

/// Sink receiving teardown faults as they are collected.
pub trait FaultSink: Send + Sync {
    /// Records one teardown fault.
    fn record(&self, fault: &StopFault);
}

/// Fault sink writing one line per fault to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrFaultSink;

impl FaultSink for StderrFaultSink {
    fn record(&self, fault: &StopFault) {
        eprintln!("cohost: mount {} teardown fault: {}", fault.prefix, fault.reason);
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
