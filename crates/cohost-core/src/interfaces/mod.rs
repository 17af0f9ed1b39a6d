// crates/cohost-core/src/interfaces/mod.rs
// ============================================================================
// Module: Cohost Interfaces
// Description: Capability contracts for mounted applications.
// Purpose: Define the handler and lifecycle surfaces the harness manages.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how applications plug into the harness without the
//! harness knowing anything about the framework behind them. A mount pairs
//! an opaque [`AppHandler`] with an [`AppLifecycle`]; both are owned by
//! their creator and only referenced by the harness through `Arc`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::http::AppRequest;
use crate::core::http::AppResponse;
use crate::core::prefix::MountPrefix;

// ============================================================================
// SECTION: Handler Capability
// ============================================================================

/// Opaque request handler for one mounted application.
///
/// Implementations must be safe to call from multiple in-flight requests.
pub trait AppHandler: Send + Sync {
    /// Processes one request whose path is already mount-relative.
    fn handle(&self, request: AppRequest) -> AppResponse;
}

impl<F> AppHandler for F
where
    F: Fn(AppRequest) -> AppResponse + Send + Sync,
{
    fn handle(&self, request: AppRequest) -> AppResponse {
        self(request)
    }
}

// ============================================================================
// SECTION: Lifecycle Capability
// ============================================================================

/// Mount initialization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("mount start failed: {reason}")]
pub struct StartError {
    /// Failure description.
    pub reason: String,
}

impl StartError {
    /// Builds a start error from a failure description.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Mount teardown errors.
///
/// Stop failures are collected by the harness, never propagated as hard
/// failures, so one mount's teardown cannot block another's.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("mount stop failed: {reason}")]
pub struct StopError {
    /// Failure description.
    pub reason: String,
}

impl StopError {
    /// Builds a stop error from a failure description.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// One-time setup and teardown contract for a mounted application.
///
/// # Invariants
/// - `start` and `stop` are never called concurrently by the harness.
/// - `stop` must be safe to call after a failed or skipped `start`.
pub trait AppLifecycle: Send + Sync {
    /// Performs one-time initialization before the mount serves traffic.
    ///
    /// # Errors
    ///
    /// Returns [`StartError`] when initialization fails; the mount is then
    /// treated as un-started.
    fn start(&self) -> Result<(), StartError>;

    /// Performs best-effort teardown.
    ///
    /// # Errors
    ///
    /// Returns [`StopError`] to report a teardown fault; the harness
    /// collects faults instead of aborting remaining teardown.
    fn stop(&self) -> Result<(), StopError>;
}

/// Lifecycle for applications with no setup or teardown.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLifecycle;

impl AppLifecycle for NoopLifecycle {
    fn start(&self) -> Result<(), StartError> {
        Ok(())
    }

    fn stop(&self) -> Result<(), StopError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Application Mount
// ============================================================================

/// An opaque application paired with its mount prefix and lifecycle.
#[derive(Clone)]
pub struct AppMount {
    /// Prefix under which the application is reachable.
    prefix: MountPrefix,
    /// Request handler capability.
    handler: Arc<dyn AppHandler>,
    /// Lifecycle capability.
    lifecycle: Arc<dyn AppLifecycle>,
}

impl AppMount {
    /// Builds a mount with a no-op lifecycle.
    #[must_use]
    pub fn new(prefix: MountPrefix, handler: Arc<dyn AppHandler>) -> Self {
        Self {
            prefix,
            handler,
            lifecycle: Arc::new(NoopLifecycle),
        }
    }

    /// Attaches a lifecycle capability to the mount.
    #[must_use]
    pub fn with_lifecycle(mut self, lifecycle: Arc<dyn AppLifecycle>) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    /// Returns the mount prefix.
    #[must_use]
    pub fn prefix(&self) -> &MountPrefix {
        &self.prefix
    }

    /// Returns the handler capability.
    #[must_use]
    pub fn handler(&self) -> &Arc<dyn AppHandler> {
        &self.handler
    }

    /// Returns the lifecycle capability.
    #[must_use]
    pub fn lifecycle(&self) -> &Arc<dyn AppLifecycle> {
        &self.lifecycle
    }
}

impl std::fmt::Debug for AppMount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppMount").field("prefix", &self.prefix).finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
