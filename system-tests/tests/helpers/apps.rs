// system-tests/tests/helpers/apps.rs
// ============================================================================
// Module: Test Applications
// Description: Canned applications mounted by system tests.
// Purpose: Provide handlers and lifecycles with observable behavior.
// Dependencies: cohost-core
// ============================================================================

//! ## Overview
//! Each test application stamps an identifying `X-App` header and echoes the
//! mount-relative path it saw, so cross-mount leakage is directly visible in
//! assertions. Lifecycles record start/stop events into a shared log and can
//! be told to fail on command.

use std::sync::Arc;
use std::sync::Mutex;

use cohost_core::AppHandler;
use cohost_core::AppLifecycle;
use cohost_core::AppMount;
use cohost_core::AppRequest;
use cohost_core::AppResponse;
use cohost_core::MountPrefix;
use cohost_core::StartError;
use cohost_core::StopError;

/// Shared start/stop event log, in call order.
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Creates an empty event log.
pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Returns a snapshot of the event log.
pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().map(|guard| guard.clone()).unwrap_or_default()
}

/// Handler stamping `X-App` with its label and echoing the seen path.
pub struct LabeledApp {
    /// Label stamped into `X-App`.
    label: String,
}

impl AppHandler for LabeledApp {
    fn handle(&self, request: AppRequest) -> AppResponse {
        let mut response = AppResponse::ok()
            .with_header("X-App", self.label.clone())
            .with_header("X-App-Path", request.path.clone());
        if let Some(probe) = request.header("X-Probe") {
            response = response.with_header("X-Probe-Echo", probe);
        }
        response.with_body(format!("{}:{}", self.label, request.path))
    }
}

/// Lifecycle recording events and failing on command.
pub struct RecordingLifecycle {
    /// Label used in recorded events.
    label: String,
    /// Shared event log.
    log: EventLog,
    /// Fail the start call.
    fail_start: bool,
    /// Fail every stop call.
    fail_stop: bool,
}

impl AppLifecycle for RecordingLifecycle {
    fn start(&self) -> Result<(), StartError> {
        if let Ok(mut guard) = self.log.lock() {
            guard.push(format!("{}:start", self.label));
        }
        if self.fail_start {
            return Err(StartError::new(format!("{} refused to start", self.label)));
        }
        Ok(())
    }

    fn stop(&self) -> Result<(), StopError> {
        if let Ok(mut guard) = self.log.lock() {
            guard.push(format!("{}:stop", self.label));
        }
        if self.fail_stop {
            return Err(StopError::new(format!("{} refused to stop", self.label)));
        }
        Ok(())
    }
}

/// Builds a labeled application mount with a recording lifecycle.
pub fn labeled_mount(prefix: &str, log: &EventLog) -> AppMount {
    mount_with_failures(prefix, log, false, false)
}

/// Builds a labeled mount whose lifecycle fails as instructed.
pub fn mount_with_failures(
    prefix: &str,
    log: &EventLog,
    fail_start: bool,
    fail_stop: bool,
) -> AppMount {
    let label = prefix.trim_start_matches('/').to_string();
    let handler: Arc<dyn AppHandler> = Arc::new(LabeledApp {
        label: label.clone(),
    });
    let prefix = MountPrefix::new(prefix).expect("test prefixes are valid");
    AppMount::new(prefix, handler).with_lifecycle(Arc::new(RecordingLifecycle {
        label,
        log: Arc::clone(log),
        fail_start,
        fail_stop,
    }))
}
