// crates/cohost-server/src/server/tests.rs
// ============================================================================
// Module: Harness Server Unit Tests
// Description: Unit tests for lifecycle ordering, rollback, and dispatch.
// Purpose: Validate server state machine behavior with in-memory fixtures.
// Dependencies: cohost-server
// ============================================================================

//! ## Overview
//! Exercises the harness lifecycle state machine and the fallback dispatcher
//! with in-memory fixtures: start/stop ordering, rollback on mount failure,
//! stop idempotence, and dispatch refusals.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only lifecycle assertions."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;

use axum::body::Body;
use axum::body::Bytes;
use axum::body::to_bytes;
use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use cohost_config::HarnessConfig;
use cohost_core::AppLifecycle;
use cohost_core::AppMount;
use cohost_core::AppRequest;
use cohost_core::AppResponse;
use cohost_core::MountPrefix;
use cohost_core::PathMux;
use cohost_core::StartError;
use cohost_core::StopError;

use super::DispatchState;
use super::HarnessServer;
use super::ServerError;
use super::ServerPhase;
use super::dispatch;
use crate::faults::FaultSink;
use crate::faults::StopFault;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Lifecycle probe recording start/stop events in order.
struct LifecycleProbe {
    /// Probe label used in recorded events.
    label: String,
    /// Shared event log.
    events: Arc<Mutex<Vec<String>>>,
    /// Fail the next start call.
    fail_start: bool,
    /// Fail every stop call.
    fail_stop: bool,
}

impl AppLifecycle for LifecycleProbe {
    fn start(&self) -> Result<(), StartError> {
        self.events.lock().expect("event log lock").push(format!("{}:start", self.label));
        if self.fail_start {
            return Err(StartError::new("probe start failure"));
        }
        Ok(())
    }

    fn stop(&self) -> Result<(), StopError> {
        self.events.lock().expect("event log lock").push(format!("{}:stop", self.label));
        if self.fail_stop {
            return Err(StopError::new("probe stop failure"));
        }
        Ok(())
    }
}

/// Fault sink recording every fault it receives.
#[derive(Default)]
struct RecordingFaultSink {
    /// Recorded faults in arrival order.
    faults: Mutex<Vec<StopFault>>,
}

impl FaultSink for RecordingFaultSink {
    fn record(&self, fault: &StopFault) {
        self.faults.lock().expect("fault log lock").push(fault.clone());
    }
}

/// Builds a loopback config with an ephemeral port.
fn ephemeral_config() -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.listen.port = 0;
    config
}

/// Builds a mount whose handler echoes its label.
fn probe_mount(
    prefix: &str,
    events: &Arc<Mutex<Vec<String>>>,
    fail_start: bool,
    fail_stop: bool,
) -> AppMount {
    let label = prefix.trim_start_matches('/').to_string();
    let header_label = label.clone();
    let handler = move |_request: AppRequest| AppResponse::ok().with_header("X-App", header_label.clone());
    AppMount::new(MountPrefix::new(prefix).expect("valid prefix"), Arc::new(handler))
        .with_lifecycle(Arc::new(LifecycleProbe {
            label,
            events: Arc::clone(events),
            fail_start,
            fail_stop,
        }))
}

// ============================================================================
// SECTION: Lifecycle Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn start_binds_listener_and_runs() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut server = HarnessServer::new(ephemeral_config());
    server.register(probe_mount("/main", &events, false, false)).expect("register");
    assert_eq!(server.phase(), ServerPhase::Created);
    assert!(server.local_addr().is_none());

    let addr = server.start().await.expect("start");
    assert_eq!(server.phase(), ServerPhase::Running);
    assert_eq!(server.local_addr(), Some(addr));
    assert_ne!(addr.port(), 0);

    let report = server.stop().await;
    assert!(report.is_clean());
    assert_eq!(server.phase(), ServerPhase::Stopped);
}

#[tokio::test(flavor = "multi_thread")]
async fn register_is_only_legal_while_created() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut server = HarnessServer::new(ephemeral_config());
    server.register(probe_mount("/main", &events, false, false)).expect("register");
    server.start().await.expect("start");

    let err = server.register(probe_mount("/late", &events, false, false));
    assert!(matches!(err, Err(ServerError::InvalidPhase { operation: "register", .. })));
    let _report = server.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn conflicting_prefix_is_rejected_before_start() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut server = HarnessServer::new(ephemeral_config());
    server.register(probe_mount("/a", &events, false, false)).expect("register");
    let err = server.register(probe_mount("/a/b", &events, false, false));
    assert!(matches!(err, Err(ServerError::Conflict(_))));
    assert!(events.lock().expect("event log lock").is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn mount_start_failure_rolls_back_in_reverse_order() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut server = HarnessServer::new(ephemeral_config());
    server.register(probe_mount("/a", &events, false, false)).expect("register");
    server.register(probe_mount("/b", &events, false, false)).expect("register");
    server.register(probe_mount("/c", &events, true, false)).expect("register");

    let err = server.start().await;
    match err {
        Err(ServerError::Start {
            prefix,
            ..
        }) => assert_eq!(prefix, "/c"),
        other => panic!("expected start error, got {other:?}"),
    }
    assert_eq!(server.phase(), ServerPhase::Stopped);
    let log = events.lock().expect("event log lock").clone();
    assert_eq!(log, vec!["a:start", "b:start", "c:start", "b:stop", "a:stop"]);

    // Nothing is left started: a second stop has nothing to do.
    let report = server.stop().await;
    assert!(report.is_clean());
    assert!(events.lock().expect("event log lock").len() == 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_is_idempotent() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut server = HarnessServer::new(ephemeral_config());
    server.register(probe_mount("/main", &events, false, false)).expect("register");
    server.start().await.expect("start");

    let first = server.stop().await;
    assert!(first.is_clean());
    let second = server.stop().await;
    assert!(second.is_clean());
    assert_eq!(server.phase(), ServerPhase::Stopped);
    let log = events.lock().expect("event log lock").clone();
    assert_eq!(log, vec!["main:start", "main:stop"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_collects_faults_without_halting_teardown() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::new(RecordingFaultSink::default());
    let mut server = HarnessServer::new(ephemeral_config()).with_fault_sink(sink.clone());
    server.register(probe_mount("/a", &events, false, true)).expect("register");
    server.register(probe_mount("/b", &events, false, true)).expect("register");
    server.start().await.expect("start");

    let report = server.stop().await;
    assert_eq!(report.faults.len(), 2);
    assert_eq!(report.faults[0].prefix, "/b");
    assert_eq!(report.faults[1].prefix, "/a");
    assert_eq!(sink.faults.lock().expect("fault log lock").len(), 2);
    assert_eq!(server.phase(), ServerPhase::Stopped);
}

#[tokio::test(flavor = "multi_thread")]
async fn stopped_server_cannot_be_restarted() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut server = HarnessServer::new(ephemeral_config());
    server.register(probe_mount("/main", &events, false, false)).expect("register");
    server.start().await.expect("start");
    let _report = server.stop().await;

    let err = server.start().await;
    assert!(matches!(err, Err(ServerError::InvalidPhase { operation: "start", .. })));
}

// ============================================================================
// SECTION: Dispatch Tests
// ============================================================================

/// Builds dispatch state over one `/main` mount.
fn dispatch_state(running: bool) -> Arc<DispatchState> {
    let mut mux = PathMux::new();
    mux.register(MountPrefix::new("/main").expect("valid prefix"), 0).expect("register");
    let handler = |request: AppRequest| {
        AppResponse::ok()
            .with_header("X-App", "main")
            .with_header("X-Path", request.path.clone())
            .with_body(format!("main:{}", request.path))
    };
    Arc::new(DispatchState {
        mux,
        handlers: vec![Arc::new(handler)],
        max_body_bytes: 1024,
        running: Arc::new(AtomicBool::new(running)),
    })
}

/// Builds a bodyless GET request for the given path.
fn get_request(path: &str) -> Request {
    Request::builder().method("GET").uri(path).body(Body::empty()).expect("request")
}

#[tokio::test(flavor = "multi_thread")]
async fn dispatch_refuses_before_running() {
    let state = dispatch_state(false);
    let response = dispatch(State(state), get_request("/main/")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test(flavor = "multi_thread")]
async fn dispatch_routes_and_strips_prefix() {
    let state = dispatch_state(true);
    let response = dispatch(State(state), get_request("/main/resources")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("X-Path").and_then(|value| value.to_str().ok()),
        Some("/resources")
    );
    let body = to_bytes(response.into_body(), 1024).await.expect("response body");
    assert_eq!(body.as_ref(), b"main:/resources");
}

#[tokio::test(flavor = "multi_thread")]
async fn dispatch_returns_404_for_unmatched_path() {
    let state = dispatch_state(true);
    let response = dispatch(State(state), get_request("/secondary/")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn dispatch_rejects_unknown_methods() {
    let state = dispatch_state(true);
    let request =
        Request::builder().method("TRACE").uri("/main/").body(Body::empty()).expect("request");
    let response = dispatch(State(state), request).await;
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test(flavor = "multi_thread")]
async fn dispatch_enforces_body_limit() {
    let state = dispatch_state(true);
    let oversized = vec![0u8; 4096];
    let request = Request::builder()
        .method("POST")
        .uri("/main/upload")
        .body(Body::from(oversized))
        .expect("request");
    let response = dispatch(State(state), request).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

/// Body that fails mid-stream, as when a client aborts an upload.
struct AbortedBody;

impl http_body::Body for AbortedBody {
    type Data = Bytes;
    type Error = std::io::Error;

    fn poll_frame(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
        std::task::Poll::Ready(Some(Err(std::io::Error::other("connection reset"))))
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn dispatch_reports_aborted_body_as_bad_request() {
    let state = dispatch_state(true);
    let request = Request::builder()
        .method("POST")
        .uri("/main/upload")
        .body(Body::new(AbortedBody))
        .expect("request");
    let response = dispatch(State(state), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
