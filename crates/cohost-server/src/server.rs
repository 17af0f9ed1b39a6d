// crates/cohost-server/src/server.rs
// ============================================================================
// Module: Harness Server
// Description: Multi-tenant HTTP harness server with per-mount lifecycle.
// Purpose: Host N independent applications on one listener by path prefix.
// Dependencies: cohost-core, cohost-config, axum, http-body-util, tokio
// ============================================================================

//! ## Overview
//! [`HarnessServer`] owns one tokio TCP listener and the ordered sequence of
//! registered mounts. Its lifecycle is a strict state machine
//! (`Created → Starting → Running → Stopping → Stopped`): registration is
//! only legal while `Created`, the multiplexer is frozen behind an `Arc`
//! before any traffic flows, and a failed mount start rolls back every mount
//! already started before the failure surfaces. Requests are dispatched
//! through [`PathMux`] with the matched prefix stripped; unmatched paths get
//! a plain 404 without touching any handler.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use axum::Router;
use axum::body::Body;
use axum::body::to_bytes;
use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use cohost_config::ConfigError;
use cohost_config::HarnessConfig;
use cohost_core::AppHandler;
use cohost_core::AppMount;
use cohost_core::AppRequest;
use cohost_core::AppResponse;
use cohost_core::MountPrefix;
use cohost_core::MuxError;
use cohost_core::PathMux;
use cohost_core::RequestMethod;
use cohost_core::StartError;
use tokio::task::JoinHandle;

use crate::faults::FaultSink;
use crate::faults::StderrFaultSink;
use crate::faults::StopFault;
use crate::faults::StopReport;

// ============================================================================
// SECTION: Server Phase
// ============================================================================

/// Harness server lifecycle phases.
///
/// # Invariants
/// - Transitions are monotonic: a stopped server is never restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerPhase {
    /// Constructed; mounts may be registered.
    Created,
    /// Listener bound; mounts are starting in registration order.
    Starting,
    /// All mounts started; traffic is being dispatched.
    Running,
    /// Mounts are stopping in reverse registration order.
    Stopping,
    /// Listener closed; terminal.
    Stopped,
}

impl ServerPhase {
    /// Returns a stable label for the phase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        }
    }
}

// ============================================================================
// SECTION: Harness Server
// ============================================================================

/// Listener task state for a started server.
struct ListenerTask {
    /// Bound local address, resolved after bind (supports port 0).
    local_addr: SocketAddr,
    /// Background serve task.
    join: JoinHandle<Result<(), std::io::Error>>,
    /// Flag gating dispatch; false until all mounts have started.
    running: Arc<AtomicBool>,
}

/// Multi-tenant harness server.
pub struct HarnessServer {
    /// Harness configuration.
    config: HarnessConfig,
    /// Registered mounts in registration order.
    mounts: Vec<AppMount>,
    /// Routing table built incrementally at registration.
    mux: PathMux,
    /// Current lifecycle phase.
    phase: ServerPhase,
    /// Number of mounts whose lifecycle start has succeeded.
    started: usize,
    /// Sink receiving teardown faults.
    fault_sink: Arc<dyn FaultSink>,
    /// Listener task, present from Starting until Stopped.
    listener: Option<ListenerTask>,
}

impl HarnessServer {
    /// Builds a new harness server in the `Created` phase.
    #[must_use]
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            mounts: Vec::new(),
            mux: PathMux::new(),
            phase: ServerPhase::Created,
            started: 0,
            fault_sink: Arc::new(StderrFaultSink),
            listener: None,
        }
    }

    /// Replaces the teardown fault sink.
    #[must_use]
    pub fn with_fault_sink(mut self, sink: Arc<dyn FaultSink>) -> Self {
        self.fault_sink = sink;
        self
    }

    /// Returns the current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> ServerPhase {
        self.phase
    }

    /// Returns the bound listener address once the server has started.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().map(|task| task.local_addr)
    }

    /// Returns the base URL for a mount against the bound listener.
    #[must_use]
    pub fn mount_url(&self, prefix: &MountPrefix) -> Option<String> {
        self.local_addr()
            .map(|addr| format!("{}://{addr}{prefix}", self.config.listen.scheme.as_str()))
    }

    /// Registers a mount.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidPhase`] outside the `Created` phase and
    /// [`ServerError::Conflict`] when the prefix overlaps an existing mount.
    pub fn register(&mut self, mount: AppMount) -> Result<(), ServerError> {
        if self.phase != ServerPhase::Created {
            return Err(ServerError::InvalidPhase {
                operation: "register",
                phase: self.phase.as_str(),
            });
        }
        self.mux.register(mount.prefix().clone(), self.mounts.len())?;
        self.mounts.push(mount);
        Ok(())
    }

    /// Starts the listener, then each mount in registration order.
    ///
    /// On any mount failure the already-started mounts are stopped in
    /// reverse order, the listener is closed, and the server lands in
    /// `Stopped`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the configuration is invalid, the bind
    /// fails, or a mount fails to initialize.
    pub async fn start(&mut self) -> Result<SocketAddr, ServerError> {
        if self.phase != ServerPhase::Created {
            return Err(ServerError::InvalidPhase {
                operation: "start",
                phase: self.phase.as_str(),
            });
        }
        self.config.validate()?;
        self.phase = ServerPhase::Starting;

        let listener = match tokio::net::TcpListener::bind(self.config.bind_addr()).await {
            Ok(listener) => listener,
            Err(err) => {
                self.phase = ServerPhase::Stopped;
                return Err(ServerError::Transport(format!(
                    "bind {} failed: {err}",
                    self.config.bind_addr()
                )));
            }
        };
        let local_addr = match listener.local_addr() {
            Ok(addr) => addr,
            Err(err) => {
                self.phase = ServerPhase::Stopped;
                return Err(ServerError::Transport(format!("listener address unavailable: {err}")));
            }
        };

        let running = Arc::new(AtomicBool::new(false));
        let state = Arc::new(DispatchState {
            mux: self.mux.clone(),
            handlers: self.mounts.iter().map(|mount| Arc::clone(mount.handler())).collect(),
            max_body_bytes: self.config.limits.max_body_bytes,
            running: Arc::clone(&running),
        });
        let app = Router::new().fallback(dispatch).with_state(state);
        let join = tokio::spawn(async move { axum::serve(listener, app).await });
        self.listener = Some(ListenerTask {
            local_addr,
            join,
            running,
        });

        for index in 0..self.mounts.len() {
            if let Err(source) = self.mounts[index].lifecycle().start() {
                let prefix = self.mounts[index].prefix().to_string();
                let _rollback = self.teardown_mounts();
                self.close_listener();
                self.phase = ServerPhase::Stopped;
                return Err(ServerError::Start {
                    prefix,
                    source,
                });
            }
            self.started = index + 1;
        }

        if let Some(task) = self.listener.as_ref() {
            task.running.store(true, Ordering::SeqCst);
        }
        self.phase = ServerPhase::Running;
        Ok(local_addr)
    }

    /// Stops started mounts in reverse order, then closes the listener.
    ///
    /// Idempotent: stopping an already-stopped server is a no-op returning
    /// an empty report. Teardown faults are collected, never propagated, so
    /// one mount cannot block the others. In-flight requests are abandoned.
    pub async fn stop(&mut self) -> StopReport {
        if matches!(self.phase, ServerPhase::Stopped) {
            return StopReport::default();
        }
        self.phase = ServerPhase::Stopping;
        if let Some(task) = self.listener.as_ref() {
            task.running.store(false, Ordering::SeqCst);
        }
        let report = self.teardown_mounts();
        if let Some(task) = self.listener.take() {
            task.join.abort();
            let _ = task.join.await;
        }
        self.phase = ServerPhase::Stopped;
        report
    }

    /// Stops started mounts in reverse order, collecting faults.
    fn teardown_mounts(&mut self) -> StopReport {
        let mut report = StopReport::default();
        for index in (0..self.started).rev() {
            if let Err(err) = self.mounts[index].lifecycle().stop() {
                let fault = StopFault {
                    prefix: self.mounts[index].prefix().to_string(),
                    reason: err.reason,
                };
                self.fault_sink.record(&fault);
                report.faults.push(fault);
            }
        }
        self.started = 0;
        report
    }

    /// Aborts the listener task without awaiting it.
    fn close_listener(&mut self) {
        if let Some(task) = self.listener.take() {
            task.join.abort();
        }
    }
}

impl Drop for HarnessServer {
    fn drop(&mut self) {
        // Scoped release: callers that bail before stop() still tear down.
        if !matches!(self.phase, ServerPhase::Stopped | ServerPhase::Created) {
            let _report = self.teardown_mounts();
            self.close_listener();
            self.phase = ServerPhase::Stopped;
        }
    }
}

impl std::fmt::Debug for HarnessServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarnessServer")
            .field("phase", &self.phase.as_str())
            .field("mounts", &self.mounts.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Shared state for the fallback dispatcher.
struct DispatchState {
    /// Routing table, frozen at start.
    mux: PathMux,
    /// Handler per mount slot, aligned with mux registration.
    handlers: Vec<Arc<dyn AppHandler>>,
    /// Maximum accepted request body size.
    max_body_bytes: usize,
    /// Dispatch gate; requests before `Running` are refused.
    running: Arc<AtomicBool>,
}

/// Dispatches one accepted request through the multiplexer.
async fn dispatch(State(state): State<Arc<DispatchState>>, request: Request) -> Response {
    if !state.running.load(Ordering::SeqCst) {
        return plain_response(StatusCode::SERVICE_UNAVAILABLE, "harness not running");
    }
    let (parts, body) = request.into_parts();
    let Some(method) = RequestMethod::parse(parts.method.as_str()) else {
        return plain_response(StatusCode::NOT_IMPLEMENTED, "method not supported");
    };
    let path = parts.uri.path().to_string();
    let bytes = match to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(err) if is_length_limit(&err) => {
            return plain_response(StatusCode::PAYLOAD_TOO_LARGE, "request body too large");
        }
        Err(_) => return plain_response(StatusCode::BAD_REQUEST, "request body read failed"),
    };
    let (slot, app_path) = match state.mux.resolve(&path) {
        Ok(matched) => (matched.slot, matched.app_path.to_string()),
        Err(MuxError::NotFound {
            ..
        }) => return plain_response(StatusCode::NOT_FOUND, "no mount for path"),
        Err(err) => return plain_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    };
    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value.to_str().ok().map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let app_request = AppRequest {
        method,
        path: app_path,
        headers,
        body: bytes.to_vec(),
    };
    let Some(handler) = state.handlers.get(slot) else {
        return plain_response(StatusCode::INTERNAL_SERVER_ERROR, "mount slot out of range");
    };
    let app_response = invoke_handler(handler, app_request);
    into_http_response(app_response)
}

/// Returns true when a body read failed because the size limit was hit.
///
/// Any other read failure, such as a client aborting mid-body, is a plain
/// bad request rather than a payload-too-large refusal.
fn is_length_limit(err: &axum::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        if inner.is::<http_body_util::LengthLimitError>() {
            return true;
        }
        source = inner.source();
    }
    false
}

/// Runs a synchronous handler, shifting to a blocking context when available.
fn invoke_handler(handler: &Arc<dyn AppHandler>, request: AppRequest) -> AppResponse {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(|| handler.handle(request))
        }
        _ => handler.handle(request),
    }
}

/// Converts an application response into an HTTP response.
fn into_http_response(response: AppResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder().status(status);
    for (name, value) in &response.headers {
        builder = builder.header(name, value);
    }
    builder.body(Body::from(response.body)).unwrap_or_else(|_| {
        plain_response(StatusCode::INTERNAL_SERVER_ERROR, "response conversion failed")
    })
}

/// Builds a plain-text response with the given status.
fn plain_response(status: StatusCode, message: &str) -> Response {
    Response::builder()
        .status(status)
        .header("content-type", "text/plain; charset=utf-8")
        .body(Body::from(message.to_string()))
        .unwrap_or_else(|_| {
            let mut fallback = Response::new(Body::empty());
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Harness server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// A mount prefix overlaps an existing registration.
    #[error("mount conflict: {0}")]
    Conflict(#[from] MuxError),
    /// An operation was attempted in the wrong lifecycle phase.
    #[error("{operation} is not legal while server is {phase}")]
    InvalidPhase {
        /// Operation that was attempted.
        operation: &'static str,
        /// Phase the server was in.
        phase: &'static str,
    },
    /// Listener-level failures.
    #[error("transport error: {0}")]
    Transport(String),
    /// A mount failed to initialize; the harness rolled back.
    #[error("mount {prefix} failed to start: {source}")]
    Start {
        /// Prefix of the failed mount.
        prefix: String,
        /// Underlying initialization failure.
        #[source]
        source: StartError,
    },
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
