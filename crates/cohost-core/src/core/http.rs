// crates/cohost-core/src/core/http.rs
// ============================================================================
// Module: Application Request Model
// Description: Transport-agnostic request and response types for mounts.
// Purpose: Define the data a mounted application handler sees and returns.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The harness hands each mounted application an [`AppRequest`] whose path
//! has already had the mount prefix stripped, and expects an [`AppResponse`]
//! back. Adaptation to and from any concrete HTTP stack happens at the
//! transport edge, never here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Request Method
// ============================================================================

/// HTTP request methods accepted by the harness.
///
/// # Invariants
/// - Variants are stable; unrecognized methods are rejected at the
///   transport edge before a handler is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestMethod {
    /// HTTP GET.
    Get,
    /// HTTP HEAD.
    Head,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP DELETE.
    Delete,
    /// HTTP PATCH.
    Patch,
    /// HTTP OPTIONS.
    Options,
}

impl RequestMethod {
    /// Returns the canonical uppercase method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Options => "OPTIONS",
        }
    }

    /// Parses an uppercase method token.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "GET" => Some(Self::Get),
            "HEAD" => Some(Self::Head),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Application Request
// ============================================================================

/// Request delivered to a mounted application handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRequest {
    /// Request method.
    pub method: RequestMethod,
    /// Request path relative to the mount, always starting with `/`.
    pub path: String,
    /// Request headers in arrival order.
    pub headers: Vec<(String, String)>,
    /// Request body bytes.
    pub body: Vec<u8>,
}

impl AppRequest {
    /// Builds a bodyless request for the given method and mount-relative path.
    #[must_use]
    pub fn new(method: RequestMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Returns the first header value matching `name`, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

// ============================================================================
// SECTION: Application Response
// ============================================================================

/// Response produced by a mounted application handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in emission order.
    pub headers: Vec<(String, String)>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl AppResponse {
    /// Builds an empty response with the given status.
    #[must_use]
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Builds an empty `200 OK` response.
    #[must_use]
    pub fn ok() -> Self {
        Self::with_status(200)
    }

    /// Appends a response header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the response body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the first header value matching `name`, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
