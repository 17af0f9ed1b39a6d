// crates/cohost-client/src/client.rs
// ============================================================================
// Module: Harness Client
// Description: Single-shot HTTP client bound to one mount base URL.
// Purpose: Issue requests for test assertions with no retries or backoff.
// Dependencies: cohost-core, reqwest, url
// ============================================================================

//! ## Overview
//! A [`HarnessClient`] is configured with the base URL of one mount and
//! issues single-shot requests against paths relative to it. Connection
//! failures surface as [`ClientError::Transport`]; nothing is retried, so a
//! test observes exactly the traffic it generated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use cohost_core::RequestMethod;
use reqwest::Client;
use reqwest::Method;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Client
// ============================================================================

/// Single-shot HTTP client for one mount.
#[derive(Debug, Clone)]
pub struct HarnessClient {
    /// Mount base URL without a trailing slash.
    base_url: String,
    /// Underlying HTTP client.
    client: Client,
}

impl HarnessClient {
    /// Builds a client for a mount base URL with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBase`] when the base URL does not parse
    /// as an absolute `http` URL, and [`ClientError::Transport`] when the
    /// underlying client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url).map_err(|err| ClientError::InvalidBase {
            base: base_url.clone(),
            reason: err.to_string(),
        })?;
        if parsed.scheme() != "http" {
            return Err(ClientError::InvalidBase {
                base: base_url,
                reason: "scheme must be http".to_string(),
            });
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::Transport(format!("failed to build http client: {err}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues a single request against a path relative to the mount.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] for a malformed relative path
    /// or header, and [`ClientError::Transport`] on connection failure. No
    /// retries are attempted.
    pub async fn request(
        &self,
        method: RequestMethod,
        relative_path: &str,
        headers: &[(&str, &str)],
    ) -> Result<ClientResponse, ClientError> {
        if !relative_path.starts_with('/') {
            return Err(ClientError::InvalidRequest(format!(
                "relative path {relative_path} must start with '/'"
            )));
        }
        let url = format!("{}{relative_path}", self.base_url);
        let method = Method::from_bytes(method.as_str().as_bytes())
            .map_err(|_| ClientError::InvalidRequest("unsupported method".to_string()))?;
        let mut request = self.client.request(method, &url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send()
            .await
            .map_err(|err| ClientError::Transport(format!("request to {url} failed: {err}")))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|err| ClientError::Transport(format!("reading body from {url} failed: {err}")))?
            .to_vec();
        Ok(ClientResponse {
            status,
            headers,
            body,
        })
    }

    /// Issues a GET request with no extra headers.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn get(&self, relative_path: &str) -> Result<ClientResponse, ClientError> {
        self.request(RequestMethod::Get, relative_path, &[]).await
    }

    /// Issues a GET request with custom headers.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn get_with_headers(
        &self,
        relative_path: &str,
        headers: &[(&str, &str)],
    ) -> Result<ClientResponse, ClientError> {
        self.request(RequestMethod::Get, relative_path, headers).await
    }
}

// ============================================================================
// SECTION: Response
// ============================================================================

/// Response observed by the harness client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in arrival order.
    pub headers: Vec<(String, String)>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl ClientResponse {
    /// Returns the first header value matching `name`, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the body interpreted as UTF-8, lossily.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Harness client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Base URL failed validation.
    #[error("invalid base url {base}: {reason}")]
    InvalidBase {
        /// Offending base URL.
        base: String,
        /// Validation failure description.
        reason: String,
    },
    /// Request construction failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Connection or protocol failure.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
