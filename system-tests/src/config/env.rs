// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 fails closed. The transport profile is the
//! explicit precondition that replaces ambient "which container factory is
//! set" checks: tests guard on it and skip rather than fail when a profile
//! other than the in-process one is requested.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional listen port override (`0` requests an ephemeral port).
    Port,
    /// Optional timeout override in seconds (positive integer).
    TimeoutSeconds,
    /// Optional transport profile selector (`in_process` is the only
    /// implemented profile).
    TransportProfile,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Port => "COHOST_SYSTEM_TEST_PORT",
            Self::TimeoutSeconds => "COHOST_SYSTEM_TEST_TIMEOUT_SEC",
            Self::TransportProfile => "COHOST_SYSTEM_TEST_TRANSPORT",
        }
    }
}

// ============================================================================
// SECTION: Transport Profile
// ============================================================================

/// Transport profiles a system-test run may request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportProfile {
    /// Harness server and clients in one process (the only implemented
    /// profile).
    #[default]
    InProcess,
    /// An unimplemented profile; tests guard on this and skip.
    Unsupported,
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// Optional listen port override.
    pub port: Option<u16>,
    /// Optional timeout override.
    pub timeout: Option<Duration>,
    /// Requested transport profile.
    pub transport: TransportProfile,
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is
    /// empty, or fails validation.
    pub fn load() -> Result<Self, String> {
        let port = read_env_nonempty(SystemTestEnv::Port.as_str())?
            .map(|value| parse_port(SystemTestEnv::Port.as_str(), &value))
            .transpose()?;
        let timeout = read_env_nonempty(SystemTestEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(SystemTestEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        let transport = parse_transport_profile(
            read_env_nonempty(SystemTestEnv::TransportProfile.as_str())?,
        );
        Ok(Self {
            port,
            timeout,
            transport,
        })
    }

    /// Returns the effective listen port, ephemeral unless overridden.
    #[must_use]
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(0)
    }

    /// Returns the effective request timeout.
    #[must_use]
    pub fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or(Duration::from_secs(5))
    }

    /// Returns true when the in-process transport profile is selected.
    ///
    /// Tests use this as an explicit precondition guard: a run requesting an
    /// unimplemented profile skips instead of failing.
    #[must_use]
    pub fn in_process_selected(&self) -> bool {
        self.transport == TransportProfile::InProcess
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a listen port from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is not a valid port number.
pub(crate) fn parse_port(name: &str, raw: &str) -> Result<u16, String> {
    raw.trim().parse().map_err(|_| format!("{name} must be a port number"))
}

/// Parses a positive timeout value from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is missing, non-numeric, or zero.
pub(crate) fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

/// Parses the transport profile selector; unknown values are unsupported.
pub(crate) fn parse_transport_profile(raw: Option<String>) -> TransportProfile {
    match raw.as_deref().map(str::trim) {
        None => TransportProfile::InProcess,
        Some(value) if value.eq_ignore_ascii_case("in_process") => TransportProfile::InProcess,
        Some(_) => TransportProfile::Unsupported,
    }
}
