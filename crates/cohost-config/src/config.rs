// crates/cohost-config/src/config.rs
// ============================================================================
// Module: Cohost Configuration
// Description: Configuration loading and validation for the Cohost harness.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits. Missing
//! or invalid configuration fails closed; defaults produce a loopback HTTP
//! listener on the conventional harness port.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "cohost.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "COHOST_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Default listen host.
pub(crate) const DEFAULT_LISTEN_HOST: &str = "127.0.0.1";
/// Default listen port for harness servers.
pub(crate) const DEFAULT_LISTEN_PORT: u16 = 9998;
/// Default maximum request body size in bytes.
pub(crate) const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Maximum allowed request body size in bytes.
pub(crate) const MAX_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;
/// Maximum listen host length in bytes.
pub(crate) const MAX_HOST_LENGTH: usize = 255;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Transport scheme for the harness listener.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Plain HTTP.
    #[default]
    Http,
}

impl Scheme {
    /// Returns the URL scheme token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
        }
    }
}

/// Listener configuration for the harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ListenConfig {
    /// Host or address the listener binds to.
    pub host: String,
    /// Listen port; `0` requests an ephemeral port from the OS.
    pub port: u16,
    /// Transport scheme.
    pub scheme: Scheme,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_LISTEN_HOST.to_string(),
            port: DEFAULT_LISTEN_PORT,
            scheme: Scheme::Http,
        }
    }
}

/// Request handling limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LimitsConfig {
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Cohost harness configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct HarnessConfig {
    /// Listener configuration.
    pub listen: ListenConfig,
    /// Request handling limits.
    pub limits: LimitsConfig,
}

impl HarnessConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a field is out of bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let host = self.listen.host.trim();
        if host.is_empty() {
            return Err(ConfigError::Invalid("listen.host must not be empty".to_string()));
        }
        if host.len() > MAX_HOST_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "listen.host exceeds {MAX_HOST_LENGTH} bytes"
            )));
        }
        if host.chars().any(|ch| ch.is_ascii_whitespace() || ch == '/') {
            return Err(ConfigError::Invalid(
                "listen.host must not contain whitespace or '/'".to_string(),
            ));
        }
        if self.limits.max_body_bytes == 0 {
            return Err(ConfigError::Invalid("limits.max_body_bytes must be positive".to_string()));
        }
        if self.limits.max_body_bytes > MAX_MAX_BODY_BYTES {
            return Err(ConfigError::Invalid(format!(
                "limits.max_body_bytes exceeds {MAX_MAX_BODY_BYTES}"
            )));
        }
        Ok(())
    }

    /// Returns the `host:port` bind address for the listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen.host, self.listen.port)
    }

    /// Returns the base URL for a mount prefix, without a trailing slash.
    #[must_use]
    pub fn base_url(&self, prefix: &str) -> String {
        format!("{}://{}:{}{prefix}", self.listen.scheme.as_str(), self.listen.host, self.listen.port)
    }

    /// Loads configuration from the default path or the env override.
    ///
    /// The path is taken from [`CONFIG_ENV_VAR`] when set, otherwise
    /// `cohost.toml` in the current directory. A missing default file yields
    /// the default configuration; a missing overridden file is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load() -> Result<Self, ConfigError> {
        match env::var_os(CONFIG_ENV_VAR) {
            Some(raw) => {
                let path = PathBuf::from(raw);
                Self::load_from_path(&path)
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_NAME);
                if path.exists() {
                    Self::load_from_path(&path)
                } else {
                    let config = Self::default();
                    config.validate()?;
                    Ok(config)
                }
            }
        }
    }

    /// Loads and validates configuration from an explicit TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, oversized,
    /// unparsable, or fails validation.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let metadata = fs::metadata(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE as u64 {
            return Err(ConfigError::Invalid(format!(
                "config file {} exceeds {MAX_CONFIG_FILE_SIZE} bytes",
                path.display()
            )));
        }
        let contents = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let config: Self = toml::from_str(&contents).map_err(|err| ConfigError::Parse {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("config io error for {path}: {reason}")]
    Io {
        /// Path that failed to load.
        path: String,
        /// Underlying failure description.
        reason: String,
    },
    /// Parsing the config file failed.
    #[error("config parse error for {path}: {reason}")]
    Parse {
        /// Path that failed to parse.
        path: String,
        /// Underlying failure description.
        reason: String,
    },
    /// A config value failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
