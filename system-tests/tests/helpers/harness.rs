// system-tests/tests/helpers/harness.rs
// ============================================================================
// Module: Harness Spawning Helpers
// Description: Helpers for building and starting harness servers in tests.
// Purpose: Provide deterministic server startup and scoped teardown.
// Dependencies: cohost-config, cohost-core, cohost-server, cohost-client
// ============================================================================

//! ## Overview
//! Spawning helpers for system tests: build a loopback configuration from
//! the environment-backed test config, register mounts, and start the
//! harness. The returned handle owns the server, so a test that bails early
//! still tears down through the server's scoped release.

use std::time::Duration;

use cohost_client::HarnessClient;
use cohost_config::HarnessConfig;
use cohost_core::AppMount;
use cohost_core::MountPrefix;
use cohost_server::HarnessServer;
use cohost_server::ServerError;
use system_tests::config::SystemTestConfig;

/// A started harness and the context needed to talk to it.
pub struct SpawnedHarness {
    /// The running server; dropping it releases the listener and mounts.
    pub server: HarnessServer,
    /// Request timeout for clients built against this harness.
    pub timeout: Duration,
}

impl SpawnedHarness {
    /// Builds a client bound to the given mount prefix.
    pub fn client(&self, prefix: &MountPrefix) -> Result<HarnessClient, String> {
        let base = self
            .server
            .mount_url(prefix)
            .ok_or_else(|| "harness has no bound address".to_string())?;
        HarnessClient::new(base, self.timeout).map_err(|err| err.to_string())
    }

    /// Builds a client bound to the listener root, outside any mount.
    pub fn root_client(&self) -> Result<HarnessClient, String> {
        let addr =
            self.server.local_addr().ok_or_else(|| "harness has no bound address".to_string())?;
        HarnessClient::new(format!("http://{addr}"), self.timeout).map_err(|err| err.to_string())
    }
}

/// Builds a loopback harness config from the system-test environment.
pub fn loopback_config(env: &SystemTestConfig) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.listen.port = env.effective_port();
    config
}

/// Registers the given mounts and starts a harness server.
pub async fn spawn_harness(
    env: &SystemTestConfig,
    mounts: Vec<AppMount>,
) -> Result<SpawnedHarness, ServerError> {
    let mut server = HarnessServer::new(loopback_config(env));
    for mount in mounts {
        server.register(mount)?;
    }
    server.start().await?;
    Ok(SpawnedHarness {
        server,
        timeout: env.effective_timeout(),
    })
}
