// system-tests/tests/helpers/readiness.rs
// ============================================================================
// Module: Readiness Helpers
// Description: Readiness probes for harness servers.
// Purpose: Ensure servers are ready without arbitrary sleeps.
// Dependencies: cohost-client, tokio
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use cohost_client::HarnessClient;
use tokio::time::sleep;

/// Polls a mount until it answers or the timeout expires.
///
/// Any HTTP response counts as ready; only transport failures are retried.
pub async fn wait_for_harness_ready(
    client: &HarnessClient,
    timeout: Duration,
) -> Result<(), String> {
    let start = Instant::now();
    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        match client.get("/").await {
            Ok(_) => return Ok(()),
            Err(err) => {
                if start.elapsed() > timeout {
                    return Err(format!(
                        "harness readiness timeout after {attempts} attempts: {err}"
                    ));
                }
                sleep(Duration::from_millis(50)).await;
            }
        }
    }
}
