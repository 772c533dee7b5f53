// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BACKGROUND HEALTH CHECK LOOP
//
// Periodically pings `eth_blockNumber`; failures feed the same circuit
// breaker real calls do, so an unhealthy host opens its breaker even
// without caller traffic.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::RpcClient;

/// Handle to a running health check loop. Dropping this without calling
/// [`HealthCheckHandle::shutdown`] leaves the task running — call
/// `shutdown` to stop it deterministically.
pub struct HealthCheckHandle {
    join: tokio::task::JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl HealthCheckHandle {
    /// Signals the loop to stop and waits for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = self.join.await;
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Spawns a worker that calls `eth_blockNumber` against `client` every
/// `interval_ms`, until [`HealthCheckHandle::shutdown`] is called on the
/// returned handle. Never an orphan task: the shutdown channel is the only
/// way the loop exits.
pub fn spawn_health_check(client: Arc<RpcClient>, interval_ms: u64) -> HealthCheckHandle {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

    let join = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match client.call("eth_blockNumber", serde_json::json!([])).await {
                        Ok(_) => log::debug!("health check ok: {}", client.url()),
                        Err(e) => log::warn!("health check failed for {}: {e}", client.url()),
                    }
                }
                _ = &mut shutdown_rx => {
                    log::debug!("health check stopped: {}", client.url());
                    break;
                }
            }
        }
    });

    HealthCheckHandle { join, shutdown_tx: Some(shutdown_tx) }
}
