// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// E2E — RESILIENT RPC CLIENT
//
// Drives RpcClient against a hand-rolled in-process JSON-RPC server (no
// mock-HTTP crate in the teacher's stack, so a bare tokio TcpListener
// speaking a minimal HTTP/1.1 response stands in for a real host node)
// to exercise the circuit breaker and batch path end-to-end.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use synapse_rpc::{RpcClient, RpcConfig, RpcError};

/// Starts a server on an ephemeral port that always answers every request
/// (single or batch) with a successful `eth_blockNumber`-style result,
/// unless `fail_first_n` requests have not yet been served, in which case
/// it closes the connection immediately to simulate a transport failure.
async fn spawn_mock_rpc(fail_first_n: usize) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let served = Arc::new(AtomicUsize::new(0));
    let served_clone = served.clone();

    tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(pair) => pair,
                Err(_) => break,
            };
            let served = served_clone.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let _ = socket.read(&mut buf).await;

                let count = served.fetch_add(1, Ordering::SeqCst);
                if count < fail_first_n {
                    // Drop the connection without responding.
                    return;
                }

                let body = br#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.write_all(body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{addr}"), served)
}

#[tokio::test]
async fn transient_failure_is_recovered_by_retry() {
    let (url, served) = spawn_mock_rpc(2).await;
    let mut cfg = RpcConfig::default();
    cfg.url = url;
    cfg.max_retries = 3;
    cfg.initial_delay_ms = 10;
    cfg.max_delay_ms = 50;
    cfg.failure_threshold = 10; // don't let the breaker open mid-retry

    let client = RpcClient::new(cfg);
    let result = client.call("eth_blockNumber", serde_json::json!([])).await;

    assert!(result.is_ok(), "expected eventual success after retries, got {result:?}");
    assert!(served.load(Ordering::SeqCst) >= 3);
}

#[tokio::test]
async fn circuit_opens_after_threshold_and_recovers() {
    // No server at all — every call is a connection failure.
    let mut cfg = RpcConfig::default();
    cfg.url = "http://127.0.0.1:1".to_string();
    cfg.max_retries = 0;
    cfg.failure_threshold = 2;
    cfg.recovery_timeout_ms = 0; // recovers on the very next check

    let client = RpcClient::new(cfg);

    assert!(client.call("eth_blockNumber", serde_json::json!([])).await.is_err());
    assert!(client.call("eth_blockNumber", serde_json::json!([])).await.is_err());

    let third = client.call("eth_blockNumber", serde_json::json!([])).await;
    assert!(matches!(third, Err(RpcError::CircuitOpen { .. })));

    // recovery_timeout_ms == 0 so the breaker is immediately eligible to
    // probe again; metrics should reflect the HalfOpen/Open cycling.
    let metrics = client.metrics();
    assert!(metrics.failed_calls >= 2);
}

#[tokio::test]
async fn batch_call_preserves_order_and_succeeds_once_server_is_healthy() {
    let (url, _served) = spawn_mock_rpc(0).await;
    let mut cfg = RpcConfig::default();
    cfg.url = url;

    let client = RpcClient::new(cfg);
    let calls = vec![
        ("eth_blockNumber", serde_json::json!([])),
        ("eth_blockNumber", serde_json::json!([])),
    ];
    let results = client.batch_call(&calls).await.unwrap();
    assert_eq!(results.len(), 2);
}

#[test]
fn default_config_matches_documented_values() {
    let cfg = RpcConfig::default();
    assert_eq!(cfg.max_connections, 100);
    assert_eq!(cfg.backoff_base, 2);
    assert_eq!(cfg.half_open_max_calls, 3);
}
