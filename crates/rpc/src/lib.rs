// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SYNAPSE-RPC
//
// Resilient JSON-RPC client for outbound calls to the host chain: pooled
// HTTP connections, a per-host circuit breaker, retry with exponential
// backoff + jitter, request batching, and a background health check loop.
// Metrics here are observational only — they never influence consensus.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod circuit_breaker;
pub mod error;
pub mod health;
pub mod pool;
pub mod retry;
pub mod types;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde_json::Value;
use url::Host;

pub use circuit_breaker::CircuitBreaker;
pub use error::{RpcError, RpcResult};
pub use health::{spawn_health_check, HealthCheckHandle};
pub use pool::ConnectionPool;
pub use retry::RetryPolicy;
pub use synapse_core::RpcConfig;
pub use types::{CircuitState, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcMetrics};

mod url {
    // Minimal host extraction without pulling in the `url` crate: the
    // RPC config always carries an http(s) URL, so trimming the scheme
    // and cutting at the first `/` or `:` is sufficient to key per-host
    // circuit breaker/metrics state.
    pub struct Host;

    impl Host {
        pub fn from_url(url: &str) -> String {
            let without_scheme = url
                .trim_start_matches("https://")
                .trim_start_matches("http://");
            let end = without_scheme
                .find(['/', '?'])
                .unwrap_or(without_scheme.len());
            without_scheme[..end].to_string()
        }
    }
}

pub struct RpcClient {
    config: RpcConfig,
    host: String,
    pool: ConnectionPool,
    retry_policy: RetryPolicy,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(config: RpcConfig) -> Self {
        let host = Host::from_url(&config.url);
        let pool = ConnectionPool::new(
            config.max_connections,
            config.timeout_ms,
            config.failure_threshold,
            config.recovery_timeout_ms,
            config.half_open_max_calls,
        );
        let retry_policy = RetryPolicy {
            max_retries: config.max_retries,
            initial_delay_ms: config.initial_delay_ms,
            backoff_base: config.backoff_base,
            max_delay_ms: config.max_delay_ms,
        };
        RpcClient { config, host, pool, retry_policy, next_id: AtomicU64::new(1) }
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    pub fn metrics(&self) -> RpcMetrics {
        self.pool.metrics(&self.host)
    }

    fn next_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Single JSON-RPC call with retry + circuit-breaker protection.
    pub async fn call(&self, method: &str, params: Value) -> RpcResult<Value> {
        self.pool.check_circuit(&self.host)?;
        self.pool.record_call_start(&self.host);

        let mut last_err = None;
        for attempt in 0..=self.retry_policy.max_retries {
            if attempt > 0 {
                self.pool.record_retry(&self.host);
                tokio::time::sleep(self.retry_policy.delay_for_attempt(attempt - 1)).await;
            }

            let started = Instant::now();
            match self.send_once(method, params.clone()).await {
                Ok(value) => {
                    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
                    self.pool.record_success(&self.host, latency_ms);
                    return Ok(value);
                }
                Err(err) => {
                    self.pool.record_failure(&self.host);
                    let retryable = err.is_retryable();
                    last_err = Some(err);
                    if !retryable {
                        break;
                    }
                }
            }
        }

        Err(last_err.unwrap_or(RpcError::InternalError { reason: "no attempts made".to_string() }))
    }

    async fn send_once(&self, method: &str, params: Value) -> RpcResult<Value> {
        let id = self.next_request_id();
        let request = JsonRpcRequest::new(id, method, params);

        let response = self
            .pool
            .client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RpcError::Timeout { url: self.config.url.clone(), timeout_ms: self.config.timeout_ms }
                } else {
                    RpcError::ConnectionError { url: self.config.url.clone(), cause: e.to_string() }
                }
            })?;

        let body: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::Serde { reason: e.to_string() })?;

        if let Some(err) = body.error {
            return Err(RpcError::from_rpc_code(err.code, &err.message));
        }

        body.result.ok_or(RpcError::InternalError { reason: "missing result".to_string() })
    }

    /// Batches `calls` (method, params) into one JSON-RPC array request,
    /// with `2 * timeout` as its effective deadline. Results preserve the
    /// input order and each carries its own error independently.
    pub async fn batch_call(&self, calls: &[(&str, Value)]) -> RpcResult<Vec<RpcResult<Value>>> {
        self.pool.check_circuit(&self.host)?;
        self.pool.record_batch(&self.host);

        let requests: Vec<JsonRpcRequest> = calls
            .iter()
            .map(|(method, params)| JsonRpcRequest::new(self.next_request_id(), *method, params.clone()))
            .collect();

        let deadline = std::time::Duration::from_millis(self.config.timeout_ms * 2);
        let started = Instant::now();

        let send = self.pool.client.post(&self.config.url).json(&requests).send();
        let response = tokio::time::timeout(deadline, send)
            .await
            .map_err(|_| RpcError::Timeout { url: self.config.url.clone(), timeout_ms: deadline.as_millis() as u64 })?
            .map_err(|e| RpcError::ConnectionError { url: self.config.url.clone(), cause: e.to_string() })?;

        let bodies: Vec<JsonRpcResponse> = response
            .json()
            .await
            .map_err(|e| RpcError::Serde { reason: e.to_string() })?;

        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.pool.record_success(&self.host, latency_ms);

        let mut by_id: std::collections::HashMap<u64, JsonRpcResponse> =
            bodies.into_iter().map(|b| (b.id, b)).collect();

        let results = requests
            .iter()
            .map(|req| match by_id.remove(&req.id) {
                Some(body) => match body.error {
                    Some(err) => Err(RpcError::from_rpc_code(err.code, &err.message)),
                    None => body.result.ok_or(RpcError::InternalError { reason: "missing result".to_string() }),
                },
                None => Err(RpcError::InternalError { reason: format!("no response for request id {}", req.id) }),
            })
            .collect();

        Ok(results)
    }
}
