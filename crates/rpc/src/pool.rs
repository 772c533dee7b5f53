// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONNECTION POOL
//
// A thin wrapper over a shared reqwest::Client configured with
// `max_connections` as `pool_max_idle_per_host` — the teacher never
// hand-rolls socket pooling, it configures the HTTP client's pool and lets
// it own the sockets (see los-node's grpc_server.rs PERF comment). Per-host
// circuit breaker/metrics state lives in a plain Mutex<HashMap>, matching
// rate_limiter.rs's safe_lock() discipline rather than reaching for
// parking_lot, which is not a teacher dependency.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::circuit_breaker::CircuitBreaker;
use crate::types::{CircuitStateTag, RpcMetrics};

fn safe_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub struct HostState {
    pub breaker: CircuitBreaker,
    pub metrics: RpcMetrics,
}

pub struct ConnectionPool {
    pub client: reqwest::Client,
    hosts: Mutex<HashMap<String, HostState>>,
    failure_threshold: u32,
    recovery_timeout_ms: u64,
    half_open_max_calls: u32,
}

impl ConnectionPool {
    pub fn new(
        max_connections: u32,
        timeout_ms: u64,
        failure_threshold: u32,
        recovery_timeout_ms: u64,
        half_open_max_calls: u32,
    ) -> Self {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(max_connections as usize)
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        ConnectionPool {
            client,
            hosts: Mutex::new(HashMap::new()),
            failure_threshold,
            recovery_timeout_ms,
            half_open_max_calls,
        }
    }

    fn with_host<R>(&self, host: &str, f: impl FnOnce(&mut HostState) -> R) -> R {
        let mut guard = safe_lock(&self.hosts);
        let state = guard.entry(host.to_string()).or_insert_with(|| HostState {
            breaker: CircuitBreaker::new(
                host.to_string(),
                self.failure_threshold,
                self.recovery_timeout_ms,
                self.half_open_max_calls,
            ),
            metrics: RpcMetrics::default(),
        });
        f(state)
    }

    pub fn check_circuit(&self, host: &str) -> Result<(), crate::error::RpcError> {
        self.with_host(host, |state| state.breaker.check())
    }

    pub fn record_call_start(&self, host: &str) {
        self.with_host(host, |state| {
            state.metrics.total_calls += 1;
        });
    }

    pub fn record_success(&self, host: &str, latency_ms: f64) {
        self.with_host(host, |state| {
            state.breaker.record_success();
            state.metrics.successful_calls += 1;
            record_latency(&mut state.metrics, latency_ms);
            state.metrics.circuit_state = state.breaker.state().into();
        });
    }

    pub fn record_failure(&self, host: &str) {
        self.with_host(host, |state| {
            state.breaker.record_failure();
            state.metrics.failed_calls += 1;
            state.metrics.last_error_unix_ms = Some(now_unix_ms());
            state.metrics.circuit_state = state.breaker.state().into();
        });
    }

    pub fn record_retry(&self, host: &str) {
        self.with_host(host, |state| {
            state.metrics.retried_calls += 1;
        });
    }

    pub fn record_batch(&self, host: &str) {
        self.with_host(host, |state| {
            state.metrics.batched_calls += 1;
        });
    }

    pub fn metrics(&self, host: &str) -> RpcMetrics {
        self.with_host(host, |state| state.metrics)
    }

    pub fn circuit_state(&self, host: &str) -> CircuitStateTag {
        self.with_host(host, |state| state.breaker.state().into())
    }
}

/// EWMA with a fixed smoothing factor, matching the integer/fixed-weight
/// style the rest of the workspace uses for running statistics.
const EWMA_ALPHA: f64 = 0.2;

fn record_latency(metrics: &mut RpcMetrics, latency_ms: f64) {
    if metrics.ewma_latency_ms == 0.0 {
        metrics.ewma_latency_ms = latency_ms;
    } else {
        metrics.ewma_latency_ms =
            EWMA_ALPHA * latency_ms + (1.0 - EWMA_ALPHA) * metrics.ewma_latency_ms;
    }
}

fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_host_state_is_created_lazily_and_reused() {
        let pool = ConnectionPool::new(10, 30_000, 5, 60_000, 3);
        pool.record_call_start("host-a");
        pool.record_success("host-a", 10.0);
        let m = pool.metrics("host-a");
        assert_eq!(m.total_calls, 1);
        assert_eq!(m.successful_calls, 1);
    }

    #[test]
    fn ewma_latency_converges_toward_recent_samples() {
        let pool = ConnectionPool::new(10, 30_000, 5, 60_000, 3);
        for _ in 0..50 {
            pool.record_success("host-a", 100.0);
        }
        let m = pool.metrics("host-a");
        assert!((m.ewma_latency_ms - 100.0).abs() < 1.0);
    }
}
