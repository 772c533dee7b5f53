// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PER-HOST CIRCUIT BREAKER
//
// Closed -> Open -> HalfOpen -> Closed. Mutex-guarded integer counters,
// same poison-recovery discipline as los-node's RateLimiter.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::error::RpcError;
use crate::types::CircuitState;

fn safe_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

struct BreakerState {
    state: CircuitState,
    failure_count: u32,
    opened_at: Option<Instant>,
    half_open_successes: u32,
}

pub struct CircuitBreaker {
    host: String,
    failure_threshold: u32,
    recovery_timeout: Duration,
    half_open_max_calls: u32,
    inner: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(
        host: impl Into<String>,
        failure_threshold: u32,
        recovery_timeout_ms: u64,
        half_open_max_calls: u32,
    ) -> Self {
        CircuitBreaker {
            host: host.into(),
            failure_threshold,
            recovery_timeout: Duration::from_millis(recovery_timeout_ms),
            half_open_max_calls,
            inner: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                failure_count: 0,
                opened_at: None,
                half_open_successes: 0,
            }),
        }
    }

    /// Call before issuing a request; returns `CircuitOpen` if the breaker
    /// has not yet transitioned out of Open.
    pub fn check(&self) -> Result<(), RpcError> {
        let mut guard = safe_lock(&self.inner);
        if guard.state == CircuitState::Open {
            let opened_at = guard.opened_at.unwrap_or_else(Instant::now);
            if opened_at.elapsed() >= self.recovery_timeout {
                guard.state = CircuitState::HalfOpen;
                guard.half_open_successes = 0;
            } else {
                return Err(RpcError::CircuitOpen { host: self.host.clone() });
            }
        }
        Ok(())
    }

    pub fn record_success(&self) {
        let mut guard = safe_lock(&self.inner);
        match guard.state {
            CircuitState::Closed => {
                guard.failure_count = guard.failure_count.saturating_sub(1);
            }
            CircuitState::HalfOpen => {
                guard.half_open_successes += 1;
                if guard.half_open_successes >= self.half_open_max_calls {
                    guard.state = CircuitState::Closed;
                    guard.failure_count = 0;
                    guard.opened_at = None;
                    guard.half_open_successes = 0;
                }
            }
            CircuitState::Open => {}
        }
    }

    pub fn record_failure(&self) {
        let mut guard = safe_lock(&self.inner);
        match guard.state {
            CircuitState::Closed => {
                guard.failure_count += 1;
                if guard.failure_count >= self.failure_threshold {
                    guard.state = CircuitState::Open;
                    guard.opened_at = Some(Instant::now());
                }
            }
            CircuitState::HalfOpen => {
                guard.state = CircuitState::Open;
                guard.opened_at = Some(Instant::now());
                guard.half_open_successes = 0;
            }
            CircuitState::Open => {}
        }
    }

    pub fn state(&self) -> CircuitState {
        safe_lock(&self.inner).state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_after_threshold_consecutive_failures() {
        let breaker = CircuitBreaker::new("host", 3, 60_000, 2);
        assert!(breaker.check().is_ok());
        breaker.record_failure();
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Closed);
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
        assert!(breaker.check().is_err());
    }

    #[test]
    fn half_open_failure_returns_to_open() {
        let breaker = CircuitBreaker::new("host", 1, 0, 2);
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
        breaker.check().unwrap(); // recovery_timeout is 0, transitions to HalfOpen
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[test]
    fn half_open_closes_after_enough_successes() {
        let breaker = CircuitBreaker::new("host", 1, 0, 2);
        breaker.record_failure();
        breaker.check().unwrap();
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[test]
    fn success_decrements_failure_count_with_a_floor_of_zero() {
        let breaker = CircuitBreaker::new("host", 5, 60_000, 2);
        breaker.record_failure();
        breaker.record_success();
        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }
}
