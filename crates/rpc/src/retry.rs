// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RETRY WITH EXPONENTIAL BACKOFF + JITTER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub backoff_base: u32,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// `delay = min(initial_delay * base^attempt, max_delay)` with +-20% jitter.
    /// `attempt` is zero-based (the first retry after the original call).
    pub fn delay_for_attempt(&self, attempt: u32) -> std::time::Duration {
        let exp = self.backoff_base.saturating_pow(attempt) as u64;
        let base_delay = self.initial_delay_ms.saturating_mul(exp).min(self.max_delay_ms);

        let mut rng = rand::thread_rng();
        let jitter_pct: f64 = rng.gen_range(-0.2..=0.2);
        let jittered = (base_delay as f64) * (1.0 + jitter_pct);
        std::time::Duration::from_millis(jittered.max(0.0) as u64)
    }
}
