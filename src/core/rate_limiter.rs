use std::time::Duration;
use tokio::time::sleep;
use rand::Rng;

/// Spaces out consecutive provider requests with jitter.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    base_ms: u64,
}

impl RateLimiter {
    /// `base_ms == 0` disables waiting entirely.
    pub fn new(base_ms: u64) -> Self {
        Self { base_ms }
    }

    /// Delay in `[base, 2 * base)`.
    pub fn next_delay(&self) -> Duration {
        if self.base_ms == 0 {
            return Duration::ZERO;
        }
        let delay = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.base_ms..self.base_ms * 2)
        };
        Duration::from_millis(delay)
    }

    pub async fn wait(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}
