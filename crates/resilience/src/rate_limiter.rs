// crates/resilience/src/rate_limiter.rs
//! Minimum-interval request spacing
//!
//! Callers that arrive too early are delayed, never rejected. The last
//! dispatch time is held behind an async mutex that stays locked while a
//! caller waits out the interval, so concurrent callers are served one at a
//! time in arrival order.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum spacing between successive dispatches
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    last_dispatch: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// Creates a limiter allowing one dispatch per `min_interval`
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_dispatch: Arc::new(Mutex::new(None)),
        }
    }

    /// Waits for the next free slot and claims it
    ///
    /// Returns the instant the caller was allowed to dispatch.
    pub async fn acquire(&self) -> Instant {
        let mut last = self.last_dispatch.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                log::debug!("Rate limiting: waiting {:?} before next request", wait);
                tokio::time::sleep(wait).await;
            }
        }

        let now = Instant::now();
        *last = Some(now);
        now
    }

    /// Gets the configured spacing
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_acquire_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(5));
        let start = Instant::now();
        let dispatched = limiter.acquire().await;
        assert_eq!(dispatched, start);
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_acquires_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_millis(5000));

        let first = limiter.acquire().await;
        let second = limiter.acquire().await;

        assert!(second.duration_since(first) >= Duration::from_millis(5000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_interval_elapsed() {
        let limiter = RateLimiter::new(Duration::from_secs(5));
        limiter.acquire().await;

        tokio::time::sleep(Duration::from_secs(6)).await;

        let before = Instant::now();
        let dispatched = limiter.acquire().await;
        assert_eq!(dispatched, before);
    }

    #[test]
    fn test_rate_limiter_config() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        assert_eq!(limiter.min_interval(), Duration::from_secs(60));
    }
}
