// crates/resilience/tests/resilience_tests.rs
//! Integration tests for request spacing and timeouts

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use vinylcast_resilience::{RateLimiter, ResilienceError, Timeout};

#[tokio::test(start_paused = true)]
async fn test_concurrent_callers_are_serialized() {
    let limiter = RateLimiter::new(Duration::from_millis(5000));
    let dispatches = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for _ in 0..3 {
        let limiter = limiter.clone();
        let dispatches = Arc::clone(&dispatches);
        handles.push(tokio::spawn(async move {
            let at = limiter.acquire().await;
            dispatches.lock().await.push(at);
        }));
    }
    for handle in handles {
        handle.await.expect("task panicked");
    }

    let mut times = dispatches.lock().await.clone();
    times.sort();
    assert_eq!(times.len(), 3);
    for pair in times.windows(2) {
        assert!(pair[1].duration_since(pair[0]) >= Duration::from_millis(5000));
    }
}

#[tokio::test(start_paused = true)]
async fn test_delayed_request_is_not_dropped() {
    let limiter = RateLimiter::new(Duration::from_secs(5));
    let start = Instant::now();

    limiter.acquire().await;
    let second = limiter.acquire().await;

    // The second caller was delayed, not rejected
    assert!(second.duration_since(start) >= Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_spacing_wait_can_exceed_timeout() {
    let limiter = RateLimiter::new(Duration::from_secs(5));
    let timeout = Timeout::new(Duration::from_secs(1));

    limiter.acquire().await;
    let result = timeout.execute(limiter.acquire()).await;
    assert!(matches!(result, Err(ResilienceError::Timeout(_))));
}
