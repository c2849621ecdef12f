// crates/resilience/src/lib.rs
//! Resilience patterns for outgoing requests
//!
//! - Minimum-interval request spacing (delay, never drop)
//! - Timeout handling
//!
//! # Example
//!
//! ```rust
//! use vinylcast_resilience::{RateLimiter, Timeout};
//! use std::time::Duration;
//!
//! // At most one request every five seconds
//! let limiter = RateLimiter::new(Duration::from_secs(5));
//!
//! // Give each request thirty seconds
//! let timeout = Timeout::new(Duration::from_secs(30));
//! # let _ = (limiter, timeout);
//! ```

mod error;
mod rate_limiter;
mod timeout;

pub use error::{ResilienceError, ResilienceResult};
pub use rate_limiter::RateLimiter;
pub use timeout::{with_timeout, Timeout};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_exports_accessible() {
        let _: RateLimiter = RateLimiter::new(std::time::Duration::from_secs(5));
        let _: Timeout = Timeout::new(std::time::Duration::from_secs(5));
    }
}
