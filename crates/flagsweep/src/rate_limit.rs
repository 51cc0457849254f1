//! Proactive request pacing.
//!
//! The flag service enforces a per-token rate limit; waiting for a permit
//! before every request keeps a sweep from tripping 429s in the first
//! place. The retry executor still handles the 429s that get through.

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

/// Conservative default request rate against the flag API.
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 5;

type GovernorRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// A standalone API rate limiter using the governor crate.
///
/// # Example
///
/// ```ignore
/// use flagsweep::rate_limit::ApiRateLimiter;
///
/// let limiter = ApiRateLimiter::new(5); // 5 requests per second
///
/// // Before each API call:
/// limiter.wait().await;
/// ```
#[derive(Clone)]
pub struct ApiRateLimiter {
    inner: Arc<GovernorRateLimiter>,
}

impl ApiRateLimiter {
    /// Create a new rate limiter with the specified requests per second.
    ///
    /// A zero rate is clamped to 1.
    #[must_use]
    pub fn new(requests_per_second: u32) -> Self {
        let rps = NonZeroU32::new(requests_per_second)
            .unwrap_or_else(|| NonZeroU32::new(1).expect("1 is non-zero"));
        let rate_limiter = RateLimiter::direct(Quota::per_second(rps));

        Self {
            inner: Arc::new(rate_limiter),
        }
    }

    /// Wait until the rate limiter allows another request.
    pub async fn wait(&self) {
        self.inner.until_ready().await;
    }
}
