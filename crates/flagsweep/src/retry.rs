//! Retrying request executor.
//!
//! All traffic to the flag service goes through [`execute_with_retry`],
//! which enforces the service's backoff contract:
//!
//! - 429 responses back off exponentially (`base * 2^(attempt-1)`) and keep
//!   retrying until attempts run out.
//! - Network failures and other error statuses back off linearly
//!   (`base * attempt`).
//! - 404 is never retried: on lookups absence is an answer, and on writes
//!   the caller records it as a per-item failure.
//!
//! Exactly one request is in flight per logical call.

use std::time::Duration;

use crate::api::error::{ApiError, classify_status};
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::rate_limit::ApiRateLimiter;

/// Default number of attempts per logical request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base backoff delay in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 1_000;

/// Configuration for retry operations.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Base delay the backoff curves are scaled from.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with custom values.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }
}

/// Issue `request` through `transport` with bounded retry.
///
/// When a rate limiter is provided, a permit is awaited before every
/// attempt, including retries.
pub async fn execute_with_retry(
    transport: &dyn HttpTransport,
    rate_limiter: Option<&ApiRateLimiter>,
    request: &HttpRequest,
    config: &RetryConfig,
) -> Result<HttpResponse, ApiError> {
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        if let Some(limiter) = rate_limiter {
            limiter.wait().await;
        }

        let err = match transport.send(request.clone()).await {
            Ok(resp) if resp.is_success() => return Ok(resp),
            Ok(resp) if resp.status == 429 => {
                if attempt < max_attempts {
                    let delay = config
                        .base_delay
                        .saturating_mul(2u32.saturating_pow(attempt - 1));
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        url = %request.url,
                        "rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                classify_status(429)
            }
            Ok(resp) => classify_status(resp.status),
            Err(e) => ApiError::Network(e.to_string()),
        };

        if attempt < max_attempts && !err.is_not_found() {
            let delay = config.base_delay * attempt;
            tracing::debug!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                url = %request.url,
                error = %err,
                "request failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
            continue;
        }

        return Err(err);
    }
}
