//! flagsweep - stamp expiry dates onto feature flags in bulk.
//!
//! This library enumerates every flag in a flag-service project, decides
//! which ones lack an expiry-date custom property, and writes the property
//! back through the service's JSON-patch endpoint while respecting its
//! pagination and rate-limit contracts.
//!
//! # Example
//!
//! ```ignore
//! use flagsweep::api::{DEFAULT_HOST, FlagsClient};
//! use flagsweep::rate_limit::ApiRateLimiter;
//! use flagsweep::retry::RetryConfig;
//! use flagsweep::sweep::{SweepOptions, run_sweep};
//!
//! let limiter = ApiRateLimiter::new(5);
//! let client = FlagsClient::new(DEFAULT_HOST, "api-token", RetryConfig::default(), Some(limiter))?;
//!
//! let result = run_sweep(&client, "web-app", &SweepOptions::default(), None).await?;
//! if !result.is_success() {
//!     eprintln!("{} flags failed", result.failed.len());
//! }
//! ```

pub mod api;
pub mod dates;
pub mod http;
pub mod rate_limit;
pub mod retry;
pub mod sweep;

pub use api::{ApiError, EnumerationError, FlagRecord, FlagsClient, PropertyValue};
pub use rate_limit::ApiRateLimiter;
pub use retry::RetryConfig;
pub use sweep::{RunResult, SweepError, SweepOptions, run_sweep};
