//! Throttled bulk synchronization of expiry properties.
//!
//! # Module Structure
//!
//! - [`types`] - `SweepOptions`, per-flag outcomes, `RunResult`, constants
//! - [`progress`] - `SweepProgress`, `ProgressCallback`, `emit()`
//! - [`filter`] - pure partition of fetched flags
//! - [`engine`] - batched processor and `run_sweep()` orchestration
//!
//! # Example
//!
//! ```ignore
//! use flagsweep::api::{DEFAULT_HOST, FlagsClient};
//! use flagsweep::retry::RetryConfig;
//! use flagsweep::sweep::{SweepOptions, run_sweep};
//!
//! let client = FlagsClient::new(DEFAULT_HOST, token, RetryConfig::default(), None)?;
//! let result = run_sweep(&client, "web-app", &SweepOptions::default(), None).await?;
//! println!("updated {} of {}", result.updated.len(), result.total_found);
//! ```

pub mod engine;
pub mod filter;
mod progress;
mod types;

pub use engine::{SweepError, process_flags, run_sweep};
pub use filter::{Partitioned, REASON_INVALID_CREATION_DATE, partition};
pub use progress::{ProgressCallback, SweepProgress, emit};
pub use types::{
    DEFAULT_BATCH_DELAY_MS, DEFAULT_BATCH_SIZE, DEFAULT_DAYS_OFFSET, DEFAULT_PROPERTY_NAME,
    FailedFlag, MAX_DAYS_OFFSET, MIN_DAYS_OFFSET, RunResult, SkippedFlag, SweepOptions,
    UpdatedFlag,
};
