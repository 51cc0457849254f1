//! Progress events emitted during a sweep.
//!
//! The library reports progress through a callback so the CLI can render
//! either progress bars or structured logs without the core knowing which.

/// Progress events emitted during a sweep run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SweepProgress {
    /// Starting to enumerate the project's flags.
    FetchingFlags {
        /// Project being swept.
        project: String,
    },

    /// Fetched a page of flags.
    FetchedPage {
        /// Page number (1-indexed).
        page: u32,
        /// Flags on this page.
        count: usize,
        /// Running total fetched so far.
        total_so_far: usize,
        /// Service-reported total, when present.
        total_count: Option<u64>,
    },

    /// Finished enumerating.
    FetchComplete {
        /// Total flags fetched.
        total: usize,
    },

    /// Partitioning the collection by expiry-property state.
    Partitioning {
        /// Property being checked.
        property_name: String,
    },

    /// Partition complete.
    PartitionComplete {
        /// Flags routed to processing.
        to_process: usize,
        /// Flags skipped, with reasons recorded.
        skipped: usize,
        /// Total flags considered.
        total: usize,
    },

    /// Starting to patch flags.
    ProcessingFlags {
        /// Flags to patch.
        count: usize,
        /// Concurrent writes per batch.
        batch_size: usize,
        /// Whether this is a dry run.
        dry_run: bool,
    },

    /// A flag was stamped (or would be, in a dry run).
    FlagUpdated {
        key: String,
        expiry_date: String,
        dry_run: bool,
    },

    /// A flag's write call failed.
    FlagFailed { key: String, error: String },

    /// Processing phase complete.
    ProcessingComplete { updated: usize, failed: usize },

    /// Non-fatal warning.
    Warning { message: String },
}

/// Callback for progress updates during a sweep.
pub type ProgressCallback = Box<dyn Fn(SweepProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SweepProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}
