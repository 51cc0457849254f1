//! Progress reporting for sweep runs.
//!
//! Two modes:
//! - Interactive mode (TTY): animated progress bars using indicatif
//! - Logging mode (non-TTY): structured logging using tracing

use std::sync::{Arc, Mutex};

use console::Term;
use flagsweep::sweep::{ProgressCallback, SweepProgress};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress reporter that handles both interactive and logging modes.
pub enum ProgressReporter {
    /// Interactive progress bars for TTY.
    Interactive(InteractiveReporter),
    /// Structured logging for non-TTY (CI, pipes).
    Logging(LoggingReporter),
}

impl ProgressReporter {
    /// Create a new progress reporter, auto-detecting TTY mode.
    pub fn new() -> Self {
        if Term::stdout().is_term() {
            Self::Interactive(InteractiveReporter::new())
        } else {
            Self::Logging(LoggingReporter::new())
        }
    }

    /// Create a logging reporter (for testing or forcing non-TTY mode).
    #[allow(dead_code)]
    pub fn logging() -> Self {
        Self::Logging(LoggingReporter::new())
    }

    /// Handle a progress event.
    pub fn handle(&self, event: SweepProgress) {
        match self {
            Self::Interactive(r) => r.handle(event),
            Self::Logging(r) => r.handle(event),
        }
    }

    /// Convert to a ProgressCallback for the library.
    pub fn as_callback(self: &Arc<Self>) -> ProgressCallback {
        let reporter = Arc::clone(self);
        Box::new(move |event| {
            reporter.handle(event);
        })
    }

    /// Finish any outstanding progress bars (interactive mode only).
    pub fn finish(&self) {
        if let Self::Interactive(r) = self {
            r.finish();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable bar state, under a single lock.
#[derive(Default)]
struct ProgressState {
    fetch_bar: Option<ProgressBar>,
    process_bar: Option<ProgressBar>,
}

/// Interactive progress reporter using indicatif.
pub struct InteractiveReporter {
    multi: MultiProgress,
    state: Mutex<ProgressState>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            state: Mutex::new(ProgressState::default()),
        }
    }

    /// Handle a progress event.
    pub fn handle(&self, event: SweepProgress) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };

        match event {
            SweepProgress::FetchingFlags { project } => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.set_prefix(format!("{:10}", "Fetching"));
                pb.set_message(format!("flags in {project}..."));
                pb.enable_steady_tick(std::time::Duration::from_millis(100));
                state.fetch_bar = Some(pb);
            }

            SweepProgress::FetchedPage {
                page,
                total_so_far,
                total_count,
                ..
            } => {
                if let Some(ref pb) = state.fetch_bar {
                    let msg = match total_count {
                        Some(total) => format!("page {page} ({total_so_far}/{total} flags)"),
                        None => format!("page {page} ({total_so_far} flags)"),
                    };
                    pb.set_message(msg);
                }
            }

            SweepProgress::FetchComplete { total } => {
                if let Some(ref pb) = state.fetch_bar {
                    pb.finish_with_message(format!("✓ {total} flags fetched"));
                }
            }

            SweepProgress::Partitioning { .. } => {}

            SweepProgress::PartitionComplete {
                to_process,
                skipped,
                total,
            } => {
                self.multi
                    .println(format!(
                        "  {to_process} of {total} flags need an expiry date ({skipped} skipped)"
                    ))
                    .ok();
            }

            SweepProgress::ProcessingFlags {
                count,
                batch_size,
                dry_run,
            } => {
                let pb = self.multi.add(ProgressBar::new(count as u64));
                pb.set_style(Self::bar_style());
                let action = if dry_run { "Checking" } else { "Stamping" };
                pb.set_prefix(format!("{action:10}"));
                pb.set_message(format!("{batch_size} at a time"));
                state.process_bar = Some(pb);
            }

            SweepProgress::FlagUpdated {
                key,
                expiry_date,
                dry_run,
            } => {
                if let Some(ref pb) = state.process_bar {
                    pb.inc(1);
                    let symbol = if dry_run { "·" } else { "✓" };
                    pb.set_message(format!("{symbol} {key} → {expiry_date}"));
                }
            }

            SweepProgress::FlagFailed { key, error } => {
                if let Some(ref pb) = state.process_bar {
                    pb.inc(1);
                    pb.set_message(format!("✗ {key}: {error}"));
                }
            }

            SweepProgress::ProcessingComplete { updated, failed } => {
                if let Some(ref pb) = state.process_bar {
                    let msg = if failed > 0 {
                        format!("✓ {updated} updated, {failed} failed")
                    } else {
                        format!("✓ {updated} updated")
                    };
                    pb.finish_with_message(msg);
                }
            }

            SweepProgress::Warning { message } => {
                drop(state);
                self.multi.println(format!("⚠ {message}")).ok();
            }

            _ => {}
        }
    }

    /// Finish all progress bars.
    pub fn finish(&self) {
        let state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(ref pb) = state.fetch_bar {
            if !pb.is_finished() {
                pb.finish();
            }
        }
        if let Some(ref pb) = state.process_bar {
            if !pb.is_finished() {
                pb.finish();
            }
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .expect("Invalid template")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}")
            .expect("Invalid template")
            .progress_chars("█▓░")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    /// Handle a progress event.
    pub fn handle(&self, event: SweepProgress) {
        match event {
            SweepProgress::FetchingFlags { project } => {
                tracing::info!(project = %project, "Fetching flags");
            }

            SweepProgress::FetchedPage {
                page,
                count,
                total_so_far,
                total_count,
            } => {
                tracing::debug!(page, count, total_so_far, total_count = ?total_count, "Fetched page");
            }

            SweepProgress::FetchComplete { total } => {
                tracing::info!(total, "Fetch complete");
            }

            SweepProgress::Partitioning { property_name } => {
                tracing::debug!(property = %property_name, "Partitioning flags");
            }

            SweepProgress::PartitionComplete {
                to_process,
                skipped,
                total,
            } => {
                tracing::info!(to_process, skipped, total, "Partition complete");
            }

            SweepProgress::ProcessingFlags {
                count,
                batch_size,
                dry_run,
            } => {
                tracing::info!(count, batch_size, dry_run, "Processing flags");
            }

            SweepProgress::FlagUpdated {
                key,
                expiry_date,
                dry_run,
            } => {
                if dry_run {
                    tracing::info!(flag = %key, expiry = %expiry_date, "Would update");
                } else {
                    tracing::info!(flag = %key, expiry = %expiry_date, "Updated");
                }
            }

            SweepProgress::FlagFailed { key, error } => {
                tracing::warn!(flag = %key, error = %error, "Failed to update");
            }

            SweepProgress::ProcessingComplete { updated, failed } => {
                tracing::info!(updated, failed, "Processing complete");
            }

            SweepProgress::Warning { message } => {
                tracing::warn!(message = %message, "Warning");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
