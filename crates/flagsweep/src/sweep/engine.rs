//! Sweep engine: per-flag processing and run orchestration.
//!
//! Flags are patched in fixed-size concurrent batches. Within a batch,
//! handles are awaited in spawn order so outcomes stay positional; a batch
//! fully settles (including its post-batch delay) before the next one
//! starts. One flag's failure never aborts its siblings.

use chrono::DateTime;
use thiserror::Error;

use crate::api::{ApiError, EnumerationError, FlagRecord, FlagsClient, PatchRequest};
use crate::dates::{expiry_date, format_date};

use super::filter::partition;
use super::progress::{ProgressCallback, SweepProgress, emit};
use super::types::{FailedFlag, RunResult, SweepOptions, UpdatedFlag};

/// Errors that abort a sweep entirely.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Invalid configuration, caught before any network call.
    #[error("configuration error: {0}")]
    Config(String),

    /// Enumeration failed; there is no per-page isolation.
    #[error(transparent)]
    Enumeration(#[from] EnumerationError),
}

/// Failure while processing a single flag. Recorded, never propagated
/// past the flag it belongs to.
#[derive(Debug, Error)]
enum ProcessError {
    #[error("invalid or missing creation date for flag {key}")]
    Calculation { key: String },

    #[error("failed to process flag {key}: {source}")]
    Patch {
        key: String,
        #[source]
        source: ApiError,
    },
}

/// Compute and write the expiry property for one flag.
async fn process_single_flag(
    client: &FlagsClient,
    project: &str,
    flag: &FlagRecord,
    options: &SweepOptions,
) -> Result<UpdatedFlag, ProcessError> {
    let calculation_error = || ProcessError::Calculation {
        key: flag.key.clone(),
    };

    // The filter keeps unusable creation dates out, but a stale or
    // hand-built input set must not panic here.
    let creation_ms = flag.creation_date.ok_or_else(calculation_error)?;
    let creation = DateTime::from_timestamp_millis(creation_ms).ok_or_else(calculation_error)?;
    let expiry = expiry_date(creation_ms, options.days_offset).ok_or_else(calculation_error)?;
    let expiry_string = format_date(expiry, &options.date_format);

    // A fresh lookup decides add vs replace. If the flag vanished since
    // enumeration, the enumerated copy decides and the patch surfaces the
    // 404 as this flag's failure.
    let already_exists = match client.get_flag(project, &flag.key).await {
        Ok(Some(current)) => current.has_property_value(&options.property_name),
        Ok(None) => flag.has_property_value(&options.property_name),
        Err(source) => {
            return Err(ProcessError::Patch {
                key: flag.key.clone(),
                source,
            });
        }
    };

    if !options.dry_run {
        let patch = PatchRequest::set_custom_property(
            &options.property_name,
            expiry_string.clone(),
            already_exists,
        );
        client
            .patch_flag(project, &flag.key, &patch)
            .await
            .map_err(|source| ProcessError::Patch {
                key: flag.key.clone(),
                source,
            })?;
    }

    Ok(UpdatedFlag {
        key: flag.key.clone(),
        name: flag.name.clone(),
        creation_date: creation.to_rfc3339(),
        expiry_date: expiry_string,
        days_from_creation: options.days_offset,
        property_name: options.property_name.clone(),
    })
}

/// Patch the given flags in throttled concurrent batches.
///
/// Returns the updated and failed flags in input order. Every input flag
/// lands in exactly one of the two lists.
pub async fn process_flags(
    client: &FlagsClient,
    project: &str,
    to_process: Vec<FlagRecord>,
    options: &SweepOptions,
    on_progress: Option<&ProgressCallback>,
) -> (Vec<UpdatedFlag>, Vec<FailedFlag>) {
    let mut updated = Vec::new();
    let mut failed = Vec::new();

    if to_process.is_empty() {
        return (updated, failed);
    }

    let batch_size = options.batch_size.max(1);
    let total_batches = to_process.len().div_ceil(batch_size);

    emit(
        on_progress,
        SweepProgress::ProcessingFlags {
            count: to_process.len(),
            batch_size,
            dry_run: options.dry_run,
        },
    );

    for (batch_index, batch) in to_process.chunks(batch_size).enumerate() {
        let labels: Vec<(String, String)> = batch
            .iter()
            .map(|f| (f.key.clone(), f.name.clone()))
            .collect();

        let mut handles = Vec::with_capacity(batch.len());
        for flag in batch {
            let client = client.clone();
            let project = project.to_string();
            let flag = flag.clone();
            let options = options.clone();

            handles.push(tokio::spawn(async move {
                process_single_flag(&client, &project, &flag, &options).await
            }));
        }

        // Await in spawn order so outcomes map positionally onto the batch.
        for ((key, name), handle) in labels.into_iter().zip(handles) {
            match handle.await {
                Ok(Ok(update)) => {
                    emit(
                        on_progress,
                        SweepProgress::FlagUpdated {
                            key: update.key.clone(),
                            expiry_date: update.expiry_date.clone(),
                            dry_run: options.dry_run,
                        },
                    );
                    updated.push(update);
                }
                Ok(Err(e)) => {
                    let error = e.to_string();
                    tracing::warn!(key = %key, error = %error, "flag processing failed");
                    emit(
                        on_progress,
                        SweepProgress::FlagFailed {
                            key: key.clone(),
                            error: error.clone(),
                        },
                    );
                    failed.push(FailedFlag { key, name, error });
                }
                Err(e) => {
                    let error = format!("task panicked: {e}");
                    emit(
                        on_progress,
                        SweepProgress::FlagFailed {
                            key: key.clone(),
                            error: error.clone(),
                        },
                    );
                    failed.push(FailedFlag { key, name, error });
                }
            }
        }

        if batch_index + 1 < total_batches && !options.batch_delay.is_zero() {
            tokio::time::sleep(options.batch_delay).await;
        }
    }

    emit(
        on_progress,
        SweepProgress::ProcessingComplete {
            updated: updated.len(),
            failed: failed.len(),
        },
    );

    (updated, failed)
}

/// Run a full sweep: validate, enumerate, partition, process, aggregate.
///
/// Enumeration failures abort the run; write failures are per-flag and
/// leave the run reporting a complete [`RunResult`] with
/// `is_success() == false`.
#[tracing::instrument(skip(client, options, on_progress), fields(project = %project))]
pub async fn run_sweep(
    client: &FlagsClient,
    project: &str,
    options: &SweepOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<RunResult, SweepError> {
    if project.trim().is_empty() {
        return Err(SweepError::Config("project key must not be empty".to_string()));
    }
    options.validate().map_err(SweepError::Config)?;

    let all = client
        .fetch_all_flags(project, options.page_delay, on_progress)
        .await?;
    let total_found = all.len();

    emit(
        on_progress,
        SweepProgress::Partitioning {
            property_name: options.property_name.clone(),
        },
    );
    let partitioned = partition(all, &options.property_name, options.skip_existing);
    emit(
        on_progress,
        SweepProgress::PartitionComplete {
            to_process: partitioned.to_process.len(),
            skipped: partitioned.skipped.len(),
            total: total_found,
        },
    );

    let total_processed = partitioned.to_process.len();
    let (updated, failed) =
        process_flags(client, project, partitioned.to_process, options, on_progress).await;

    Ok(RunResult {
        updated,
        failed,
        skipped: partitioned.skipped,
        total_found,
        total_processed,
    })
}
