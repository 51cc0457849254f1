//! Paginated enumeration of a project's flags.

use std::time::Duration;

use thiserror::Error;

use crate::sweep::{ProgressCallback, SweepProgress, emit};

use super::client::FlagsClient;
use super::error::ApiError;
use super::types::FlagRecord;

/// Page size used when enumerating flags.
pub const PAGE_SIZE: u32 = 50;

/// A page request failed after retries were exhausted.
///
/// Enumeration has no per-page isolation: this aborts the whole run.
#[derive(Debug, Error)]
#[error("failed to fetch flags at offset {offset}: {source}")]
pub struct EnumerationError {
    pub offset: u64,
    #[source]
    pub source: ApiError,
}

impl FlagsClient {
    /// Fetch every flag in the project, page by page.
    ///
    /// Pages are requested with a running offset until a page comes back
    /// short or empty. Collection size is unbounded: thousands of flags
    /// accumulate without truncation. `page_delay` optionally spaces page
    /// requests to stay clear of the rate limiter.
    pub async fn fetch_all_flags(
        &self,
        project: &str,
        page_delay: Duration,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<Vec<FlagRecord>, EnumerationError> {
        let mut all: Vec<FlagRecord> = Vec::new();
        let mut offset = 0u64;
        let mut page_number = 1u32;

        emit(
            on_progress,
            SweepProgress::FetchingFlags {
                project: project.to_string(),
            },
        );

        loop {
            let page = self
                .list_flags_page(project, PAGE_SIZE, offset)
                .await
                .map_err(|source| EnumerationError { offset, source })?;

            let count = page.items.len();
            all.extend(page.items);

            tracing::debug!(page = page_number, count, total_so_far = all.len(), "fetched flag page");
            emit(
                on_progress,
                SweepProgress::FetchedPage {
                    page: page_number,
                    count,
                    total_so_far: all.len(),
                    total_count: page.total_count,
                },
            );

            if count < PAGE_SIZE as usize {
                break;
            }

            offset += count as u64;
            page_number += 1;

            if !page_delay.is_zero() {
                tokio::time::sleep(page_delay).await;
            }
        }

        emit(on_progress, SweepProgress::FetchComplete { total: all.len() });

        Ok(all)
    }
}
