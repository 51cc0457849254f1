//! Sweep options, per-flag outcomes, and the aggregate run result.

use std::time::Duration;

use serde::Serialize;

use crate::dates::DEFAULT_DATE_FORMAT;

/// Custom property the expiry date is written to by default.
pub const DEFAULT_PROPERTY_NAME: &str = "flag.expiry.date";

/// Default number of calendar days between creation and expiry.
pub const DEFAULT_DAYS_OFFSET: u32 = 30;

/// Smallest accepted days offset.
pub const MIN_DAYS_OFFSET: u32 = 1;

/// Largest accepted days offset.
pub const MAX_DAYS_OFFSET: u32 = 365;

/// Number of flags patched concurrently per batch.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Pause between batches of write calls, in milliseconds.
pub const DEFAULT_BATCH_DELAY_MS: u64 = 1_000;

/// Options for a sweep run.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Custom property to stamp the expiry date into.
    pub property_name: String,
    /// Calendar days from creation to expiry.
    pub days_offset: u32,
    /// Layout name for the rendered expiry date.
    pub date_format: String,
    /// Leave flags untouched when they already carry the property.
    pub skip_existing: bool,
    /// Compute everything, write nothing.
    pub dry_run: bool,
    /// Concurrent write calls per batch.
    pub batch_size: usize,
    /// Pause after each batch fully settles.
    pub batch_delay: Duration,
    /// Pause between enumeration pages.
    pub page_delay: Duration,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            property_name: DEFAULT_PROPERTY_NAME.to_string(),
            days_offset: DEFAULT_DAYS_OFFSET,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            skip_existing: true,
            dry_run: false,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
            page_delay: Duration::ZERO,
        }
    }
}

impl SweepOptions {
    /// Check the options a run cannot proceed without.
    pub fn validate(&self) -> Result<(), String> {
        if self.property_name.trim().is_empty() {
            return Err("property name must not be empty".to_string());
        }
        if !(MIN_DAYS_OFFSET..=MAX_DAYS_OFFSET).contains(&self.days_offset) {
            return Err(format!(
                "days offset must be between {MIN_DAYS_OFFSET} and {MAX_DAYS_OFFSET}, got {}",
                self.days_offset
            ));
        }
        if self.batch_size == 0 {
            return Err("batch size must be at least 1".to_string());
        }
        Ok(())
    }
}

/// A flag that received (or, in a dry run, would receive) an expiry date.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedFlag {
    pub key: String,
    pub name: String,
    /// Creation instant, RFC 3339.
    pub creation_date: String,
    /// Rendered expiry date in the configured layout.
    pub expiry_date: String,
    pub days_from_creation: u32,
    pub property_name: String,
}

/// A flag whose write call failed; the failure never aborts its siblings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedFlag {
    pub key: String,
    pub name: String,
    pub error: String,
}

/// A flag the filter routed away from processing, with the reason.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFlag {
    pub key: String,
    pub name: String,
    pub reason: String,
    /// The value already present, when skipped for that reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_value: Option<Vec<String>>,
}

/// Aggregate result of one sweep run.
///
/// Every flag the processor saw lands in exactly one of `updated` or
/// `failed`; together with `skipped` the three lists account for the full
/// fetched set.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub updated: Vec<UpdatedFlag>,
    pub failed: Vec<FailedFlag>,
    pub skipped: Vec<SkippedFlag>,
    /// Every flag the enumerator returned.
    pub total_found: usize,
    /// Flags that went through the processor (updated + failed).
    pub total_processed: usize,
}

impl RunResult {
    /// A run succeeds only when no per-flag write failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_documented_defaults() {
        let options = SweepOptions::default();
        assert_eq!(options.property_name, "flag.expiry.date");
        assert_eq!(options.days_offset, 30);
        assert_eq!(options.date_format, "MM/DD/YYYY");
        assert!(options.skip_existing);
        assert!(!options.dry_run);
        assert_eq!(options.batch_size, 5);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn days_offset_bounds_are_enforced() {
        let mut options = SweepOptions::default();
        options.days_offset = 0;
        assert!(options.validate().is_err());
        options.days_offset = 366;
        assert!(options.validate().is_err());
        options.days_offset = 1;
        assert!(options.validate().is_ok());
        options.days_offset = 365;
        assert!(options.validate().is_ok());
    }

    #[test]
    fn blank_property_name_is_rejected() {
        let mut options = SweepOptions::default();
        options.property_name = "   ".to_string();
        let err = options.validate().expect_err("blank name should fail");
        assert!(err.contains("property name"));
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let mut options = SweepOptions::default();
        options.batch_size = 0;
        assert!(options.validate().is_err());
    }

    #[test]
    fn run_succeeds_only_without_failures() {
        let mut result = RunResult::default();
        assert!(result.is_success());

        result.failed.push(FailedFlag {
            key: "k".to_string(),
            name: "n".to_string(),
            error: "boom".to_string(),
        });
        assert!(!result.is_success());
    }

    #[test]
    fn skipped_flag_omits_absent_existing_value_in_json() {
        let skipped = SkippedFlag {
            key: "k".to_string(),
            name: "n".to_string(),
            reason: "Invalid or missing creation date".to_string(),
            existing_value: None,
        };
        let value = serde_json::to_value(&skipped).expect("serializable");
        assert!(value.get("existingValue").is_none());
        assert_eq!(value["reason"], "Invalid or missing creation date");
    }
}
