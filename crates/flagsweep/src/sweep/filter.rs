//! Expiry decision filter.

use chrono::DateTime;

use crate::api::FlagRecord;

use super::types::SkippedFlag;

/// Reason recorded for flags with an unusable creation date.
pub const REASON_INVALID_CREATION_DATE: &str = "Invalid or missing creation date";

/// Result of partitioning the fetched collection.
#[derive(Debug, Default)]
pub struct Partitioned {
    /// Flags to run through the processor, in input order.
    pub to_process: Vec<FlagRecord>,
    /// Flags routed away, each with a reason.
    pub skipped: Vec<SkippedFlag>,
}

/// Split the fetched flags into "needs an expiry date" and "skip".
///
/// Pure function, no I/O. The existing-property check runs before the
/// creation-date check on purpose: a flag that has the property *and* a
/// broken creation date reports "already has" when `skip_existing` is set.
#[must_use]
pub fn partition(records: Vec<FlagRecord>, property_name: &str, skip_existing: bool) -> Partitioned {
    let mut result = Partitioned::default();

    for record in records {
        if skip_existing && record.has_property_value(property_name) {
            let existing = record.property(property_name).map(|p| p.value.clone());
            result.skipped.push(SkippedFlag {
                key: record.key,
                name: record.name,
                reason: format!("Already has {property_name}"),
                existing_value: existing,
            });
            continue;
        }

        let has_valid_creation = record
            .creation_date
            .and_then(DateTime::from_timestamp_millis)
            .is_some();
        if !has_valid_creation {
            result.skipped.push(SkippedFlag {
                key: record.key,
                name: record.name,
                reason: REASON_INVALID_CREATION_DATE.to_string(),
                existing_value: None,
            });
            continue;
        }

        result.to_process.push(record);
    }

    result
}
