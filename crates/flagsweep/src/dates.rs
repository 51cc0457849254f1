//! Calendar-date formatting and validation for expiry properties.
//!
//! The flag service stores expiry dates as plain strings, so the sweep
//! core works with four fixed layouts rather than free-form chrono format
//! strings. Validation round-trips the parsed components through a
//! normalized [`NaiveDate`] instead of a hand-rolled calendar table.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate};

/// Canonical name of the default layout.
pub const DEFAULT_DATE_FORMAT: &str = "MM/DD/YYYY";

/// The four supported expiry-date layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    MonthDayYearSlash,
    MonthDayYearDash,
    YearMonthDayDash,
    YearMonthDaySlash,
}

impl DateFormat {
    /// Look up a layout by name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "MM/DD/YYYY" => Some(Self::MonthDayYearSlash),
            "MM-DD-YYYY" => Some(Self::MonthDayYearDash),
            "YYYY-MM-DD" => Some(Self::YearMonthDayDash),
            "YYYY/MM/DD" => Some(Self::YearMonthDaySlash),
            _ => None,
        }
    }

    /// The canonical (uppercase) name of this layout.
    #[must_use]
    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::MonthDayYearSlash => "MM/DD/YYYY",
            Self::MonthDayYearDash => "MM-DD-YYYY",
            Self::YearMonthDayDash => "YYYY-MM-DD",
            Self::YearMonthDaySlash => "YYYY/MM/DD",
        }
    }

    fn separator(self) -> char {
        match self {
            Self::MonthDayYearSlash | Self::YearMonthDaySlash => '/',
            Self::MonthDayYearDash | Self::YearMonthDayDash => '-',
        }
    }

    fn year_first(self) -> bool {
        matches!(self, Self::YearMonthDayDash | Self::YearMonthDaySlash)
    }

    fn render(self, date: NaiveDate) -> String {
        let sep = self.separator();
        let (y, m, d) = (date.year(), date.month(), date.day());
        if self.year_first() {
            format!("{y:04}{sep}{m:02}{sep}{d:02}")
        } else {
            format!("{m:02}{sep}{d:02}{sep}{y:04}")
        }
    }
}

/// Format a calendar date in the named layout.
///
/// An unrecognized layout name falls back to `MM/DD/YYYY`.
#[must_use]
pub fn format_date(date: NaiveDate, format: &str) -> String {
    let layout = DateFormat::from_name(format).unwrap_or_else(|| {
        tracing::warn!(format, "unrecognized date format, falling back to MM/DD/YYYY");
        DateFormat::MonthDayYearSlash
    });
    layout.render(date)
}

/// Today's local calendar date in the named layout.
#[must_use]
pub fn today(format: &str) -> String {
    format_date(Local::now().date_naive(), format)
}

/// Check whether `input` is a real calendar date in the named layout.
///
/// The layout's separator and component order must match, with a 1–2 digit
/// month/day and an exactly 4-digit year. The parsed components are then
/// rebuilt into a calendar date and must survive unchanged, which rejects
/// impossible dates like day 32 or Feb 29 outside a leap year.
#[must_use]
pub fn is_valid_date_format(input: &str, format: &str) -> bool {
    if input.is_empty() {
        return false;
    }
    let Some(layout) = DateFormat::from_name(format) else {
        tracing::warn!(format, "unrecognized date format passed to validation");
        return false;
    };

    let parts: Vec<&str> = input.split(layout.separator()).collect();
    if parts.len() != 3 {
        return false;
    }
    let (y_raw, m_raw, d_raw) = if layout.year_first() {
        (parts[0], parts[1], parts[2])
    } else {
        (parts[2], parts[0], parts[1])
    };

    if y_raw.len() != 4 || !(1..=2).contains(&m_raw.len()) || !(1..=2).contains(&d_raw.len()) {
        return false;
    }
    if ![y_raw, m_raw, d_raw]
        .iter()
        .all(|s| s.bytes().all(|b| b.is_ascii_digit()))
    {
        return false;
    }

    let (Ok(year), Ok(month), Ok(day)) = (
        y_raw.parse::<i32>(),
        m_raw.parse::<u32>(),
        d_raw.parse::<u32>(),
    ) else {
        return false;
    };

    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date.year() == year && date.month() == month && date.day() == day,
        None => false,
    }
}

/// The expiry calendar date for a flag: the UTC date of the creation
/// instant plus `days_offset` calendar days.
///
/// Returns `None` when the timestamp is outside the representable range.
#[must_use]
pub fn expiry_date(creation_ms: i64, days_offset: u32) -> Option<NaiveDate> {
    let creation = DateTime::from_timestamp_millis(creation_ms)?;
    creation
        .date_naive()
        .checked_add_days(Days::new(u64::from(days_offset)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_FORMATS: [&str; 4] = ["MM/DD/YYYY", "MM-DD-YYYY", "YYYY-MM-DD", "YYYY/MM/DD"];

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("test date should be valid")
    }

    #[test]
    fn format_date_pads_month_and_day() {
        let d = date(2025, 2, 9);
        assert_eq!(format_date(d, "MM/DD/YYYY"), "02/09/2025");
        assert_eq!(format_date(d, "MM-DD-YYYY"), "02-09-2025");
        assert_eq!(format_date(d, "YYYY-MM-DD"), "2025-02-09");
        assert_eq!(format_date(d, "YYYY/MM/DD"), "2025/02/09");
    }

    #[test]
    fn canonical_names_round_trip_through_lookup() {
        for f in ALL_FORMATS {
            let layout = DateFormat::from_name(f).expect("known layout");
            assert_eq!(layout.canonical_name(), f);
            assert_eq!(DateFormat::from_name(layout.canonical_name()), Some(layout));
        }
    }

    #[test]
    fn format_name_lookup_is_case_insensitive() {
        let d = date(2025, 12, 31);
        assert_eq!(format_date(d, "yyyy-mm-dd"), "2025-12-31");
        assert_eq!(format_date(d, "Mm/Dd/Yyyy"), "12/31/2025");
    }

    #[test]
    fn unrecognized_format_falls_back_to_month_day_year() {
        let d = date(2025, 3, 4);
        assert_eq!(format_date(d, "DD.MM.YYYY"), "03/04/2025");
    }

    #[test]
    fn today_matches_locally_computed_date_in_all_formats() {
        for f in ALL_FORMATS {
            let now = Local::now().date_naive();
            assert_eq!(today(f), format_date(now, f));
        }
    }

    #[test]
    fn formatted_dates_round_trip_through_validation() {
        let samples = [date(2025, 1, 1), date(2024, 2, 29), date(1999, 12, 31)];
        for f in ALL_FORMATS {
            for d in samples {
                let rendered = format_date(d, f);
                assert!(
                    is_valid_date_format(&rendered, f),
                    "{rendered} should validate under {f}"
                );
            }
        }
    }

    #[test]
    fn single_digit_components_are_accepted() {
        assert!(is_valid_date_format("2/9/2025", "MM/DD/YYYY"));
        assert!(is_valid_date_format("2025-2-9", "YYYY-MM-DD"));
    }

    #[test]
    fn leap_year_boundary() {
        assert!(is_valid_date_format("02/29/2024", "MM/DD/YYYY"));
        assert!(!is_valid_date_format("02/29/2023", "MM/DD/YYYY"));
        assert!(is_valid_date_format("2024-02-29", "YYYY-MM-DD"));
        assert!(!is_valid_date_format("2023-02-29", "YYYY-MM-DD"));
    }

    #[test]
    fn impossible_components_are_rejected() {
        assert!(!is_valid_date_format("13/01/2025", "MM/DD/YYYY"));
        assert!(!is_valid_date_format("12/32/2025", "MM/DD/YYYY"));
        assert!(!is_valid_date_format("2025-00-10", "YYYY-MM-DD"));
        assert!(!is_valid_date_format("2025-04-31", "YYYY-MM-DD"));
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        assert!(!is_valid_date_format("", "MM/DD/YYYY"));
        assert!(!is_valid_date_format("12/05/25", "MM/DD/YYYY"));
        assert!(!is_valid_date_format("12-05-2025", "MM/DD/YYYY"));
        assert!(!is_valid_date_format("2025-05-12-1", "YYYY-MM-DD"));
        assert!(!is_valid_date_format("aa/bb/cccc", "MM/DD/YYYY"));
        assert!(!is_valid_date_format("01/01/2025", "DD.MM.YYYY"));
    }

    #[test]
    fn expiry_date_adds_calendar_days_to_utc_creation_date() {
        // 2025-07-18T10:30:00Z
        let creation_ms = 1_752_834_600_000;
        let expiry = expiry_date(creation_ms, 30).expect("timestamp is representable");
        assert_eq!(format_date(expiry, "MM/DD/YYYY"), "08/17/2025");
        assert_eq!(format_date(expiry, "YYYY-MM-DD"), "2025-08-17");
    }

    #[test]
    fn expiry_date_crosses_year_boundaries() {
        // 2024-12-20T00:00:00Z
        let creation_ms = 1_734_652_800_000;
        let expiry = expiry_date(creation_ms, 30).expect("timestamp is representable");
        assert_eq!(format_date(expiry, "YYYY-MM-DD"), "2025-01-19");
    }

    #[test]
    fn expiry_date_rejects_unrepresentable_timestamps() {
        assert!(expiry_date(i64::MAX, 30).is_none());
    }
}
