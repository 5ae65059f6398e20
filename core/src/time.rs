//! Time related utils.

use chrono::NaiveDateTime;

/// Naive local date time, as the CMS API carries no timezone.
pub type DateTime = NaiveDateTime;

/// Date format used by the CMS API: "2017-06-09 22:30"
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format time into the date format the CMS API accepts.
///
/// Seconds and sub-seconds are truncated, all fields are zero padded.
pub fn format_date(t: DateTime) -> String {
    t.format(DATE_FORMAT).to_string()
}
