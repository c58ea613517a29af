use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::config::PREVIEW_SUFFIX;

/// Length of the `YYYY-MM-DD` date portion of an API version
const DATE_LEN: usize = 10;

/// Returns true for pre-release versions (`2021-05-01-preview`)
pub fn is_preview(version: &str) -> bool {
    version.ends_with(PREVIEW_SUFFIX)
}

/// Parse the calendar date at the start of an API version.
///
/// Examples:
/// - "2021-02-01" -> 2021-02-01
/// - "2021-02-01-preview" -> 2021-02-01
/// - "2021-02-30" -> None
pub fn parse_date(version: &str) -> Option<NaiveDate> {
    let date = version.get(..DATE_LEN)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Compare two API versions by recency, newest first.
///
/// `Ordering::Less` means `a` sorts before `b`. Later dates come first; on
/// the same date the stable version precedes its preview. When either date
/// does not parse, the pair falls back to descending string order.
pub fn compare_recency(a: &str, b: &str) -> Ordering {
    match (parse_date(a), parse_date(b)) {
        (Some(date_a), Some(date_b)) => date_b
            .cmp(&date_a)
            .then_with(|| is_preview(a).cmp(&is_preview(b)))
            .then_with(|| b.cmp(a)),
        _ => b.cmp(a),
    }
}
