//! Conditional request support
//!
//! `Last-Modified` generation and `If-Modified-Since` evaluation. Dates use
//! the IMF-fixdate form, always in GMT.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::time::SystemTime;

const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a timestamp as an HTTP-date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE).to_string()
}

/// Parse an HTTP-date; anything else yields `None`
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), HTTP_DATE)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Whether a file modified at `modified` may be answered with 304
///
/// `If-None-Match` takes precedence: when present, `If-Modified-Since` is
/// ignored. Sub-second precision is dropped since HTTP-dates carry none.
pub fn not_modified(
    if_modified_since: Option<&str>,
    if_none_match: Option<&str>,
    modified: SystemTime,
) -> bool {
    if if_none_match.is_some() {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    let modified = DateTime::<Utc>::from(modified);
    modified.timestamp() <= since.timestamp()
}
