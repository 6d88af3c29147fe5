//! Timestamp parsing for feed publish dates and the `--from-date` option.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::app::{CheckerError, Result};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a publish-date string into a UTC timestamp.
///
/// Accepts RFC 2822 (the usual `pubDate` form), RFC 3339 and a few plain
/// ISO-like layouts. Times without an offset are taken as UTC, a bare date
/// as midnight UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Parse a publish date, failing with [`CheckerError::DateParse`].
pub fn parse_published(text: &str) -> Result<DateTime<Utc>> {
    parse_timestamp(text).ok_or_else(|| CheckerError::DateParse(text.to_string()))
}

/// Resolve a human date such as `"1 day ago"`, `"30m ago"`, `"yesterday"` or
/// an absolute timestamp relative to `now`.
pub fn parse_from_date(text: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let normalized = text.trim().to_lowercase();

    match normalized.as_str() {
        "now" => return Ok(now),
        "today" => return Ok(midnight(now)),
        "yesterday" => return Ok(midnight(now) - Duration::days(1)),
        _ => {}
    }

    if let Some(span) = normalized.strip_suffix("ago") {
        let secs = parse_span(span.trim()).map_err(CheckerError::DateParse)?;
        return i64::try_from(secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|delta| now.checked_sub_signed(delta))
            .ok_or_else(|| CheckerError::DateParse(format!("Span too large: {}", text)));
    }

    parse_published(text)
}

fn midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Parse a span like `"1 day"`, `"2 weeks"`, `"30m"` or `"90 s"` into seconds.
fn parse_span(s: &str) -> std::result::Result<u64, String> {
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("Missing unit in: {}", s))?;
    let (amount, unit) = s.split_at(split);

    let amount = if amount.is_empty() {
        // "an hour ago", "a day ago"
        match unit.split_whitespace().next() {
            Some("a") | Some("an") => 1,
            _ => return Err(format!("Invalid amount in: {}", s)),
        }
    } else {
        amount
            .parse::<u64>()
            .map_err(|_| format!("Invalid amount: {}", amount))?
    };

    let unit = unit
        .trim()
        .trim_start_matches("an ")
        .trim_start_matches("a ")
        .trim();

    let seconds = match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hour" | "hours" => 3600,
        "d" | "day" | "days" => 86400,
        "w" | "week" | "weeks" => 7 * 86400,
        _ => return Err(format!("Unknown unit: {}", unit)),
    };

    amount
        .checked_mul(seconds)
        .ok_or_else(|| format!("Span too large: {}", s))
}

/// Parse an interval such as `"90"`, `"30m"` or `"1h"` into seconds.
///
/// A bare number is taken as seconds.
pub fn parse_interval(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim().to_lowercase();
    match s.parse::<u64>() {
        Ok(secs) => Ok(secs),
        Err(_) => parse_span(&s),
    }
}

/// Format interval for display
pub fn format_interval(secs: u64) -> String {
    if secs >= 86400 && secs.is_multiple_of(86400) {
        format!("{}d", secs / 86400)
    } else if secs >= 3600 && secs.is_multiple_of(3600) {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs.is_multiple_of(60) {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}
