//! Word counts, reading time and "last edited" labels.

use chrono::{Local, TimeZone};

/// Average reading speed used for estimates.
pub const WORDS_PER_MINUTE: usize = 200;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Counts whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Counts characters (Unicode scalar values).
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Minutes needed to read `text`, rounded up. Empty text reads in 0.
pub fn estimate_reading_minutes(text: &str) -> usize {
    word_count(text).div_ceil(WORDS_PER_MINUTE)
}

/// Short label for how long ago `timestamp_ms` was, relative to `now_ms`.
///
/// Under a minute reads "Just now"; then minutes, hours, and days up to a
/// week; older timestamps render as a local calendar date.
pub fn relative_time_label(timestamp_ms: i64, now_ms: i64) -> String {
    let elapsed = now_ms.saturating_sub(timestamp_ms);
    let minutes = elapsed / MINUTE_MS;
    let hours = elapsed / HOUR_MS;
    let days = elapsed / DAY_MS;

    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    if hours < 24 {
        return format!("{hours}h ago");
    }
    if days < 7 {
        return format!("{days}d ago");
    }

    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(moment) => moment.format("%-m/%-d/%Y").to_string(),
        None => "Unknown date".to_string(),
    }
}
