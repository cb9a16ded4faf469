//! Display formatting for dates, sizes, durations and rates

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

/// Shown in place of a missing value
pub const PLACEHOLDER: &str = "-";

/// Default pattern for [`format_date_time`]
pub const DEFAULT_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

const SIZE_UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Format a backend timestamp with a strftime pattern
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, ISO 8601 with or without an offset,
/// bare dates, and epoch milliseconds. Offset-carrying and epoch inputs
/// are shown in local time; naive inputs are shown as written. Input that
/// parses as none of these is returned unchanged. An invalid pattern
/// falls back to [`DEFAULT_DATE_TIME_FORMAT`].
pub fn format_date_time(input: Option<&str>, pattern: Option<&str>) -> String {
    let raw = match input.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return PLACEHOLDER.to_string(),
    };
    let pattern = pattern
        .filter(|p| is_valid_pattern(p))
        .unwrap_or(DEFAULT_DATE_TIME_FORMAT);

    match parse_timestamp(raw) {
        Some(dt) => dt.format(pattern).to_string(),
        None => raw.to_string(),
    }
}

fn is_valid_pattern(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(millis) = raw.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis)
            .map(|utc| utc.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Human-readable byte count using base-1024 units
///
/// Bytes are shown as a whole number; larger units keep exactly
/// `decimals` digits after the point (`1536` → `"1.50 KB"`).
pub fn format_file_size(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut scale = 1u128;
    while unit + 1 < SIZE_UNITS.len() && u128::from(bytes) >= scale * 1024 {
        scale *= 1024;
        unit += 1;
    }

    if unit == 0 {
        return format!("{} B", bytes);
    }
    let value = bytes as f64 / scale as f64;
    format!("{:.*} {}", decimals, value, SIZE_UNITS[unit])
}

/// Compact duration such as `"45s"`, `"1m 30s"` or `"2h 5m"`
///
/// Zero-valued trailing units are omitted. Missing, zero and negative
/// inputs render as the placeholder.
pub fn format_duration(seconds: Option<i64>) -> String {
    let seconds = match seconds {
        Some(s) if s > 0 => s,
        _ => return PLACEHOLDER.to_string(),
    };

    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        let minutes = seconds / 60;
        let rest = seconds % 60;
        if rest > 0 {
            format!("{}m {}s", minutes, rest)
        } else {
            format!("{}m", minutes)
        }
    } else {
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        if minutes > 0 {
            format!("{}h {}m", hours, minutes)
        } else {
            format!("{}h", hours)
        }
    }
}

/// Cut `text` to `max_chars` characters, appending `...` when shortened
pub fn truncate_text(text: Option<&str>, max_chars: usize) -> String {
    let Some(text) = text else {
        return String::new();
    };
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Whole-number success percentage; 0 when nothing was processed
pub fn calculate_success_rate(success: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (success as f64 / total as f64 * 100.0).round() as u32
}
