//! Text and time formatting helpers shared by the normalizer, filters and exports.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

use crate::constants::export::TABLE_DATETIME_FORMAT;

/// Remove every whitespace character (used for phone numbers).
pub fn strip_whitespace<T: AsRef<str>>(text: T) -> String {
    text.as_ref()
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect()
}

/// Trim and lower-case an email address.
pub fn normalize_email<T: AsRef<str>>(text: T) -> String {
    text.as_ref().trim().to_lowercase()
}

/// Trim and lower-case a free-text search query.
pub fn normalize_query<T: AsRef<str>>(text: T) -> String {
    text.as_ref().trim().to_lowercase()
}

/// Parse the leading ASCII digits of `text`, ignoring anything after them.
///
/// `"05"` -> 5, `"7x"` -> 7, `""` or `"x7"` -> `None`.
pub fn parse_leading_u32(text: &str) -> Option<u32> {
    let trimmed = text.trim_start();
    let digits: &str = match trimmed.find(|ch: char| !ch.is_ascii_digit()) {
        Some(end) => &trimmed[..end],
        None => trimmed,
    };
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u32>().ok()
}

/// Render a timestamp as `YYYY-MM-DD HH:MM` in `timezone`.
pub fn format_datetime(value: &DateTime<Utc>, timezone: FixedOffset) -> String {
    value
        .with_timezone(&timezone)
        .format(TABLE_DATETIME_FORMAT)
        .to_string()
}

/// Filename-safe timestamp: `2025-03-14T18:22:05` becomes `2025-03-14-18-22-05`.
pub fn filename_timestamp(now: &DateTime<Utc>) -> String {
    let iso = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    iso.chars()
        .take(19)
        .map(|ch| if ch == ':' || ch == 'T' { '-' } else { ch })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn strip_whitespace_removes_inner_spaces() {
        assert_eq!(strip_whitespace(" 55 1234\t5678\n"), "5512345678");
        assert_eq!(strip_whitespace(""), "");
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn parse_leading_u32_stops_at_first_non_digit() {
        assert_eq!(parse_leading_u32("05"), Some(5));
        assert_eq!(parse_leading_u32("12abc"), Some(12));
        assert_eq!(parse_leading_u32("abc"), None);
        assert_eq!(parse_leading_u32(""), None);
    }

    #[test]
    fn format_datetime_uses_offset() {
        let value = Utc.with_ymd_and_hms(2025, 3, 14, 18, 22, 5).unwrap();
        assert_eq!(
            format_datetime(&value, FixedOffset::east_opt(0).unwrap()),
            "2025-03-14 18:22"
        );
        assert_eq!(
            format_datetime(&value, FixedOffset::west_opt(6 * 3600).unwrap()),
            "2025-03-14 12:22"
        );
    }

    #[test]
    fn filename_timestamp_replaces_separators() {
        let value = Utc.with_ymd_and_hms(2025, 3, 14, 8, 2, 5).unwrap();
        assert_eq!(filename_timestamp(&value), "2025-03-14-08-02-05");
    }
}
