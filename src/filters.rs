//! Client-side filter engine.
//!
//! Stages run in a fixed order: free text, birth month, optional duplicate
//! merge, frequency threshold. The merge must precede the frequency stage
//! because it recomputes `visit_count` from the merged constituents.

use tracing::debug;

use crate::config::FilterOptions;
use crate::constants::filters::MIN_FREQUENCY_THRESHOLD;
use crate::data::LeadRecord;
use crate::merge::merge_duplicates;
use crate::utils::normalize_query;

/// Keep records whose name, email or phone contains `query` (case-insensitive).
///
/// A blank query keeps everything.
pub fn filter_by_text(records: Vec<LeadRecord>, query: &str) -> Vec<LeadRecord> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| {
            record.full_name.to_lowercase().contains(&needle)
                || record.email.contains(&needle)
                || record.phone.contains(&needle)
        })
        .collect()
}

/// Keep records whose birthday month segment equals `month` (e.g. `"05"`).
///
/// Records with an empty or malformed birthday are dropped.
pub fn filter_by_birth_month(records: Vec<LeadRecord>, month: &str) -> Vec<LeadRecord> {
    records
        .into_iter()
        .filter(|record| record.birth_month() == Some(month))
        .collect()
}

/// Effective visit threshold for raw user input.
///
/// Blank or non-numeric input means 2, and anything below 2 is raised to 2.
pub fn frequency_threshold(raw: Option<&str>) -> u32 {
    let requested = raw
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .and_then(parse_signed_prefix)
        .unwrap_or(i64::from(MIN_FREQUENCY_THRESHOLD));
    let floor = i64::from(MIN_FREQUENCY_THRESHOLD);
    u32::try_from(requested.max(floor)).unwrap_or(u32::MAX)
}

/// Keep records with `visit_count >= max(2, threshold)`.
pub fn filter_frequent(records: Vec<LeadRecord>, threshold: u32) -> Vec<LeadRecord> {
    let threshold = threshold.max(MIN_FREQUENCY_THRESHOLD);
    records
        .into_iter()
        .filter(|record| record.visit_count >= threshold)
        .collect()
}

/// Run every enabled stage in order.
pub fn apply_filters(records: Vec<LeadRecord>, options: &FilterOptions) -> Vec<LeadRecord> {
    let fetched = records.len();
    let mut filtered = filter_by_text(records, &options.query);
    if let Some(month) = options.birth_month.as_deref().filter(|m| !m.is_empty()) {
        filtered = filter_by_birth_month(filtered, month);
    }
    if options.merge_duplicates {
        filtered = merge_duplicates(&filtered);
    }
    if options.only_frequent {
        let threshold = frequency_threshold(options.frequency_threshold.as_deref());
        filtered = filter_frequent(filtered, threshold);
    }
    debug!(
        fetched,
        kept = filtered.len(),
        "[leads:filters] applied client-side filters"
    );
    filtered
}

/// Integer parse that accepts a leading sign and ignores trailing garbage.
fn parse_signed_prefix(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
