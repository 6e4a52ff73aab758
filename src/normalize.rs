//! Normalization boundary between raw stored documents and `LeadRecord`.
//!
//! Raw documents are loosely typed: fields may be missing, carry the wrong
//! JSON type, or hold store timestamp objects. Everything past this module
//! works on the canonical record only.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::constants::normalize::{
    DEFAULT_VISIT_COUNT, FIELD_BIRTHDAY, FIELD_CREATED_AT, FIELD_EMAIL, FIELD_FULL_NAME,
    FIELD_LAST_SESSION_MINUTES, FIELD_LAST_VISIT, FIELD_PHONE, FIELD_SOURCE, FIELD_TOTAL_MINUTES,
    FIELD_VISIT_COUNT, FIELD_VISIT_HISTORY,
};
use crate::data::LeadRecord;
use crate::source::StoredDocument;
use crate::utils::{normalize_email, strip_whitespace};

/// Normalize one stored document.
pub fn normalize_document(document: &StoredDocument) -> LeadRecord {
    normalize_value(&document.id, &document.data)
}

/// Normalize a batch of stored documents, preserving order.
pub fn normalize_documents(documents: &[StoredDocument]) -> Vec<LeadRecord> {
    documents.iter().map(normalize_document).collect()
}

/// Normalize raw document data under `id`.
///
/// Never fails: non-object data yields a default record.
pub fn normalize_value(id: &str, data: &Value) -> LeadRecord {
    let mut record = LeadRecord::new(id);
    let Some(fields) = data.as_object() else {
        return record;
    };

    record.full_name = string_field(fields, FIELD_FULL_NAME);
    record.email = normalize_email(string_field(fields, FIELD_EMAIL));
    record.phone = strip_whitespace(string_field(fields, FIELD_PHONE));
    record.birthday = string_field(fields, FIELD_BIRTHDAY);
    record.created_at = timestamp_field(fields, FIELD_CREATED_AT);
    record.source = string_field(fields, FIELD_SOURCE);
    record.visit_history = fields
        .get(FIELD_VISIT_HISTORY)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    record.visit_count = visit_count(fields.get(FIELD_VISIT_COUNT), record.visit_history.len());
    record.last_visit = timestamp_field(fields, FIELD_LAST_VISIT).or(record.created_at);
    record.last_session_minutes = number_field(fields, FIELD_LAST_SESSION_MINUTES);
    record.total_minutes = number_field(fields, FIELD_TOTAL_MINUTES);
    record
}

/// Read a store timestamp.
///
/// Accepts `{seconds, nanoseconds}` / `{_seconds, _nanoseconds}` objects and
/// RFC 3339 strings. Anything else is treated as absent.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Object(fields) => {
            let seconds = fields
                .get("seconds")
                .or_else(|| fields.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = fields
                .get("nanoseconds")
                .or_else(|| fields.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            let nanos = u32::try_from(nanos).ok()?;
            DateTime::from_timestamp(seconds, nanos)
        }
        Value::String(text) => DateTime::parse_from_rfc3339(text.trim())
            .ok()
            .map(|value| value.with_timezone(&Utc)),
        _ => None,
    }
}

/// Read the `createdAt` timestamp of raw document data.
pub fn created_at_of(data: &Value) -> Option<DateTime<Utc>> {
    data.as_object()
        .and_then(|fields| timestamp_field(fields, FIELD_CREATED_AT))
}

fn string_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(text)) => text.clone(),
        _ => String::new(),
    }
}

fn timestamp_field(fields: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    fields.get(key).and_then(parse_timestamp)
}

fn number_field(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    fields
        .get(key)
        .and_then(Value::as_f64)
        .filter(|value| value.is_finite())
}

fn visit_count(raw: Option<&Value>, history_len: usize) -> u32 {
    if let Some(count) = raw.and_then(Value::as_f64).filter(|value| value.is_finite()) {
        // Clamp into the valid domain; a stored 0 or negative still means one visit.
        let truncated = count.trunc();
        if truncated < 1.0 {
            return DEFAULT_VISIT_COUNT;
        }
        return truncated.min(u32::MAX as f64) as u32;
    }
    if history_len > 0 {
        return u32::try_from(history_len).unwrap_or(u32::MAX);
    }
    DEFAULT_VISIT_COUNT
}
