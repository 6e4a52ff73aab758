use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::normalize::DEFAULT_SOURCE;

pub use crate::types::{IdentityKey, LeadId, SourceTag};

/// One entry of a lead's visit history. Opaque beyond its presence and order.
pub type VisitEntry = serde_json::Value;

/// Canonical lead record produced by the normalizer.
///
/// Every downstream stage (filters, merge, summaries, exports) assumes this
/// shape and never looks at raw documents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Identifier of the stored document this record came from.
    pub id: LeadId,
    /// Display name as captured; may be empty.
    pub full_name: String,
    /// Trimmed, lower-cased email; may be empty.
    pub email: String,
    /// Phone with all whitespace removed; may be empty.
    pub phone: String,
    /// `YYYY-MM-DD` or empty.
    pub birthday: String,
    /// First time the lead was observed.
    pub created_at: Option<DateTime<Utc>>,
    /// Origin tag; empty when the document had none.
    pub source: SourceTag,
    /// Number of visits, at least 1 for normalized records.
    pub visit_count: u32,
    /// Most recent visit, falling back to `created_at`.
    pub last_visit: Option<DateTime<Utc>>,
    /// Minutes spent in the latest session.
    pub last_session_minutes: Option<f64>,
    /// Minutes accumulated over all sessions.
    pub total_minutes: Option<f64>,
    /// Ordered visit history.
    pub visit_history: Vec<VisitEntry>,
}

impl LeadRecord {
    /// Create an empty record for `id` with normalization defaults applied.
    pub fn new(id: impl Into<LeadId>) -> Self {
        Self {
            id: id.into(),
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            birthday: String::new(),
            created_at: None,
            source: String::new(),
            visit_count: 1,
            last_visit: None,
            last_session_minutes: None,
            total_minutes: None,
            visit_history: Vec::new(),
        }
    }

    /// Merge key: email, else phone, else the record's own id.
    pub fn identity_key(&self) -> IdentityKey {
        if !self.email.is_empty() {
            self.email.clone()
        } else if !self.phone.is_empty() {
            self.phone.clone()
        } else {
            self.id.clone()
        }
    }

    /// Source tag with the `webform` fallback used by tables, charts and exports.
    pub fn source_or_default(&self) -> &str {
        if self.source.is_empty() {
            DEFAULT_SOURCE
        } else {
            &self.source
        }
    }

    /// Month component of `birthday` exactly as stored (`"05"` for `2000-05-10`).
    pub fn birth_month(&self) -> Option<&str> {
        self.birthday.split('-').nth(1)
    }

    /// Epoch milliseconds of `last_visit`, with absent treated as epoch 0.
    pub fn last_visit_millis(&self) -> i64 {
        self.last_visit
            .map(|value| value.timestamp_millis())
            .unwrap_or(0)
    }

    /// `true` when the lead has at most one visit.
    pub fn is_new(&self) -> bool {
        self.visit_count <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_key_prefers_email_then_phone_then_id() {
        let mut record = LeadRecord::new("doc-1");
        assert_eq!(record.identity_key(), "doc-1");
        record.phone = "5512345678".into();
        assert_eq!(record.identity_key(), "5512345678");
        record.email = "ana@example.com".into();
        assert_eq!(record.identity_key(), "ana@example.com");
    }

    #[test]
    fn birth_month_reads_second_segment() {
        let mut record = LeadRecord::new("doc-1");
        assert_eq!(record.birth_month(), None);
        record.birthday = "2000-05-10".into();
        assert_eq!(record.birth_month(), Some("05"));
        record.birthday = "garbage".into();
        assert_eq!(record.birth_month(), None);
    }

    #[test]
    fn source_falls_back_to_webform() {
        let mut record = LeadRecord::new("doc-1");
        assert_eq!(record.source_or_default(), "webform");
        record.source = "Instagram".into();
        assert_eq!(record.source_or_default(), "Instagram");
    }
}
