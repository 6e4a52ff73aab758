//! Duplicate lead merging.
//!
//! Leads are grouped by identity key (email, else phone, else the record id)
//! and each group is folded left-to-right into the record that first
//! introduced the key. Output keeps first-occurrence order.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::data::{IdentityKey, LeadRecord};

/// Collapse records that share an identity key.
///
/// The input slice is left untouched; merged records are fresh values.
pub fn merge_duplicates(records: &[LeadRecord]) -> Vec<LeadRecord> {
    let mut groups: IndexMap<IdentityKey, LeadRecord> = IndexMap::with_capacity(records.len());
    for record in records {
        match groups.entry(record.identity_key()) {
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
            }
            Entry::Occupied(mut slot) => fold_into(slot.get_mut(), record),
        }
    }
    groups.into_values().collect()
}

/// Fold `incoming` into the group accumulator `acc`.
///
/// `last_session_minutes` is taken from `incoming` when its own last visit is
/// at least as recent as the accumulator's (compared before the accumulator's
/// `last_visit` is updated) and it carries a value. On a timestamp tie the
/// later record wins this field even though `last_visit` keeps the earlier one.
pub fn fold_into(acc: &mut LeadRecord, incoming: &LeadRecord) {
    if acc.full_name.is_empty() {
        acc.full_name = incoming.full_name.clone();
    }
    if acc.source.is_empty() {
        acc.source = incoming.source.clone();
    }
    acc.visit_count = acc.visit_count.saturating_add(incoming.visit_count);
    acc.total_minutes =
        Some(acc.total_minutes.unwrap_or(0.0) + incoming.total_minutes.unwrap_or(0.0));

    let acc_millis = acc.last_visit_millis();
    let incoming_millis = incoming.last_visit_millis();
    if incoming_millis > acc_millis {
        acc.last_visit = incoming.last_visit;
    }
    if incoming_millis >= acc_millis && incoming.last_session_minutes.is_some() {
        acc.last_session_minutes = incoming.last_session_minutes;
    }

    acc.visit_history.extend(incoming.visit_history.iter().cloned());
}
