use chrono::SecondsFormat;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::metrics::{MONTH_LABELS, NEW_LABEL, RETURNING_LABEL};
use crate::constants::normalize::DEFAULT_SOURCE;
use crate::data::LeadRecord;
use crate::types::{DayKey, SourceTag};
use crate::utils::parse_leading_u32;

/// Summed visits for one calendar day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayVisits {
    /// `YYYY-MM-DD` of the last visit (UTC).
    pub day: DayKey,
    /// Sum of `visit_count` for that day.
    pub visits: u64,
}

/// Lead count for one source tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCount {
    /// Lower-cased source tag.
    pub source: SourceTag,
    /// Number of leads carrying it.
    pub leads: usize,
}

/// KPIs and grouped series for a filtered (and possibly merged) record set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeadSummary {
    /// Number of records summarized.
    pub total: usize,
    /// Leads with at most one visit.
    pub new_count: usize,
    /// Leads with more than one visit.
    pub returning_count: usize,
    /// Sum of `visit_count`.
    pub total_visits: u64,
    /// Mean of positive `total_minutes`; `None` when no record has one.
    pub average_stay_minutes: Option<f64>,
    /// Ascending by day label.
    pub visits_by_day: Vec<DayVisits>,
    /// Lower-cased source tags in first-seen order.
    pub leads_by_source: Vec<SourceCount>,
    /// Index 0 is January.
    pub birth_months: [usize; 12],
}

impl LeadSummary {
    /// Compute every KPI and series in one pass.
    pub fn from_records(records: &[LeadRecord]) -> Self {
        let total = records.len();
        let mut new_count = 0usize;
        let mut total_visits = 0u64;
        let mut stay_sum = 0.0f64;
        let mut stay_samples = 0usize;
        let mut by_day: BTreeMap<DayKey, u64> = BTreeMap::new();
        let mut by_source: IndexMap<SourceTag, usize> = IndexMap::new();
        let mut birth_months = [0usize; 12];

        for record in records {
            if record.is_new() {
                new_count += 1;
            }
            total_visits += u64::from(record.visit_count);

            if let Some(minutes) = record.total_minutes.filter(|value| *value > 0.0) {
                stay_sum += minutes;
                stay_samples += 1;
            }

            if let Some(created_at) = record.created_at {
                let iso = created_at.to_rfc3339_opts(SecondsFormat::Secs, true);
                let day: DayKey = iso.chars().take(10).collect();
                *by_day.entry(day).or_insert(0) += u64::from(record.visit_count);
            }

            *by_source
                .entry(source_label(&record.source))
                .or_insert(0) += 1;

            if let Some(month) = birth_month_index(&record.birthday) {
                birth_months[month] += 1;
            }
        }

        let average_stay_minutes = if stay_samples == 0 {
            None
        } else {
            Some(stay_sum / stay_samples as f64)
        };

        Self {
            total,
            new_count,
            returning_count: total - new_count,
            total_visits,
            average_stay_minutes,
            visits_by_day: by_day
                .into_iter()
                .map(|(day, visits)| DayVisits { day, visits })
                .collect(),
            leads_by_source: by_source
                .into_iter()
                .map(|(source, leads)| SourceCount { source, leads })
                .collect(),
            birth_months,
        }
    }

    /// Average stay rounded half away from zero, as the KPI tile shows it.
    pub fn average_stay_rounded(&self) -> Option<i64> {
        self.average_stay_minutes.map(|value| value.round() as i64)
    }

    /// `[("Nuevos", n), ("Recurrentes", r)]`.
    pub fn new_vs_returning(&self) -> [(&'static str, usize); 2] {
        [
            (NEW_LABEL, self.new_count),
            (RETURNING_LABEL, self.returning_count),
        ]
    }

    /// Birth-month histogram paired with short Spanish month labels.
    pub fn labeled_birth_months(&self) -> Vec<(&'static str, usize)> {
        MONTH_LABELS
            .iter()
            .copied()
            .zip(self.birth_months.iter().copied())
            .collect()
    }
}

fn source_label(source: &str) -> SourceTag {
    if source.is_empty() {
        DEFAULT_SOURCE.to_string()
    } else {
        source.to_lowercase()
    }
}

/// Zero-based month bucket for a `YYYY-MM-DD` birthday, if in range.
fn birth_month_index(birthday: &str) -> Option<usize> {
    if birthday.is_empty() {
        return None;
    }
    let month = parse_leading_u32(birthday.split('-').nth(1)?)?;
    if (1..=12).contains(&month) {
        Some(month as usize - 1)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn lead(id: &str, visits: u32) -> LeadRecord {
        let mut record = LeadRecord::new(id);
        record.visit_count = visits;
        record
    }

    #[test]
    fn counts_new_returning_and_visits() {
        let summary = LeadSummary::from_records(&[lead("1", 1), lead("2", 3), lead("3", 1)]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.new_count, 2);
        assert_eq!(summary.returning_count, 1);
        assert_eq!(summary.total_visits, 5);
        assert_eq!(
            summary.new_vs_returning(),
            [("Nuevos", 2), ("Recurrentes", 1)]
        );
    }

    #[test]
    fn average_stay_uses_positive_minutes_only() {
        let minutes = [Some(0.0), None, Some(20.0), Some(40.0)];
        let records: Vec<LeadRecord> = minutes
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                let mut record = lead(&idx.to_string(), 1);
                record.total_minutes = *value;
                record
            })
            .collect();
        let summary = LeadSummary::from_records(&records);
        assert_eq!(summary.average_stay_minutes, Some(30.0));
        assert_eq!(summary.average_stay_rounded(), Some(30));
    }

    #[test]
    fn average_stay_is_none_without_samples() {
        let summary = LeadSummary::from_records(&[lead("1", 1)]);
        assert_eq!(summary.average_stay_minutes, None);
        let empty = LeadSummary::from_records(&[]);
        assert_eq!(empty.total, 0);
        assert_eq!(empty.average_stay_minutes, None);
    }

    #[test]
    fn visits_by_day_sums_counts_and_sorts_ascending() {
        let mut late = lead("1", 2);
        late.created_at = Some(Utc.with_ymd_and_hms(2025, 3, 2, 23, 0, 0).unwrap());
        let mut early = lead("2", 1);
        early.created_at = Some(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
        let mut same_day = lead("3", 4);
        same_day.created_at = Some(Utc.with_ymd_and_hms(2025, 3, 2, 1, 0, 0).unwrap());
        let undated = lead("4", 9);

        let summary = LeadSummary::from_records(&[late, early, same_day, undated]);
        assert_eq!(
            summary.visits_by_day,
            vec![
                DayVisits {
                    day: "2025-03-01".into(),
                    visits: 1
                },
                DayVisits {
                    day: "2025-03-02".into(),
                    visits: 6
                },
            ]
        );
    }

    #[test]
    fn sources_are_lowercased_with_default_in_insertion_order() {
        let mut a = lead("1", 1);
        a.source = "Instagram".into();
        let b = lead("2", 1);
        let mut c = lead("3", 1);
        c.source = "instagram".into();
        let summary = LeadSummary::from_records(&[a, b, c]);
        assert_eq!(
            summary.leads_by_source,
            vec![
                SourceCount {
                    source: "instagram".into(),
                    leads: 2
                },
                SourceCount {
                    source: "webform".into(),
                    leads: 1
                },
            ]
        );
    }

    #[test]
    fn birth_month_histogram_ignores_out_of_range() {
        let birthdays = ["1990-01-05", "1991-12-31", "1992-13-01", "bad", "", "1993-00-10"];
        let records: Vec<LeadRecord> = birthdays
            .iter()
            .enumerate()
            .map(|(idx, birthday)| {
                let mut record = lead(&idx.to_string(), 1);
                record.birthday = birthday.to_string();
                record
            })
            .collect();
        let summary = LeadSummary::from_records(&records);
        assert_eq!(summary.birth_months[0], 1);
        assert_eq!(summary.birth_months[11], 1);
        assert_eq!(summary.birth_months.iter().sum::<usize>(), 2);
        assert_eq!(summary.labeled_birth_months()[0], ("Ene", 1));
        assert_eq!(summary.labeled_birth_months()[11], ("Dic", 1));
    }
}
