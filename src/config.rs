use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

use crate::constants::pager::DEFAULT_PAGE_SIZE;
use crate::errors::DashboardError;
use crate::types::MonthKey;

/// Inclusive calendar-date range applied to `createdAt` by the store query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    /// First day included (from 00:00:00).
    pub from: Option<NaiveDate>,
    /// Last day included (through 23:59:59).
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Range with both ends open.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Resolve the calendar days into instants in `timezone`.
    ///
    /// `from` maps to the start of its day and `to` to `23:59:59` of its day.
    pub fn bounds(
        &self,
        timezone: FixedOffset,
    ) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let start = self
            .from
            .and_then(|day| at_local(timezone, day, NaiveTime::from_hms_opt(0, 0, 0)));
        let end = self
            .to
            .and_then(|day| at_local(timezone, day, NaiveTime::from_hms_opt(23, 59, 59)));
        (start, end)
    }
}

fn at_local(
    timezone: FixedOffset,
    day: NaiveDate,
    time: Option<NaiveTime>,
) -> Option<DateTime<Utc>> {
    let naive = day.and_time(time?);
    timezone
        .from_local_datetime(&naive)
        .single()
        .map(|value| value.with_timezone(&Utc))
}

/// Client-side filters chosen in the dashboard toolbar.
#[derive(Clone, Debug, Default)]
pub struct FilterOptions {
    /// Free-text search over name, email and phone. Empty disables it.
    pub query: String,
    /// Store-side date range over `createdAt`.
    pub range: DateRange,
    /// Two-digit birth month (`"01"`..`"12"`); `None` disables the filter.
    pub birth_month: Option<MonthKey>,
    /// Collapse leads sharing an identity key.
    pub merge_duplicates: bool,
    /// Keep only leads with at least the frequency threshold of visits.
    pub only_frequent: bool,
    /// Raw threshold text as typed; malformed input falls back to 2.
    pub frequency_threshold: Option<String>,
}

/// Options shared by the CSV and workbook exports.
#[derive(Clone, Copy, Debug)]
pub struct ExportOptions {
    /// Offset used when rendering date-time cells.
    pub timezone: FixedOffset,
    /// Append the visit columns (count, last visit, last session minutes).
    pub include_visit_columns: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            timezone: utc_offset(),
            include_visit_columns: true,
        }
    }
}

/// Top-level dashboard configuration.
#[derive(Clone, Debug)]
pub struct DashboardConfig {
    /// Collection holding the lead documents; the session's store must serve it.
    pub collection: String,
    /// Documents requested per page.
    pub page_size: usize,
    /// Offset used to resolve date-range days and render date-time cells.
    pub timezone: FixedOffset,
    /// Include the visit columns in tables and exports.
    pub include_visit_columns: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            collection: "leads".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timezone: utc_offset(),
            include_visit_columns: true,
        }
    }
}

impl DashboardConfig {
    /// Validate settings that would make paging meaningless.
    pub fn validated(self) -> Result<Self, DashboardError> {
        if self.page_size == 0 {
            return Err(DashboardError::Configuration(
                "page_size must be at least 1".to_string(),
            ));
        }
        if self.collection.trim().is_empty() {
            return Err(DashboardError::Configuration(
                "collection name must not be empty".to_string(),
            ));
        }
        Ok(self)
    }

    /// Export options derived from this configuration.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            timezone: self.timezone,
            include_visit_columns: self.include_visit_columns,
        }
    }
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_bounds_cover_whole_days() {
        let range = DateRange {
            from: NaiveDate::from_ymd_opt(2025, 3, 1),
            to: NaiveDate::from_ymd_opt(2025, 3, 2),
        };
        let (start, end) = range.bounds(utc_offset());
        assert_eq!(
            start.unwrap().to_rfc3339(),
            "2025-03-01T00:00:00+00:00".to_string()
        );
        assert_eq!(
            end.unwrap().to_rfc3339(),
            "2025-03-02T23:59:59+00:00".to_string()
        );
    }

    #[test]
    fn date_range_bounds_respect_timezone() {
        let range = DateRange {
            from: NaiveDate::from_ymd_opt(2025, 3, 1),
            to: None,
        };
        let mexico = FixedOffset::west_opt(6 * 3600).unwrap();
        let (start, end) = range.bounds(mexico);
        assert_eq!(
            start.unwrap().to_rfc3339(),
            "2025-03-01T06:00:00+00:00".to_string()
        );
        assert!(end.is_none());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let config = DashboardConfig {
            page_size: 0,
            ..DashboardConfig::default()
        };
        assert!(matches!(
            config.validated(),
            Err(DashboardError::Configuration(_))
        ));
    }
}
