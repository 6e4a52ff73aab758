//! Dashboard session: pager → normalizer → filters → summary.
//!
//! The session owns the pager and the rows currently shown. Store failures
//! are caught here, logged, and turned into a user notice; they never reach
//! the caller as errors and never disturb the committed pager state. Paging
//! failures also keep the shown rows; a filter change clears them up front.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::{DashboardConfig, FilterOptions};
use crate::constants::dashboard::{EMPTY_TABLE_TEXT, LOAD_FAILED_NOTICE, NOTHING_TO_EXPORT_NOTICE};
use crate::data::LeadRecord;
use crate::errors::DashboardError;
use crate::export::{CsvExport, Workbook, build_workbook, export_csv};
use crate::filters::apply_filters;
use crate::metrics::LeadSummary;
use crate::normalize::normalize_documents;
use crate::pager::{CursorPager, Direction, Navigation, PagerState};
use crate::source::LeadStore;
use crate::types::NoticeText;

/// Everything the presentation layer needs to render one page.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardView {
    /// Page number shown in the pager label.
    pub page: usize,
    /// Enabled state of the previous/next buttons.
    pub navigation: Navigation,
    /// Rows after filters and the optional merge.
    pub rows: Vec<LeadRecord>,
    /// KPIs and chart series over `rows`.
    pub summary: LeadSummary,
}

impl DashboardView {
    /// `Página N` label.
    pub fn page_label(&self) -> String {
        format!("Página {}", self.page)
    }

    /// Placeholder text when there is nothing to show.
    pub fn placeholder(&self) -> Option<&'static str> {
        self.rows.is_empty().then_some(EMPTY_TABLE_TEXT)
    }
}

/// Result of a load request.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    /// The page loaded (possibly empty).
    Loaded(DashboardView),
    /// The fetch failed; previous pager state is kept.
    Failed {
        /// User-facing message.
        notice: NoticeText,
    },
}

impl LoadOutcome {
    /// The view when the load succeeded.
    pub fn view(&self) -> Option<&DashboardView> {
        match self {
            LoadOutcome::Loaded(view) => Some(view),
            LoadOutcome::Failed { .. } => None,
        }
    }
}

/// Notice text for an error surfaced to the user.
pub fn user_notice(err: &DashboardError) -> NoticeText {
    match err {
        DashboardError::NothingToExport => NOTHING_TO_EXPORT_NOTICE.to_string(),
        DashboardError::AccessDenied(notice) => notice.clone(),
        _ => LOAD_FAILED_NOTICE.to_string(),
    }
}

/// One admin's dashboard session over a lead store.
pub struct Dashboard<S: LeadStore> {
    config: DashboardConfig,
    filters: FilterOptions,
    pager: CursorPager<S>,
    current_rows: Vec<LeadRecord>,
}

impl<S: LeadStore> Dashboard<S> {
    /// Create a session; fails on invalid configuration or when `store`
    /// serves a different collection than `config.collection`.
    pub fn new(store: S, config: DashboardConfig) -> Result<Self, DashboardError> {
        let config = config.validated()?;
        if store.collection() != config.collection {
            return Err(DashboardError::Configuration(format!(
                "store serves collection '{}' but '{}' is configured",
                store.collection(),
                config.collection
            )));
        }
        let pager = CursorPager::new(store, config.page_size);
        Ok(Self {
            config,
            filters: FilterOptions::default(),
            pager,
            current_rows: Vec::new(),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Filters used by the latest load.
    pub fn filters(&self) -> &FilterOptions {
        &self.filters
    }

    /// Committed pager state.
    pub fn pager_state(&self) -> &PagerState {
        self.pager.state()
    }

    /// Rows currently shown (the export source).
    pub fn current_rows(&self) -> &[LeadRecord] {
        &self.current_rows
    }

    /// Replace the filters, reset paging, and load the first page.
    ///
    /// The new filters stay active even when the fetch fails; the shown rows
    /// are cleared first so exports never mix in rows from older filters.
    pub fn apply_filters(&mut self, filters: FilterOptions) -> LoadOutcome {
        let (created_from, created_to) = filters.range.bounds(self.config.timezone);
        self.filters = filters;
        self.pager.reset(created_from, created_to);
        self.current_rows.clear();
        self.load(Direction::Forward)
    }

    /// Load the next page.
    pub fn next_page(&mut self) -> LoadOutcome {
        self.load(Direction::Forward)
    }

    /// Load the previous page.
    pub fn prev_page(&mut self) -> LoadOutcome {
        self.load(Direction::Backward)
    }

    /// Fetch in `direction` and rebuild the view.
    pub fn load(&mut self, direction: Direction) -> LoadOutcome {
        match self.try_load(direction) {
            Ok(view) => LoadOutcome::Loaded(view),
            Err(err) => {
                warn!(
                    collection = self.pager.store().collection(),
                    ?direction,
                    error = %err,
                    "[leads:dashboard] load failed"
                );
                LoadOutcome::Failed {
                    notice: user_notice(&err),
                }
            }
        }
    }

    fn try_load(&mut self, direction: Direction) -> Result<DashboardView, DashboardError> {
        let loaded = self.pager.load(direction)?;
        let records = normalize_documents(&loaded.documents);
        let rows = apply_filters(records, &self.filters);
        let summary = LeadSummary::from_records(&rows);
        info!(
            page = loaded.page,
            fetched = loaded.documents.len(),
            shown = rows.len(),
            "[leads:dashboard] page ready"
        );
        self.current_rows = rows.clone();
        Ok(DashboardView {
            page: loaded.page,
            navigation: loaded.navigation,
            rows,
            summary,
        })
    }

    /// CSV export of the shown rows.
    pub fn export_csv(&self, now: DateTime<Utc>) -> Result<CsvExport, DashboardError> {
        export_csv(&self.current_rows, &self.config.export_options(), now)
    }

    /// Workbook export of the shown rows and their summary.
    pub fn export_workbook(&self, now: DateTime<Utc>) -> Result<Workbook, DashboardError> {
        let summary = LeadSummary::from_records(&self.current_rows);
        build_workbook(
            &self.current_rows,
            &summary,
            &self.config.export_options(),
            now,
        )
    }
}
