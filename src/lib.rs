#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Access gate (identity + role lookup).
pub mod auth;
/// Dashboard configuration types.
pub mod config;
/// Centralized constants used across normalizer, filters, pager and exports.
pub mod constants;
/// Dashboard session wiring pager, filters and summaries.
pub mod dashboard;
/// Lead record types.
pub mod data;
/// CSV and workbook exports.
pub mod export;
/// Client-side filter engine.
pub mod filters;
/// Duplicate lead merging.
pub mod merge;
/// KPI and grouped-series aggregation.
pub mod metrics;
/// Raw document normalization.
pub mod normalize;
/// Cursor pager state machine and driver.
pub mod pager;
/// Lead store interfaces and the in-memory store.
pub mod source;
/// Shared type aliases.
pub mod types;
/// Text and time formatting helpers.
pub mod utils;

mod errors;

pub use auth::{AccessDecision, Identity, RoleDirectory, check_access};
pub use config::{DashboardConfig, DateRange, ExportOptions, FilterOptions};
pub use dashboard::{Dashboard, DashboardView, LoadOutcome, user_notice};
pub use data::{LeadRecord, VisitEntry};
pub use errors::DashboardError;
pub use export::{CsvExport, Workbook, build_workbook, export_csv, render_csv, write_csv};
pub use filters::{apply_filters, frequency_threshold};
pub use merge::merge_duplicates;
pub use metrics::{DayVisits, LeadSummary, SourceCount};
pub use normalize::{normalize_document, normalize_documents, normalize_value};
pub use pager::{CursorPager, Direction, LoadedPage, Navigation, PagePlan, PagerState, Transition};
pub use source::{
    DocumentCursor, InMemoryLeadStore, LeadStore, PageQuery, PageSnapshot, StartPosition,
    StoredDocument,
};
pub use types::{
    DayKey, ExportFileName, IdentityKey, LeadId, MonthKey, NoticeText, RoleName, SourceTag, UserId,
};
