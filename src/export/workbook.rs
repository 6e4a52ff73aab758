use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ExportOptions;
use crate::constants::export::{
    HEADER_FILL, HEADER_FONT, LEADS_SHEET, SUMMARY_SHEET, WORKBOOK_DATETIME_FORMAT,
    WORKBOOK_FILE_PREFIX, WORKBOOK_TEXT_FORMAT, ZEBRA_FILL,
};
use crate::data::LeadRecord;
use crate::errors::DashboardError;
use crate::export::lead_headers;
use crate::metrics::LeadSummary;
use crate::types::ExportFileName;
use crate::utils::filename_timestamp;

/// Date-only display format for birthday cells.
const WORKBOOK_DATE_FORMAT: &str = "yyyy-mm-dd";
/// Display format for minute columns.
const WORKBOOK_MINUTES_FORMAT: &str = "0";

/// One typed cell value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    /// No value.
    Empty,
    /// Literal text, never coerced to a number.
    Text {
        /// Cell text.
        value: String,
    },
    /// Numeric value.
    Number {
        /// Cell number.
        value: f64,
    },
    /// Spreadsheet serial (days since 1899-12-30) with a display format.
    Date {
        /// Fractional day serial.
        serial: f64,
        /// Display format, e.g. `yyyy-mm-dd hh:mm`.
        format: String,
    },
    /// Hyperlink.
    Link {
        /// Target, e.g. `mailto:` address.
        url: String,
        /// Displayed text.
        text: String,
    },
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text {
            value: value.into(),
        }
    }

    fn number(value: f64) -> Self {
        Cell::Number { value }
    }

    fn optional_text(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::text(value)
        }
    }
}

/// Fill and font applied to a row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    /// Bold font.
    pub bold: bool,
    /// ARGB fill color.
    pub fill: Option<String>,
    /// ARGB font color.
    pub font_color: Option<String>,
}

impl CellStyle {
    fn header() -> Self {
        Self {
            bold: true,
            fill: Some(HEADER_FILL.to_string()),
            font_color: Some(HEADER_FONT.to_string()),
        }
    }
}

/// Column header, width (in characters) and default number format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Header text.
    pub header: String,
    /// Width in characters.
    pub width: f64,
    /// Number format applied to the column's cells.
    pub format: Option<String>,
}

impl Column {
    fn new(header: &str, width: f64, format: Option<&str>) -> Self {
        Self {
            header: header.to_string(),
            width,
            format: format.map(str::to_string),
        }
    }
}

/// Zero-based inclusive cell range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    /// Top row.
    pub first_row: u32,
    /// Leftmost column.
    pub first_col: u16,
    /// Bottom row.
    pub last_row: u32,
    /// Rightmost column.
    pub last_col: u16,
}

impl CellRange {
    /// A1-style reference, e.g. `A1:I51`.
    pub fn to_a1(&self) -> String {
        format!(
            "{}{}:{}{}",
            column_letters(self.first_col),
            self.first_row + 1,
            column_letters(self.last_col),
            self.last_row + 1
        )
    }
}

/// A worksheet: header row, typed data rows and presentation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// Tab name.
    pub name: String,
    /// Header row definition.
    pub columns: Vec<Column>,
    /// Data rows, one cell per column.
    pub rows: Vec<Vec<Cell>>,
    /// Style of the header row.
    pub header_style: CellStyle,
    /// Fill for every other data row, starting with the second.
    pub zebra_fill: Option<String>,
    /// Keep the header row visible while scrolling.
    pub freeze_header: bool,
    /// Range covered by the autofilter, header included.
    pub autofilter: Option<CellRange>,
}

impl Sheet {
    /// Style for data row `row_idx` (zero-based, excluding the header).
    pub fn row_style(&self, row_idx: usize) -> Option<CellStyle> {
        if row_idx % 2 == 1 {
            self.zebra_fill.as_ref().map(|fill| CellStyle {
                bold: false,
                fill: Some(fill.clone()),
                font_color: None,
            })
        } else {
            None
        }
    }
}

/// Workbook model plus its suggested filename.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    /// `Leads_<timestamp>.xlsx`.
    pub file_name: ExportFileName,
    /// Sheets in tab order.
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

/// Build the "Resumen" + "Leads" workbook for the visible rows.
pub fn build_workbook(
    records: &[LeadRecord],
    summary: &LeadSummary,
    options: &ExportOptions,
    now: DateTime<Utc>,
) -> Result<Workbook, DashboardError> {
    if records.is_empty() {
        return Err(DashboardError::NothingToExport);
    }
    Ok(Workbook {
        file_name: format!("{WORKBOOK_FILE_PREFIX}{}.xlsx", filename_timestamp(&now)),
        sheets: vec![summary_sheet(summary), leads_sheet(records, options)],
    })
}

fn summary_sheet(summary: &LeadSummary) -> Sheet {
    let mut rows = vec![
        vec![Cell::text("Total leads"), Cell::number(summary.total as f64)],
        vec![Cell::text("Nuevos"), Cell::number(summary.new_count as f64)],
        vec![
            Cell::text("Recurrentes"),
            Cell::number(summary.returning_count as f64),
        ],
        vec![
            Cell::text("Visitas totales"),
            Cell::number(summary.total_visits as f64),
        ],
        vec![
            Cell::text("Estancia promedio (min)"),
            summary
                .average_stay_rounded()
                .map(|value| Cell::number(value as f64))
                .unwrap_or(Cell::Empty),
        ],
    ];

    rows.push(vec![Cell::Empty, Cell::Empty]);
    rows.push(vec![Cell::text("Visitas por día"), Cell::Empty]);
    for entry in &summary.visits_by_day {
        rows.push(vec![
            Cell::text(entry.day.clone()),
            Cell::number(entry.visits as f64),
        ]);
    }

    rows.push(vec![Cell::Empty, Cell::Empty]);
    rows.push(vec![Cell::text("Leads por fuente"), Cell::Empty]);
    for entry in &summary.leads_by_source {
        rows.push(vec![
            Cell::text(entry.source.clone()),
            Cell::number(entry.leads as f64),
        ]);
    }

    rows.push(vec![Cell::Empty, Cell::Empty]);
    rows.push(vec![Cell::text("Cumpleaños por mes"), Cell::Empty]);
    for (label, count) in summary.labeled_birth_months() {
        rows.push(vec![Cell::text(label), Cell::number(count as f64)]);
    }

    Sheet {
        name: SUMMARY_SHEET.to_string(),
        columns: vec![
            Column::new("Indicador", 28.0, None),
            Column::new("Valor", 14.0, None),
        ],
        rows,
        header_style: CellStyle::header(),
        zebra_fill: None,
        freeze_header: true,
        autofilter: None,
    }
}

fn leads_sheet(records: &[LeadRecord], options: &ExportOptions) -> Sheet {
    let headers = lead_headers(options);
    let widths = [28.0, 32.0, 16.0, 12.0, 18.0, 14.0, 10.0, 18.0, 12.0];
    let formats = [
        None,
        None,
        Some(WORKBOOK_TEXT_FORMAT),
        Some(WORKBOOK_DATE_FORMAT),
        Some(WORKBOOK_DATETIME_FORMAT),
        None,
        None,
        Some(WORKBOOK_DATETIME_FORMAT),
        Some(WORKBOOK_MINUTES_FORMAT),
    ];
    let columns: Vec<Column> = headers
        .iter()
        .zip(widths)
        .zip(formats)
        .map(|((header, width), format)| Column::new(header, width, format))
        .collect();

    let rows: Vec<Vec<Cell>> = records
        .iter()
        .map(|record| lead_row(record, options))
        .collect();

    let last_col = u16::try_from(columns.len().saturating_sub(1)).unwrap_or(u16::MAX);
    let last_row = u32::try_from(rows.len()).unwrap_or(u32::MAX);
    Sheet {
        name: LEADS_SHEET.to_string(),
        columns,
        rows,
        header_style: CellStyle::header(),
        zebra_fill: Some(ZEBRA_FILL.to_string()),
        freeze_header: true,
        autofilter: Some(CellRange {
            first_row: 0,
            first_col: 0,
            last_row,
            last_col,
        }),
    }
}

fn lead_row(record: &LeadRecord, options: &ExportOptions) -> Vec<Cell> {
    let mut row = vec![
        Cell::optional_text(&record.full_name),
        if record.email.is_empty() {
            Cell::Empty
        } else {
            Cell::Link {
                url: format!("mailto:{}", record.email),
                text: record.email.clone(),
            }
        },
        Cell::optional_text(&record.phone),
        birthday_cell(&record.birthday),
        datetime_cell(record.created_at, options),
        Cell::text(record.source_or_default()),
    ];
    if options.include_visit_columns {
        row.push(Cell::number(f64::from(record.visit_count)));
        row.push(datetime_cell(record.last_visit, options));
        row.push(
            record
                .last_session_minutes
                .map(Cell::number)
                .unwrap_or(Cell::Empty),
        );
    }
    row
}

fn birthday_cell(birthday: &str) -> Cell {
    match NaiveDate::parse_from_str(birthday, "%Y-%m-%d") {
        Ok(date) => Cell::Date {
            serial: spreadsheet_serial(date.and_time(chrono::NaiveTime::MIN)),
            format: WORKBOOK_DATE_FORMAT.to_string(),
        },
        Err(_) => Cell::optional_text(birthday),
    }
}

fn datetime_cell(value: Option<DateTime<Utc>>, options: &ExportOptions) -> Cell {
    match value {
        Some(value) => Cell::Date {
            serial: spreadsheet_serial(value.with_timezone(&options.timezone).naive_local()),
            format: WORKBOOK_DATETIME_FORMAT.to_string(),
        },
        None => Cell::Empty,
    }
}

/// Days since 1899-12-30 with the time of day as a fraction.
pub fn spreadsheet_serial(value: NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .map(|date| date.and_time(chrono::NaiveTime::MIN))
        .unwrap_or_default();
    let elapsed = value - epoch;
    elapsed.num_milliseconds() as f64 / 86_400_000.0
}

fn column_letters(col: u16) -> String {
    let mut n = u32::from(col) + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
