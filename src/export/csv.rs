use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::ExportOptions;
use crate::constants::export::CSV_FILE_PREFIX;
use crate::data::LeadRecord;
use crate::errors::DashboardError;
use crate::export::lead_headers;
use crate::types::ExportFileName;
use crate::utils::{filename_timestamp, format_datetime};

/// CSV text plus its suggested filename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvExport {
    /// `leads_<timestamp>.csv`.
    pub file_name: ExportFileName,
    /// Header plus rows, `\n`-separated.
    pub contents: String,
}

/// Quote a cell when it contains a comma, quote or newline; inner quotes are doubled.
pub fn csv_cell(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Render header plus one line per record, joined with `\n`.
pub fn render_csv(records: &[LeadRecord], options: &ExportOptions) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(lead_headers(options).join(","));
    for record in records {
        let line = row_values(record, options)
            .iter()
            .map(|value| csv_cell(value))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }
    lines.join("\n")
}

/// Build the CSV export for the visible rows.
///
/// Fails with `NothingToExport` when there are no rows.
pub fn export_csv(
    records: &[LeadRecord],
    options: &ExportOptions,
    now: DateTime<Utc>,
) -> Result<CsvExport, DashboardError> {
    if records.is_empty() {
        return Err(DashboardError::NothingToExport);
    }
    Ok(CsvExport {
        file_name: format!("{CSV_FILE_PREFIX}{}.csv", filename_timestamp(&now)),
        contents: render_csv(records, options),
    })
}

/// Write `export` into `dir` under its suggested filename.
pub fn write_csv(export: &CsvExport, dir: &Path) -> Result<PathBuf, DashboardError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&export.file_name);
    fs::write(&path, export.contents.as_bytes())?;
    info!(
        path = %path.display(),
        bytes = export.contents.len(),
        "[leads:export] csv written"
    );
    Ok(path)
}

fn row_values(record: &LeadRecord, options: &ExportOptions) -> Vec<String> {
    let mut values = vec![
        record.full_name.clone(),
        record.email.clone(),
        record.phone.clone(),
        record.birthday.clone(),
        record
            .created_at
            .map(|value| format_datetime(&value, options.timezone))
            .unwrap_or_default(),
        record.source_or_default().to_string(),
    ];
    if options.include_visit_columns {
        values.push(record.visit_count.to_string());
        values.push(
            record
                .last_visit
                .map(|value| format_datetime(&value, options.timezone))
                .unwrap_or_default(),
        );
        values.push(
            record
                .last_session_minutes
                .map(|value| value.to_string())
                .unwrap_or_default(),
        );
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn cells_with_separators_are_quoted() {
        assert_eq!(csv_cell("plain"), "plain");
        assert_eq!(csv_cell("Jane, \"J\" Doe"), "\"Jane, \"\"J\"\" Doe\"");
        assert_eq!(csv_cell("line\nbreak"), "\"line\nbreak\"");
        assert_eq!(csv_cell(""), "");
    }

    #[test]
    fn renders_header_and_rows() {
        let mut record = LeadRecord::new("1");
        record.full_name = "Jane, \"J\" Doe".into();
        record.email = "jane@x.com".into();
        record.phone = "5512345678".into();
        record.birthday = "1990-05-10".into();
        record.created_at = Some(Utc.with_ymd_and_hms(2025, 3, 14, 18, 22, 5).unwrap());
        record.last_visit = record.created_at;
        record.visit_count = 2;
        record.last_session_minutes = Some(30.0);

        let csv = render_csv(&[record], &ExportOptions::default());
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(
            lines[0],
            "Nombre,Correo,Teléfono,Cumpleaños,Creado,Fuente,Visitas,Última visita,Min. última sesión"
        );
        assert_eq!(
            lines[1],
            "\"Jane, \"\"J\"\" Doe\",jane@x.com,5512345678,1990-05-10,2025-03-14 18:22,webform,2,2025-03-14 18:22,30"
        );
    }

    #[test]
    fn empty_export_is_rejected() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 18, 22, 5).unwrap();
        assert!(matches!(
            export_csv(&[], &ExportOptions::default(), now),
            Err(DashboardError::NothingToExport)
        ));
    }

    #[test]
    fn export_names_file_with_timestamp() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 18, 22, 5).unwrap();
        let export = export_csv(&[LeadRecord::new("1")], &ExportOptions::default(), now).unwrap();
        assert_eq!(export.file_name, "leads_2025-03-14-18-22-05.csv");
    }
}
