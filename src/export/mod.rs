//! Export artifacts for the rows currently shown: CSV text and a typed
//! workbook model. Byte-level spreadsheet writing happens downstream.

use crate::config::ExportOptions;
use crate::constants::export::{BASE_HEADERS, VISIT_HEADERS};

/// CSV rendering and file output.
pub mod csv;
/// Two-sheet workbook model.
pub mod workbook;

pub use csv::{CsvExport, csv_cell, export_csv, render_csv, write_csv};
pub use workbook::{Cell, CellRange, CellStyle, Column, Sheet, Workbook, build_workbook};

/// Table headers for the lead rows, honoring the visit-column option.
pub fn lead_headers(options: &ExportOptions) -> Vec<&'static str> {
    let mut headers: Vec<&'static str> = BASE_HEADERS.to_vec();
    if options.include_visit_columns {
        headers.extend(VISIT_HEADERS);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visit_columns_are_optional() {
        let mut options = ExportOptions::default();
        assert_eq!(lead_headers(&options).len(), 9);
        options.include_visit_columns = false;
        assert_eq!(
            lead_headers(&options),
            vec!["Nombre", "Correo", "Teléfono", "Cumpleaños", "Creado", "Fuente"]
        );
    }
}
