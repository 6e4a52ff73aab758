/// Constants used by the record normalizer and presentation fallbacks.
pub mod normalize {
    /// Source tag substituted when a lead carries none.
    pub const DEFAULT_SOURCE: &str = "webform";
    /// Visit count assumed when a document has neither a count nor a history.
    pub const DEFAULT_VISIT_COUNT: u32 = 1;
    /// Raw document field names.
    pub const FIELD_FULL_NAME: &str = "fullName";
    /// Raw document email field.
    pub const FIELD_EMAIL: &str = "email";
    /// Raw document phone field.
    pub const FIELD_PHONE: &str = "phone";
    /// Raw document birthday field (`YYYY-MM-DD`).
    pub const FIELD_BIRTHDAY: &str = "birthday";
    /// Raw document creation timestamp field.
    pub const FIELD_CREATED_AT: &str = "createdAt";
    /// Raw document source tag field.
    pub const FIELD_SOURCE: &str = "source";
    /// Raw document visit counter field.
    pub const FIELD_VISIT_COUNT: &str = "visitCount";
    /// Raw document last-visit timestamp field.
    pub const FIELD_LAST_VISIT: &str = "lastVisit";
    /// Raw document minutes of the latest session.
    pub const FIELD_LAST_SESSION_MINUTES: &str = "lastSessionMinutes";
    /// Raw document accumulated minutes.
    pub const FIELD_TOTAL_MINUTES: &str = "totalMinutes";
    /// Raw document visit history array.
    pub const FIELD_VISIT_HISTORY: &str = "visitHistory";
}

/// Constants used by the client-side filter engine.
pub mod filters {
    /// Lowest frequency threshold ever applied; a frequent lead always has 2+ visits.
    pub const MIN_FREQUENCY_THRESHOLD: u32 = 2;
}

/// Constants used by the cursor pager.
pub mod pager {
    /// Documents requested per page.
    pub const DEFAULT_PAGE_SIZE: usize = 50;
}

/// Constants used by the access gate.
pub mod auth {
    /// The only role that may open the dashboard.
    pub const MANAGER_ROLE: &str = "manager";
    /// Notice shown when the signed-in user lacks the manager role.
    pub const ACCESS_DENIED_NOTICE: &str =
        "No tienes permisos para ver este panel. Contacta a Sistemas.";
    /// Notice shown when the role lookup itself fails.
    pub const ROLE_CHECK_FAILED_NOTICE: &str = "Error verificando permisos.";
}

/// Constants used by the dashboard session.
pub mod dashboard {
    /// Generic notice shown when a page fetch fails.
    pub const LOAD_FAILED_NOTICE: &str = "Error al cargar datos.";
    /// Notice shown when an export is requested with no visible rows.
    pub const NOTHING_TO_EXPORT_NOTICE: &str = "No hay datos para exportar.";
    /// Table placeholder for an empty page.
    pub const EMPTY_TABLE_TEXT: &str = "Sin datos";
}

/// Constants used by the summary aggregator.
pub mod metrics {
    /// Short month labels for the birth-month histogram.
    pub const MONTH_LABELS: [&str; 12] = [
        "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
    ];
    /// Labels of the new-vs-returning series.
    pub const NEW_LABEL: &str = "Nuevos";
    /// Label for leads with more than one visit.
    pub const RETURNING_LABEL: &str = "Recurrentes";
}

/// Constants used by CSV and workbook exports.
pub mod export {
    /// Base CSV/table headers.
    pub const BASE_HEADERS: [&str; 6] = [
        "Nombre",
        "Correo",
        "Teléfono",
        "Cumpleaños",
        "Creado",
        "Fuente",
    ];
    /// Visit-related headers appended when extended columns are enabled.
    pub const VISIT_HEADERS: [&str; 3] = ["Visitas", "Última visita", "Min. última sesión"];
    /// CSV filename prefix.
    pub const CSV_FILE_PREFIX: &str = "leads_";
    /// Workbook filename prefix.
    pub const WORKBOOK_FILE_PREFIX: &str = "Leads_";
    /// Name of the KPI/series sheet.
    pub const SUMMARY_SHEET: &str = "Resumen";
    /// Name of the full table sheet.
    pub const LEADS_SHEET: &str = "Leads";
    /// Display format for date-time cells in the table.
    pub const TABLE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";
    /// Spreadsheet number format applied to date serial cells.
    pub const WORKBOOK_DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm";
    /// Spreadsheet number format that keeps phone digits as text.
    pub const WORKBOOK_TEXT_FORMAT: &str = "@";
    /// Header fill color (ARGB).
    pub const HEADER_FILL: &str = "FF1F2937";
    /// Header font color (ARGB).
    pub const HEADER_FONT: &str = "FFFFFFFF";
    /// Fill applied to every other data row (ARGB).
    pub const ZEBRA_FILL: &str = "FFF3F4F6";
}
