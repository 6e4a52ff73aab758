/// Stable identifier of the stored lead document.
/// Example: `3kq9Z2vXbR0aLx1`
pub type LeadId = String;
/// Key used to decide whether two leads are the same person.
/// Examples: `ana@example.com`, `+5215512345678`, `3kq9Z2vXbR0aLx1`
pub type IdentityKey = String;
/// Free-text origin tag of a lead.
/// Examples: `webform`, `instagram`, `recepcion`
pub type SourceTag = String;
/// Two-digit month string used by the birth-month filter.
/// Examples: `01`, `05`, `12`
pub type MonthKey = String;
/// Calendar day label used by the visits-per-day series.
/// Example: `2025-03-14`
pub type DayKey = String;
/// Identity-provider user id used for role lookups.
/// Example: `Qm4x7TzP0hW2`
pub type UserId = String;
/// Role string returned by the role directory.
/// Examples: `manager`, `staff`
pub type RoleName = String;
/// User-facing notice text.
/// Examples: `Error al cargar datos.`, `No hay datos para exportar.`
pub type NoticeText = String;
/// Suggested download filename for an export.
/// Examples: `leads_2025-03-14-18-22-05.csv`, `Leads_2025-03-14-18-22-05.xlsx`
pub type ExportFileName = String;
