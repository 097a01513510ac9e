use kernel::model::{id::ReportId, report::Report};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ReportRow {
    pub id: i64,
    pub nombre: String,
    pub dni: Option<String>,
    pub descripcion: String,
    pub captura: Option<String>,
}

impl From<ReportRow> for Report {
    fn from(value: ReportRow) -> Self {
        let ReportRow {
            id,
            nombre,
            dni,
            descripcion,
            captura,
        } = value;
        Report {
            report_id: ReportId::new(id),
            reporter_name: nombre,
            holder_id: dni,
            description: descripcion,
            screenshot_ref: captura,
        }
    }
}
