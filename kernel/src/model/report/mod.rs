use crate::model::id::ReportId;

pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub report_id: ReportId,
    pub reporter_name: String,
    pub holder_id: Option<String>,
    pub description: String,
    pub screenshot_ref: Option<String>,
}
