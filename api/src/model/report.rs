use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::ReportId,
    report::{event::CreateReport, Report},
};
use serde::Serialize;

use super::form::MultipartForm;

#[derive(Debug, Validate)]
pub struct SubmitReportRequest {
    #[garde(skip)]
    pub reporter_name: String,
    #[garde(skip)]
    pub holder_id: Option<String>,
    #[garde(length(min = 1))]
    pub description: String,
}

impl From<&mut MultipartForm> for SubmitReportRequest {
    fn from(form: &mut MultipartForm) -> Self {
        Self {
            reporter_name: form.take_text("nombre"),
            holder_id: form.take_optional_text("dni"),
            description: form.take_text("descripcion").trim().to_string(),
        }
    }
}

#[derive(new)]
pub struct SubmitReportRequestWithScreenshot(SubmitReportRequest, Option<String>);

impl From<SubmitReportRequestWithScreenshot> for CreateReport {
    fn from(value: SubmitReportRequestWithScreenshot) -> Self {
        let SubmitReportRequestWithScreenshot(
            SubmitReportRequest {
                reporter_name,
                holder_id,
                description,
            },
            screenshot_ref,
        ) = value;
        CreateReport {
            reporter_name,
            holder_id,
            description,
            screenshot_ref,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub id: ReportId,
    #[serde(rename = "nombre")]
    pub reporter_name: String,
    #[serde(rename = "dni")]
    pub holder_id: Option<String>,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "captura")]
    pub screenshot_ref: Option<String>,
}

impl From<Report> for ReportResponse {
    fn from(value: Report) -> Self {
        let Report {
            report_id,
            reporter_name,
            holder_id,
            description,
            screenshot_ref,
        } = value;
        Self {
            id: report_id,
            reporter_name,
            holder_id,
            description,
            screenshot_ref,
        }
    }
}
