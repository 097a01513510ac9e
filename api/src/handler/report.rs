use axum::{
    extract::{Multipart, State},
    Json,
};
use garde::Validate;
use kernel::repository::upload::UploadKind;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::model::{
    form::MultipartForm,
    report::{ReportResponse, SubmitReportRequest, SubmitReportRequestWithScreenshot},
};

pub async fn submit_report(
    State(registry): State<AppRegistry>,
    multipart: Multipart,
) -> AppResult<&'static str> {
    let mut form = MultipartForm::read(multipart).await?;
    let req = SubmitReportRequest::from(&mut form);
    req.validate(&())?;

    let screenshot_ref = match form.take_file("captura") {
        Some(file) => Some(
            registry
                .upload_store()
                .store(UploadKind::Screenshot, &file.file_name, &file.bytes)
                .await?,
        ),
        None => None,
    };

    let report = registry
        .report_repository()
        .create(SubmitReportRequestWithScreenshot::new(req, screenshot_ref).into())
        .await?;
    tracing::info!(report_id = %report.report_id, "report received");

    Ok("Reporte enviado correctamente")
}

pub async fn show_report_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<ReportResponse>>> {
    registry
        .report_repository()
        .find_all()
        .await
        .map(|items| items.into_iter().map(ReportResponse::from).collect())
        .map(Json)
}
