use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::report::{event::CreateReport, Report},
    repository::report::ReportRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{model::report::ReportRow, ConnectionPool};

#[derive(new)]
pub struct ReportRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReportRepository for ReportRepositoryImpl {
    async fn create(&self, event: CreateReport) -> AppResult<Report> {
        sqlx::query_as::<_, ReportRow>(
            r#"
                INSERT INTO reportes (nombre, dni, descripcion, captura)
                VALUES ($1, $2, $3, $4)
                RETURNING id, nombre, dni, descripcion, captura
            "#,
        )
        .bind(event.reporter_name)
        .bind(event.holder_id)
        .bind(event.description)
        .bind(event.screenshot_ref)
        .fetch_one(self.db.inner_ref())
        .await
        .map(Report::from)
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_all(&self) -> AppResult<Vec<Report>> {
        sqlx::query_as::<_, ReportRow>(
            r#"
                SELECT id, nombre, dni, descripcion, captura
                FROM reportes
                ORDER BY id ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Report::from).collect())
        .map_err(AppError::SpecificOperationError)
    }
}
