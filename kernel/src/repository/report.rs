use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::report::{event::CreateReport, Report};

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn create(&self, event: CreateReport) -> AppResult<Report>;
    async fn find_all(&self) -> AppResult<Vec<Report>>;
}
