use async_trait::async_trait;
use shared::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Vehicle photo attached to a reservation.
    Photo,
    /// Screenshot attached to a report.
    Screenshot,
}

/// Side storage for uploaded files. Callers keep only the returned reference.
#[async_trait]
pub trait UploadStore: Send + Sync {
    async fn store(&self, kind: UploadKind, original_name: &str, bytes: &[u8]) -> AppResult<String>;
}
