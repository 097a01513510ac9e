use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    EntityNotFound(String),
    #[error("El espacio está {state}")]
    SpaceUnavailable { code: String, state: String },
    #[error("Ya tienes una reserva activa")]
    DuplicateActiveReservation(String),
    /// Another request changed the same rows first. The operation may be retried.
    #[error("El espacio cambió mientras se procesaba la solicitud, inténtalo de nuevo")]
    ConcurrentModification(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("{0}")]
    InvalidRequest(String),
    #[error("transaction could not be executed")]
    TransactionError(#[source] sqlx::Error),
    #[error("database operation failed")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("database migration failed")]
    MigrationError(#[source] sqlx::migrate::MigrateError),
    #[error("No rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("snapshot file could not be read or written")]
    SnapshotIoError(#[source] std::io::Error),
    #[error("snapshot file is malformed")]
    SnapshotFormatError(#[source] serde_json::Error),
    #[error("stored record is invalid: {0}")]
    CorruptRecord(String),
    #[error("uploaded file could not be stored")]
    UploadError(#[source] std::io::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::SpaceUnavailable { .. }
            | AppError::DuplicateActiveReservation(_)
            | AppError::ConcurrentModification(_)
            | AppError::ValidationError(_)
            | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::MigrationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::SnapshotIoError(_)
            | AppError::SnapshotFormatError(_)
            | AppError::CorruptRecord(_)
            | AppError::UploadError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "Unexpected error happened"
            );
            return (status_code, "Error interno del servidor").into_response();
        }
        (status_code, self.to_string()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_rule_violations_are_client_errors() {
        let unavailable = AppError::SpaceUnavailable {
            code: "A1".into(),
            state: "reservado".into(),
        };
        assert_eq!(unavailable.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(unavailable.to_string(), "El espacio está reservado");

        let duplicate = AppError::DuplicateActiveReservation("111".into());
        assert_eq!(duplicate.status_code(), StatusCode::BAD_REQUEST);

        let raced = AppError::ConcurrentModification("could not serialize access".into());
        assert_eq!(raced.status_code(), StatusCode::BAD_REQUEST);
        assert!(!raced.to_string().contains("serialize"));

        let missing = AppError::EntityNotFound("El espacio no existe".into());
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_failures_are_server_errors() {
        let io = AppError::SnapshotIoError(std::io::Error::other("disk full"));
        assert_eq!(io.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let rows = AppError::NoRowsAffectedError("no space updated".into());
        assert_eq!(rows.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
