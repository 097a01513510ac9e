use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use shared::error::{AppError, AppResult};

use crate::memory::{MemoryStore, Tables};

/// Opens the file-backed store. A missing file starts an empty data set.
pub async fn open_file_store(path: impl Into<PathBuf>) -> AppResult<MemoryStore> {
    let snapshot = SnapshotFile::new(path.into());
    let tables = snapshot.load().await?;
    tracing::info!(
        path = %snapshot.path().display(),
        spaces = tables.espacios.len(),
        reservations = tables.reservas.len(),
        reports = tables.reportes.len(),
        "snapshot loaded"
    );
    Ok(MemoryStore::with_snapshot(tables, snapshot))
}

/// JSON document holding every table.
#[derive(Debug)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> AppResult<Tables> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(AppError::SnapshotFormatError),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Tables::default()),
            Err(e) => Err(AppError::SnapshotIoError(e)),
        }
    }

    // Written next to the target and renamed over it, so readers never see a partial document.
    pub async fn save(&self, tables: &Tables) -> AppResult<()> {
        let bytes = serde_json::to_vec_pretty(tables).map_err(AppError::SnapshotFormatError)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(AppError::SnapshotIoError)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(AppError::SnapshotIoError)
    }

    pub async fn is_reachable(&self) -> bool {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        tokio::fs::metadata(dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::{
        model::{
            report::event::CreateReport,
            reservation::event::CreateReservation,
            space::SpaceState,
        },
        repository::{
            health::HealthCheckRepository, parking::ParkingRepository, report::ReportRepository,
            reservation::ReservationLedger, space::SpaceStore,
        },
    };

    #[tokio::test]
    async fn missing_file_opens_empty() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = open_file_store(dir.path().join("db.json")).await?;

        let mut tx = store.begin().await?;
        assert!(SpaceStore::list_all(&mut *tx).await?.is_empty());
        assert!(store.check_db().await);
        Ok(())
    }

    #[tokio::test]
    async fn commits_survive_reopen() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("db.json");

        {
            let store = open_file_store(&path).await?;
            let mut tx = store.begin().await?;
            tx.provision("A1").await?;
            tx.create(CreateReservation::new(
                "111".into(),
                "ABC-123".into(),
                "A1".into(),
                "Ana".into(),
                "TP-001".into(),
                Some("1700000000000-auto.jpg".into()),
            ))
            .await?;
            tx.set_state("A1", SpaceState::Reserved).await?;
            tx.commit().await?;

            store
                .create(CreateReport::new("Luis".into(), None, "Luz rota".into(), None))
                .await?;
        }

        let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path)?)?;
        assert_eq!(raw["espacios"][0]["codigo"], "A1");
        assert_eq!(raw["espacios"][0]["estado"], "reservado");
        assert_eq!(raw["reservas"][0]["dni"], "111");
        assert!(raw["reservas"][0]["hora_entrada"].is_null());
        assert_eq!(raw["reportes"][0]["descripcion"], "Luz rota");

        let reopened = open_file_store(&path).await?;
        {
            let mut tx = reopened.begin().await?;
            let space = tx.get_by_code("A1").await?.unwrap();
            assert_eq!(space.state, SpaceState::Reserved);
            let active = tx.find_active_by_holder("111").await?.unwrap();
            assert_eq!(active.photo_ref.as_deref(), Some("1700000000000-auto.jpg"));
        }
        assert_eq!(reopened.find_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn uncommitted_work_is_not_written() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("db.json");
        let store = open_file_store(&path).await?;

        {
            let mut tx = store.begin().await?;
            tx.provision("A1").await?;
        }

        assert!(!path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn malformed_document_is_rejected() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("db.json");
        std::fs::write(&path, b"{ not json")?;

        let err = open_file_store(&path).await.err().unwrap();
        assert!(matches!(err, AppError::SnapshotFormatError(_)));
        Ok(())
    }
}
