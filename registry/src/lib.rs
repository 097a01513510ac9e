use std::sync::Arc;

use adapter::{
    database::connect_database_with,
    file::open_file_store,
    memory::MemoryStore,
    repository::{
        health::HealthCheckRepositoryImpl, parking::ParkingRepositoryImpl,
        report::ReportRepositoryImpl,
    },
    upload::LocalUploadStore,
};
use kernel::{
    repository::{
        health::HealthCheckRepository, parking::ParkingRepository, report::ReportRepository,
        upload::UploadStore,
    },
    service::{history::HistoryView, occupancy::OccupancyService},
};
use shared::{
    config::{AppConfig, StorageBackend},
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    parking_repository: Arc<dyn ParkingRepository>,
    report_repository: Arc<dyn ReportRepository>,
    upload_store: Arc<dyn UploadStore>,
}

impl AppRegistry {
    pub fn new(
        health_check_repository: Arc<dyn HealthCheckRepository>,
        parking_repository: Arc<dyn ParkingRepository>,
        report_repository: Arc<dyn ReportRepository>,
        upload_store: Arc<dyn UploadStore>,
    ) -> Self {
        Self {
            health_check_repository,
            parking_repository,
            report_repository,
            upload_store,
        }
    }

    // memory and file backends share one store for every repository
    pub fn with_memory_store(store: MemoryStore, upload_store: Arc<dyn UploadStore>) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store.clone(), store, upload_store)
    }

    pub async fn from_config(app_config: &AppConfig) -> AppResult<Self> {
        let upload_store = Arc::new(LocalUploadStore::open(&app_config.upload.dir).await?);

        let registry = match app_config.storage.backend {
            StorageBackend::Memory => Self::with_memory_store(MemoryStore::new(), upload_store),
            StorageBackend::File => Self::with_memory_store(
                open_file_store(&app_config.storage.snapshot_path).await?,
                upload_store,
            ),
            StorageBackend::Postgres => {
                let cfg = app_config.database.as_ref().ok_or_else(|| {
                    AppError::InvalidRequest("postgres backend selected without database settings".into())
                })?;
                let pool = connect_database_with(cfg);
                pool.migrate().await?;
                Self::new(
                    Arc::new(HealthCheckRepositoryImpl::new(pool.clone())),
                    Arc::new(ParkingRepositoryImpl::new(pool.clone())),
                    Arc::new(ReportRepositoryImpl::new(pool)),
                    upload_store,
                )
            }
        };
        tracing::info!(backend = ?app_config.storage.backend, "storage backend ready");
        Ok(registry)
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn occupancy_service(&self) -> OccupancyService {
        OccupancyService::new(self.parking_repository.clone())
    }

    pub fn history_view(&self) -> HistoryView {
        HistoryView::new(self.parking_repository.clone())
    }

    pub fn report_repository(&self) -> Arc<dyn ReportRepository> {
        self.report_repository.clone()
    }

    pub fn upload_store(&self) -> Arc<dyn UploadStore> {
        self.upload_store.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, String)]) -> AppConfig {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[tokio::test]
    async fn file_backend_state_is_shared_across_registries() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&[
            ("STORAGE_BACKEND", "file".into()),
            ("SNAPSHOT_PATH", dir.path().join("db.json").display().to_string()),
            ("UPLOAD_DIR", dir.path().join("uploads").display().to_string()),
        ]);

        let registry = AppRegistry::from_config(&cfg).await.unwrap();
        registry
            .occupancy_service()
            .provision(&cfg.catalog.space_codes)
            .await
            .unwrap();
        assert!(registry.health_check_repository().check_db().await);
        assert!(dir.path().join("uploads").is_dir());

        let reopened = AppRegistry::from_config(&cfg).await.unwrap();
        let spaces = reopened.occupancy_service().list_spaces().await.unwrap();
        assert_eq!(spaces.len(), 10);
    }

    #[tokio::test]
    async fn memory_backend_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&[("UPLOAD_DIR", dir.path().display().to_string())]);

        let registry = AppRegistry::from_config(&cfg).await.unwrap();

        assert!(registry.occupancy_service().list_spaces().await.unwrap().is_empty());
        assert!(registry.history_view().list().await.unwrap().is_empty());
        assert!(registry.report_repository().find_all().await.unwrap().is_empty());
    }
}
