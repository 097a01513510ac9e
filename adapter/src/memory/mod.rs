use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kernel::{
    model::{
        id::ReservationId,
        report::{event::CreateReport, Report},
        reservation::{event::CreateReservation, OpenPhase, Reservation},
        space::{Space, SpaceState},
    },
    repository::{
        health::HealthCheckRepository,
        parking::{ParkingRepository, ParkingTransaction},
        report::ReportRepository,
        reservation::ReservationLedger,
        space::SpaceStore,
    },
};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    database::model::{report::ReportRow, reservation::ReservationRow, space::SpaceRow},
    file::SnapshotFile,
};

/// The whole data set. Serialized as-is by the file backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default)]
    pub espacios: Vec<SpaceRow>,
    #[serde(default)]
    pub reservas: Vec<ReservationRow>,
    #[serde(default)]
    pub reportes: Vec<ReportRow>,
}

impl Tables {
    fn next_space_id(&self) -> i64 {
        self.espacios.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    fn next_reservation_id(&self) -> i64 {
        self.reservas.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    fn next_report_id(&self) -> i64 {
        self.reportes.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    fn reservation_mut(&mut self, reservation_id: ReservationId) -> AppResult<&mut ReservationRow> {
        self.reservas
            .iter_mut()
            .find(|r| r.id == reservation_id.raw())
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("La reserva {reservation_id} no existe"))
            })
    }
}

/// Process-local backend. One mutex guards every table, so transactions run
/// strictly one after another.
///
/// When built through [`crate::file::open_file_store`] each commit is also
/// written to the snapshot file before it becomes visible.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    snapshot: Option<Arc<SnapshotFile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_snapshot(tables: Tables, snapshot: SnapshotFile) -> Self {
        Self {
            tables: Arc::new(Mutex::new(tables)),
            snapshot: Some(Arc::new(snapshot)),
        }
    }

    async fn persist(snapshot: &Option<Arc<SnapshotFile>>, tables: &Tables) -> AppResult<()> {
        match snapshot {
            Some(file) => file.save(tables).await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ParkingRepository for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn ParkingTransaction>> {
        let guard = self.tables.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryTransaction {
            guard,
            staged,
            snapshot: self.snapshot.clone(),
        }))
    }
}

#[async_trait]
impl ReportRepository for MemoryStore {
    async fn create(&self, event: CreateReport) -> AppResult<Report> {
        let mut guard = self.tables.lock().await;
        let mut staged = guard.clone();
        let row = ReportRow {
            id: staged.next_report_id(),
            nombre: event.reporter_name,
            dni: event.holder_id,
            descripcion: event.description,
            captura: event.screenshot_ref,
        };
        staged.reportes.push(row.clone());
        Self::persist(&self.snapshot, &staged).await?;
        *guard = staged;
        Ok(row.into())
    }

    async fn find_all(&self) -> AppResult<Vec<Report>> {
        let guard = self.tables.lock().await;
        let mut rows = guard.reportes.clone();
        rows.sort_by_key(|r| r.id);
        Ok(rows.into_iter().map(Report::from).collect())
    }
}

#[async_trait]
impl HealthCheckRepository for MemoryStore {
    async fn check_db(&self) -> bool {
        match &self.snapshot {
            Some(file) => file.is_reachable().await,
            None => true,
        }
    }
}

/// Holds the table lock for its whole lifetime and edits a private copy.
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
    snapshot: Option<Arc<SnapshotFile>>,
}

#[async_trait]
impl SpaceStore for MemoryTransaction {
    async fn get_by_code(&mut self, code: &str) -> AppResult<Option<Space>> {
        self.staged
            .espacios
            .iter()
            .find(|s| s.codigo == code)
            .cloned()
            .map(Space::try_from)
            .transpose()
    }

    async fn list_all(&mut self) -> AppResult<Vec<Space>> {
        let mut rows = self.staged.espacios.clone();
        rows.sort_by_key(|r| r.id);
        rows.into_iter().map(Space::try_from).collect()
    }

    async fn set_state(&mut self, code: &str, state: SpaceState) -> AppResult<()> {
        let row = self
            .staged
            .espacios
            .iter_mut()
            .find(|s| s.codigo == code)
            .ok_or_else(|| AppError::EntityNotFound("El espacio no existe".into()))?;
        row.estado = state.to_string();
        Ok(())
    }

    async fn provision(&mut self, code: &str) -> AppResult<Space> {
        if let Some(space) = self.get_by_code(code).await? {
            return Ok(space);
        }
        let row = SpaceRow {
            id: self.staged.next_space_id(),
            codigo: code.to_string(),
            estado: SpaceState::Free.to_string(),
        };
        self.staged.espacios.push(row.clone());
        Space::try_from(row)
    }
}

#[async_trait]
impl ReservationLedger for MemoryTransaction {
    async fn find_active_by_holder(&mut self, holder_id: &str) -> AppResult<Option<Reservation>> {
        Ok(self
            .staged
            .reservas
            .iter()
            .find(|r| r.dni == holder_id && r.hora_salida.is_none())
            .cloned()
            .map(Reservation::from))
    }

    async fn find_open_by_space(
        &mut self,
        space_code: &str,
        phase: OpenPhase,
    ) -> AppResult<Option<Reservation>> {
        Ok(self
            .staged
            .reservas
            .iter()
            .filter(|r| r.codigo_espacio == space_code)
            .cloned()
            .map(Reservation::from)
            .filter(|r| r.is_in(phase))
            .max_by_key(|r| r.reservation_id))
    }

    async fn create(&mut self, event: CreateReservation) -> AppResult<Reservation> {
        let row = ReservationRow {
            id: self.staged.next_reservation_id(),
            dni: event.holder_id,
            placa: event.plate,
            codigo_espacio: event.space_code,
            nombre_conductor: event.driver_name,
            tarjeta_propiedad: event.property_card_ref,
            foto: event.photo_ref,
            hora_entrada: None,
            hora_salida: None,
        };
        self.staged.reservas.push(row.clone());
        Ok(row.into())
    }

    async fn mark_entry(&mut self, reservation_id: ReservationId, at: DateTime<Utc>) -> AppResult<()> {
        self.staged.reservation_mut(reservation_id)?.hora_entrada = Some(at);
        Ok(())
    }

    async fn mark_exit(&mut self, reservation_id: ReservationId, at: DateTime<Utc>) -> AppResult<()> {
        self.staged.reservation_mut(reservation_id)?.hora_salida = Some(at);
        Ok(())
    }

    async fn list_all(&mut self) -> AppResult<Vec<Reservation>> {
        let mut rows = self.staged.reservas.clone();
        rows.sort_by_key(|r| r.id);
        Ok(rows.into_iter().map(Reservation::from).collect())
    }
}

#[async_trait]
impl ParkingTransaction for MemoryTransaction {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTransaction {
            mut guard,
            staged,
            snapshot,
        } = *self;
        MemoryStore::persist(&snapshot, &staged).await?;
        *guard = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_event(holder: &str, space: &str) -> CreateReservation {
        CreateReservation::new(
            holder.into(),
            "ABC-123".into(),
            space.into(),
            "Ana".into(),
            "TP-001".into(),
            None,
        )
    }

    #[tokio::test]
    async fn dropped_transaction_discards_changes() -> anyhow::Result<()> {
        let store = MemoryStore::new();

        {
            let mut tx = store.begin().await?;
            tx.provision("A1").await?;
        }

        let mut tx = store.begin().await?;
        assert!(tx.get_by_code("A1").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn committed_changes_are_visible_to_next_transaction() -> anyhow::Result<()> {
        let store = MemoryStore::new();

        let mut tx = store.begin().await?;
        tx.provision("A1").await?;
        tx.provision("A2").await?;
        let created = tx.create(create_event("111", "A1")).await?;
        tx.set_state("A1", SpaceState::Reserved).await?;
        tx.commit().await?;

        let mut tx = store.begin().await?;
        let spaces = SpaceStore::list_all(&mut *tx).await?;
        assert_eq!(spaces.len(), 2);
        assert_eq!(spaces[0].code, "A1");
        assert_eq!(spaces[0].state, SpaceState::Reserved);
        assert_eq!(spaces[1].id.raw(), 2);

        let active = tx.find_active_by_holder("111").await?;
        assert_eq!(active.map(|r| r.reservation_id), Some(created.reservation_id));
        Ok(())
    }

    #[tokio::test]
    async fn provision_keeps_existing_state() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let mut tx = store.begin().await?;
        let first = tx.provision("A1").await?;
        tx.set_state("A1", SpaceState::Occupied).await?;
        let again = tx.provision("A1").await?;

        assert_eq!(first.id, again.id);
        assert_eq!(again.state, SpaceState::Occupied);
        Ok(())
    }

    #[tokio::test]
    async fn open_lookup_follows_phase() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let entered_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();

        let mut tx = store.begin().await?;
        tx.provision("A1").await?;
        let r = tx.create(create_event("111", "A1")).await?;

        let waiting = tx.find_open_by_space("A1", OpenPhase::AwaitingEntry).await?;
        assert_eq!(waiting.map(|r| r.reservation_id), Some(r.reservation_id));
        assert!(tx
            .find_open_by_space("A1", OpenPhase::AwaitingExit)
            .await?
            .is_none());

        tx.mark_entry(r.reservation_id, entered_at).await?;
        assert!(tx
            .find_open_by_space("A1", OpenPhase::AwaitingEntry)
            .await?
            .is_none());
        let parked = tx
            .find_open_by_space("A1", OpenPhase::AwaitingExit)
            .await?
            .unwrap();
        assert_eq!(parked.entry_time, Some(entered_at));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_ids_and_codes_are_not_found() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let mut tx = store.begin().await?;

        let err = tx.set_state("Z9", SpaceState::Occupied).await.unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));

        let err = tx
            .mark_exit(ReservationId::new(42), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn open_transaction_holds_every_table() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let wait = std::time::Duration::from_millis(50);

        let tx = store.begin().await?;
        assert!(tokio::time::timeout(wait, store.find_all()).await.is_err());

        drop(tx);
        let reports = tokio::time::timeout(wait, store.find_all()).await??;
        assert!(reports.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn reports_get_sequential_ids() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let first = ReportRepository::create(
            &store,
            CreateReport::new("Luis".into(), None, "Luz rota".into(), None),
        )
        .await?;
        let second = ReportRepository::create(
            &store,
            CreateReport::new(
                "Eva".into(),
                Some("222".into()),
                "Puerta atascada".into(),
                Some("reporte_1.png".into()),
            ),
        )
        .await?;

        assert_eq!(first.report_id.raw(), 1);
        assert_eq!(second.report_id.raw(), 2);
        let all = store.find_all().await?;
        assert_eq!(all, vec![first, second]);
        Ok(())
    }
}
