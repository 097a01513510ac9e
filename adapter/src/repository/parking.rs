use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;
use kernel::{
    model::{
        id::ReservationId,
        reservation::{event::CreateReservation, OpenPhase, Reservation},
        space::{Space, SpaceState},
    },
    repository::{
        parking::{ParkingRepository, ParkingTransaction},
        reservation::ReservationLedger,
        space::SpaceStore,
    },
};
use shared::error::{AppError, AppResult};

use crate::database::{
    model::{reservation::ReservationRow, space::SpaceRow},
    ConnectionPool,
};

const RESERVATION_COLUMNS: &str = "id, dni, placa, codigo_espacio, nombre_conductor, \
     tarjeta_propiedad, foto, hora_entrada, hora_salida";

#[derive(new)]
pub struct ParkingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ParkingRepository for ParkingRepositoryImpl {
    async fn begin(&self) -> AppResult<Box<dyn ParkingTransaction>> {
        let mut tx = self.db.begin().await?;

        // Two reservations racing for the same space or holder must not both commit.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .map_err(operation_error)?;

        Ok(Box::new(PgParkingTransaction { tx }))
    }
}

pub struct PgParkingTransaction {
    tx: sqlx::Transaction<'static, sqlx::Postgres>,
}

#[async_trait]
impl SpaceStore for PgParkingTransaction {
    async fn get_by_code(&mut self, code: &str) -> AppResult<Option<Space>> {
        sqlx::query_as::<_, SpaceRow>("SELECT id, codigo, estado FROM espacios WHERE codigo = $1")
            .bind(code)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(operation_error)?
            .map(Space::try_from)
            .transpose()
    }

    async fn list_all(&mut self) -> AppResult<Vec<Space>> {
        sqlx::query_as::<_, SpaceRow>("SELECT id, codigo, estado FROM espacios ORDER BY id ASC")
            .fetch_all(&mut *self.tx)
            .await
            .map_err(operation_error)?
            .into_iter()
            .map(Space::try_from)
            .collect()
    }

    async fn set_state(&mut self, code: &str, state: SpaceState) -> AppResult<()> {
        let res = sqlx::query("UPDATE espacios SET estado = $1 WHERE codigo = $2")
            .bind(state.as_ref())
            .bind(code)
            .execute(&mut *self.tx)
            .await
            .map_err(operation_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("El espacio no existe".into()));
        }
        Ok(())
    }

    async fn provision(&mut self, code: &str) -> AppResult<Space> {
        sqlx::query(
            r#"
                INSERT INTO espacios (codigo, estado)
                VALUES ($1, $2)
                ON CONFLICT (codigo) DO NOTHING
            "#,
        )
        .bind(code)
        .bind(SpaceState::Free.as_ref())
        .execute(&mut *self.tx)
        .await
        .map_err(operation_error)?;

        self.get_by_code(code).await?.ok_or_else(|| {
            AppError::NoRowsAffectedError(format!("space {code} could not be provisioned"))
        })
    }
}

#[async_trait]
impl ReservationLedger for PgParkingTransaction {
    async fn find_active_by_holder(&mut self, holder_id: &str) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservas \
             WHERE dni = $1 AND hora_salida IS NULL \
             ORDER BY id DESC LIMIT 1"
        ))
        .bind(holder_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map(|row| row.map(Reservation::from))
        .map_err(operation_error)
    }

    async fn find_open_by_space(
        &mut self,
        space_code: &str,
        phase: OpenPhase,
    ) -> AppResult<Option<Reservation>> {
        let entry_filter = match phase {
            OpenPhase::AwaitingEntry => "hora_entrada IS NULL",
            OpenPhase::AwaitingExit => "hora_entrada IS NOT NULL",
        };
        sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservas \
             WHERE codigo_espacio = $1 AND hora_salida IS NULL AND {entry_filter} \
             ORDER BY id DESC LIMIT 1"
        ))
        .bind(space_code)
        .fetch_optional(&mut *self.tx)
        .await
        .map(|row| row.map(Reservation::from))
        .map_err(operation_error)
    }

    async fn create(&mut self, event: CreateReservation) -> AppResult<Reservation> {
        let holder_id = event.holder_id.clone();
        sqlx::query_as::<_, ReservationRow>(&format!(
            "INSERT INTO reservas \
             (dni, placa, codigo_espacio, nombre_conductor, tarjeta_propiedad, foto) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(event.holder_id)
        .bind(event.plate)
        .bind(event.space_code)
        .bind(event.driver_name)
        .bind(event.property_card_ref)
        .bind(event.photo_ref)
        .fetch_one(&mut *self.tx)
        .await
        .map(Reservation::from)
        .map_err(|e| {
            // reservas_dni_activa_idx
            let duplicate = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if duplicate {
                AppError::DuplicateActiveReservation(holder_id)
            } else {
                operation_error(e)
            }
        })
    }

    async fn mark_entry(&mut self, reservation_id: ReservationId, at: DateTime<Utc>) -> AppResult<()> {
        let res = sqlx::query("UPDATE reservas SET hora_entrada = $1 WHERE id = $2")
            .bind(at)
            .bind(reservation_id)
            .execute(&mut *self.tx)
            .await
            .map_err(operation_error)?;
        ensure_updated(res.rows_affected(), reservation_id)
    }

    async fn mark_exit(&mut self, reservation_id: ReservationId, at: DateTime<Utc>) -> AppResult<()> {
        let res = sqlx::query("UPDATE reservas SET hora_salida = $1 WHERE id = $2")
            .bind(at)
            .bind(reservation_id)
            .execute(&mut *self.tx)
            .await
            .map_err(operation_error)?;
        ensure_updated(res.rows_affected(), reservation_id)
    }

    async fn list_all(&mut self) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservas ORDER BY id ASC"
        ))
        .fetch_all(&mut *self.tx)
        .await
        .map(|rows| rows.into_iter().map(Reservation::from).collect())
        .map_err(operation_error)
    }
}

#[async_trait]
impl ParkingTransaction for PgParkingTransaction {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await.map_err(|e| {
            if is_serialization_failure(&e) {
                AppError::ConcurrentModification(e.to_string())
            } else {
                AppError::TransactionError(e)
            }
        })
    }
}

// 40001 serialization_failure, 40P01 deadlock_detected
fn is_serialization_failure(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "40001" || code == "40P01")
}

fn operation_error(e: sqlx::Error) -> AppError {
    if is_serialization_failure(&e) {
        AppError::ConcurrentModification(e.to_string())
    } else {
        AppError::SpecificOperationError(e)
    }
}

fn ensure_updated(rows_affected: u64, reservation_id: ReservationId) -> AppResult<()> {
    if rows_affected < 1 {
        return Err(AppError::EntityNotFound(format!(
            "La reserva {reservation_id} no existe"
        )));
    }
    Ok(())
}
