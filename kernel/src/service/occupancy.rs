use std::sync::Arc;

use chrono::Utc;
use derive_new::new;
use shared::error::{AppError, AppResult};

use crate::{
    model::{
        id::ReservationId,
        reservation::{event::CreateReservation, OpenPhase, Reservation},
        space::{Space, SpaceState},
    },
    repository::{parking::ParkingRepository, reservation::ReservationLedger, space::SpaceStore},
};

const MAX_ATTEMPTS: u32 = 3;

/// Reserve, check-in and check-out rules for the parking spaces.
///
/// Each operation runs inside a single [`ParkingTransaction`], so the checks
/// it makes and the writes it performs commit together or not at all.
///
/// [`ParkingTransaction`]: crate::repository::parking::ParkingTransaction
#[derive(Clone, new)]
pub struct OccupancyService {
    repository: Arc<dyn ParkingRepository>,
}

impl OccupancyService {
    /// Makes sure every code exists. Existing spaces keep their state.
    pub async fn provision(&self, codes: &[String]) -> AppResult<Vec<Space>> {
        let mut tx = self.repository.begin().await?;
        let mut spaces = Vec::with_capacity(codes.len());
        for code in codes {
            spaces.push(tx.provision(code).await?);
        }
        tx.commit().await?;
        tracing::info!(count = spaces.len(), "space catalog provisioned");
        Ok(spaces)
    }

    pub async fn list_spaces(&self) -> AppResult<Vec<Space>> {
        let mut tx = self.repository.begin().await?;
        SpaceStore::list_all(&mut *tx).await
    }

    /// Reserves a free space for a holder with no active reservation.
    ///
    /// A transaction that loses a race with a concurrent one is run again, so
    /// the caller sees the same outcome a serialized execution would give.
    pub async fn reserve(&self, event: CreateReservation) -> AppResult<Reservation> {
        let mut attempt = 1;
        loop {
            match self.try_reserve(event.clone()).await {
                Err(AppError::ConcurrentModification(cause)) if attempt < MAX_ATTEMPTS => {
                    tracing::warn!(space_code = %event.space_code, attempt, %cause, "reservation raced, retrying");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn try_reserve(&self, event: CreateReservation) -> AppResult<Reservation> {
        let mut tx = self.repository.begin().await?;

        let space = tx
            .get_by_code(&event.space_code)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("El espacio no existe".into()))?;

        if space.state != SpaceState::Free {
            return Err(AppError::SpaceUnavailable {
                code: space.code,
                state: space.state.to_string(),
            });
        }

        if tx.find_active_by_holder(&event.holder_id).await?.is_some() {
            return Err(AppError::DuplicateActiveReservation(event.holder_id));
        }

        let reservation = tx.create(event).await?;
        tx.set_state(&space.code, SpaceState::Reserved).await?;
        tx.commit().await?;

        tracing::info!(
            space_code = %reservation.space_code,
            holder_id = %reservation.holder_id,
            reservation_id = %reservation.reservation_id,
            "space reserved"
        );
        Ok(reservation)
    }

    /// Records the entry of the waiting reservation and marks the space occupied.
    ///
    /// The space is marked occupied even when no reservation is waiting for it.
    pub async fn check_in(&self, space_code: &str) -> AppResult<Option<ReservationId>> {
        self.transition(space_code, OpenPhase::AwaitingEntry, SpaceState::Occupied)
            .await
    }

    /// Records the exit of the parked reservation and frees the space.
    ///
    /// The space is freed even when no reservation is parked on it.
    pub async fn check_out(&self, space_code: &str) -> AppResult<Option<ReservationId>> {
        self.transition(space_code, OpenPhase::AwaitingExit, SpaceState::Free)
            .await
    }

    async fn transition(
        &self,
        space_code: &str,
        phase: OpenPhase,
        target: SpaceState,
    ) -> AppResult<Option<ReservationId>> {
        let mut attempt = 1;
        loop {
            match self.try_transition(space_code, phase, target).await {
                Err(AppError::ConcurrentModification(cause)) if attempt < MAX_ATTEMPTS => {
                    tracing::warn!(space_code, ?phase, attempt, %cause, "state change raced, retrying");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn try_transition(
        &self,
        space_code: &str,
        phase: OpenPhase,
        target: SpaceState,
    ) -> AppResult<Option<ReservationId>> {
        let mut tx = self.repository.begin().await?;

        if tx.get_by_code(space_code).await?.is_none() {
            tracing::warn!(space_code, ?phase, "unknown space, nothing recorded");
            return Ok(None);
        }

        let now = Utc::now();
        let touched = match tx.find_open_by_space(space_code, phase).await? {
            Some(reservation) => {
                let id = reservation.reservation_id;
                match phase {
                    OpenPhase::AwaitingEntry => tx.mark_entry(id, now).await?,
                    OpenPhase::AwaitingExit => tx.mark_exit(id, now).await?,
                }
                Some(id)
            }
            None => {
                tracing::warn!(space_code, ?phase, "no matching reservation, updating space state only");
                None
            }
        };

        tx.set_state(space_code, target).await?;
        tx.commit().await?;

        tracing::info!(
            space_code,
            state = %target,
            reservation_id = ?touched,
            "space state changed"
        );
        Ok(touched)
    }
}
