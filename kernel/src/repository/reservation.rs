use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::AppResult;

use crate::model::{
    id::ReservationId,
    reservation::{event::CreateReservation, OpenPhase, Reservation},
};

#[async_trait]
pub trait ReservationLedger: Send {
    // the reservation of this holder that has no exit time yet
    async fn find_active_by_holder(&mut self, holder_id: &str) -> AppResult<Option<Reservation>>;
    // newest reservation of the space in the given phase
    async fn find_open_by_space(
        &mut self,
        space_code: &str,
        phase: OpenPhase,
    ) -> AppResult<Option<Reservation>>;
    // assigns a fresh id, entry and exit times start empty
    async fn create(&mut self, event: CreateReservation) -> AppResult<Reservation>;
    async fn mark_entry(&mut self, reservation_id: ReservationId, at: DateTime<Utc>) -> AppResult<()>;
    async fn mark_exit(&mut self, reservation_id: ReservationId, at: DateTime<Utc>) -> AppResult<()>;
    // ordered by id
    async fn list_all(&mut self) -> AppResult<Vec<Reservation>>;
}
