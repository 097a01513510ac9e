use async_trait::async_trait;
use shared::error::AppResult;

use super::{reservation::ReservationLedger, space::SpaceStore};

/// One unit of work over spaces and reservations.
///
/// Everything done through a transaction becomes visible together on
/// [`commit`](ParkingTransaction::commit). Dropping it without committing
/// discards every change. Backends serialize transactions so that checks made
/// inside one still hold when it commits.
#[async_trait]
pub trait ParkingTransaction: SpaceStore + ReservationLedger + Send {
    async fn commit(self: Box<Self>) -> AppResult<()>;
}

#[async_trait]
pub trait ParkingRepository: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn ParkingTransaction>>;
}
