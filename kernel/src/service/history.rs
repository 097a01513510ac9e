use std::{cmp::Ordering, sync::Arc};

use chrono::{DateTime, Utc};
use derive_new::new;
use shared::error::AppResult;

use crate::{
    model::reservation::Reservation,
    repository::{parking::ParkingRepository, reservation::ReservationLedger},
};

#[derive(Clone, new)]
pub struct HistoryView {
    repository: Arc<dyn ParkingRepository>,
}

impl HistoryView {
    pub async fn list(&self) -> AppResult<Vec<Reservation>> {
        let mut tx = self.repository.begin().await?;
        let mut reservations = ReservationLedger::list_all(&mut *tx).await?;
        sort_history(&mut reservations);
        Ok(reservations)
    }
}

/// Newest entry first, then newest exit. A missing time sorts ahead of any
/// recorded one, so reservations not yet entered lead the listing.
/// Remaining ties keep id order.
pub fn sort_history(reservations: &mut [Reservation]) {
    reservations.sort_by(|a, b| {
        descending_missing_first(a.entry_time, b.entry_time)
            .then_with(|| descending_missing_first(a.exit_time, b.exit_time))
            .then_with(|| a.reservation_id.cmp(&b.reservation_id))
    });
}

fn descending_missing_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => b.cmp(&a),
    }
}
