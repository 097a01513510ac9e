use crate::model::id::ReservationId;
use chrono::{DateTime, Utc};

pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub holder_id: String,
    pub plate: String,
    pub driver_name: String,
    pub property_card_ref: String,
    pub photo_ref: Option<String>,
    pub space_code: String,
    pub entry_time: Option<DateTime<Utc>>,
    pub exit_time: Option<DateTime<Utc>>,
}

impl Reservation {
    /// A reservation stays active until its exit is recorded.
    pub fn is_active(&self) -> bool {
        self.exit_time.is_none()
    }

    pub fn is_in(&self, phase: OpenPhase) -> bool {
        match phase {
            OpenPhase::AwaitingEntry => self.entry_time.is_none() && self.exit_time.is_none(),
            OpenPhase::AwaitingExit => self.entry_time.is_some() && self.exit_time.is_none(),
        }
    }
}

/// Which open reservation of a space a lookup is after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenPhase {
    AwaitingEntry,
    AwaitingExit,
}
