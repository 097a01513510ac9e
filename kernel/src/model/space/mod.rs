use crate::model::id::SpaceId;
use strum::{AsRefStr, Display, EnumString};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Space {
    pub id: SpaceId,
    pub code: String,
    pub state: SpaceState,
}

/// Occupancy of a single space. Cycles `Free -> Reserved -> Occupied -> Free`.
///
/// The string forms are the persisted and wire values (`libre`, `reservado`, `ocupado`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum SpaceState {
    #[default]
    #[strum(serialize = "libre")]
    Free,
    #[strum(serialize = "reservado")]
    Reserved,
    #[strum(serialize = "ocupado")]
    Occupied,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_labels_round_trip_through_storage_form() {
        assert_eq!(SpaceState::Free.as_ref(), "libre");
        assert_eq!(SpaceState::Reserved.to_string(), "reservado");
        assert_eq!("ocupado".parse::<SpaceState>(), Ok(SpaceState::Occupied));
        // the sqlite schema defaulted to a capitalised label
        assert_eq!("Libre".parse::<SpaceState>(), Ok(SpaceState::Free));
        assert!("cerrado".parse::<SpaceState>().is_err());
    }
}
