use kernel::model::{id::SpaceId, space::Space};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

// Row layout of `espacios`, shared by the SQL and snapshot backends.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct SpaceRow {
    pub id: i64,
    pub codigo: String,
    pub estado: String,
}

impl TryFrom<SpaceRow> for Space {
    type Error = AppError;

    fn try_from(value: SpaceRow) -> Result<Self, Self::Error> {
        let SpaceRow { id, codigo, estado } = value;
        let state = estado.parse().map_err(|_| {
            AppError::CorruptRecord(format!("space {codigo} has unknown state `{estado}`"))
        })?;
        Ok(Space {
            id: SpaceId::new(id),
            code: codigo,
            state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::space::SpaceState;

    #[test]
    fn unknown_state_is_reported_as_corrupt() {
        let ok = SpaceRow {
            id: 1,
            codigo: "A1".into(),
            estado: "reservado".into(),
        };
        assert_eq!(Space::try_from(ok).unwrap().state, SpaceState::Reserved);

        let bad = SpaceRow {
            id: 2,
            codigo: "A2".into(),
            estado: "roto".into(),
        };
        assert!(matches!(Space::try_from(bad), Err(AppError::CorruptRecord(_))));
    }
}
