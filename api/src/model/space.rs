use kernel::model::{id::SpaceId, space::Space};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SpaceResponse {
    pub id: SpaceId,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "estado")]
    pub state: String,
}

impl From<Space> for SpaceResponse {
    fn from(value: Space) -> Self {
        let Space { id, code, state } = value;
        Self {
            id,
            code,
            state: state.to_string(),
        }
    }
}
