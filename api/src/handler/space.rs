use axum::{extract::State, Json};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::model::space::SpaceResponse;

pub async fn show_space_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<SpaceResponse>>> {
    registry
        .occupancy_service()
        .list_spaces()
        .await
        .map(|spaces| spaces.into_iter().map(SpaceResponse::from).collect())
        .map(Json)
}
