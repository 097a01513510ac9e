use axum::{
    extract::{Multipart, State},
    Json,
};
use garde::Validate;
use kernel::repository::upload::UploadKind;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::model::{
    form::MultipartForm,
    reservation::{
        ReservationResponse, ReserveSpaceRequest, ReserveSpaceRequestWithPhoto, SpaceCodeRequest,
    },
};

pub async fn reserve_space(
    State(registry): State<AppRegistry>,
    multipart: Multipart,
) -> AppResult<&'static str> {
    let mut form = MultipartForm::read(multipart).await?;
    let req = ReserveSpaceRequest::from(&mut form);
    req.validate(&())?;

    let photo_ref = match form.take_file("foto") {
        Some(photo) => Some(
            registry
                .upload_store()
                .store(UploadKind::Photo, &photo.file_name, &photo.bytes)
                .await?,
        ),
        None => None,
    };

    registry
        .occupancy_service()
        .reserve(ReserveSpaceRequestWithPhoto::new(req, photo_ref).into())
        .await?;

    Ok("Reserva realizada correctamente")
}

pub async fn check_in(
    State(registry): State<AppRegistry>,
    req: SpaceCodeRequest,
) -> AppResult<&'static str> {
    match req.space_code() {
        Some(code) => {
            registry.occupancy_service().check_in(code).await?;
        }
        None => tracing::warn!("check-in without a space code, nothing recorded"),
    }

    Ok("Ingreso registrado")
}

pub async fn check_out(
    State(registry): State<AppRegistry>,
    req: SpaceCodeRequest,
) -> AppResult<&'static str> {
    match req.space_code() {
        Some(code) => {
            registry.occupancy_service().check_out(code).await?;
        }
        None => tracing::warn!("check-out without a space code, nothing recorded"),
    }

    Ok("Salida registrada")
}

pub async fn show_history(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<ReservationResponse>>> {
    registry
        .history_view()
        .list()
        .await
        .map(|items| items.into_iter().map(ReservationResponse::from).collect())
        .map(Json)
}
