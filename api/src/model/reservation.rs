use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::ReservationId,
    reservation::{event::CreateReservation, Reservation},
};
use serde::{Deserialize, Serialize};

use super::form::MultipartForm;

#[derive(Debug, Validate)]
pub struct ReserveSpaceRequest {
    #[garde(length(min = 1))]
    pub holder_id: String,
    #[garde(length(min = 1))]
    pub plate: String,
    #[garde(length(min = 1))]
    pub space_code: String,
    #[garde(length(min = 1))]
    pub driver_name: String,
    #[garde(length(min = 1))]
    pub property_card_ref: String,
}

impl From<&mut MultipartForm> for ReserveSpaceRequest {
    fn from(form: &mut MultipartForm) -> Self {
        Self {
            holder_id: form.take_text("dni"),
            plate: form.take_text("placa"),
            space_code: form.take_text("codigo_espacio"),
            driver_name: form.take_text("nombre_conductor"),
            property_card_ref: form.take_text("tarjeta_propiedad"),
        }
    }
}

#[derive(new)]
pub struct ReserveSpaceRequestWithPhoto(ReserveSpaceRequest, Option<String>);

impl From<ReserveSpaceRequestWithPhoto> for CreateReservation {
    fn from(value: ReserveSpaceRequestWithPhoto) -> Self {
        let ReserveSpaceRequestWithPhoto(
            ReserveSpaceRequest {
                holder_id,
                plate,
                space_code,
                driver_name,
                property_card_ref,
            },
            photo_ref,
        ) = value;
        CreateReservation {
            holder_id,
            plate,
            space_code,
            driver_name,
            property_card_ref,
            photo_ref,
        }
    }
}

/// Body of `/ingresar` and `/salir`. Accepted as JSON or as an urlencoded
/// form; a body that is neither reads as having no code.
#[derive(Debug, Default, Deserialize)]
pub struct SpaceCodeRequest {
    pub codigo_espacio: Option<String>,
}

impl SpaceCodeRequest {
    pub fn space_code(&self) -> Option<&str> {
        self.codigo_espacio
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

#[async_trait]
impl<S> FromRequest<S> for SpaceCodeRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let urlencoded = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        let parsed = if urlencoded {
            Form::<Self>::from_request(req, state)
                .await
                .map(|Form(body)| body)
                .ok()
        } else {
            Json::<Self>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .ok()
        };
        Ok(parsed.unwrap_or_default())
    }
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: ReservationId,
    #[serde(rename = "dni")]
    pub holder_id: String,
    #[serde(rename = "placa")]
    pub plate: String,
    #[serde(rename = "codigo_espacio")]
    pub space_code: String,
    #[serde(rename = "nombre_conductor")]
    pub driver_name: String,
    #[serde(rename = "tarjeta_propiedad")]
    pub property_card_ref: String,
    #[serde(rename = "foto")]
    pub photo_ref: Option<String>,
    #[serde(rename = "hora_entrada")]
    pub entry_time: Option<DateTime<Utc>>,
    #[serde(rename = "hora_salida")]
    pub exit_time: Option<DateTime<Utc>>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            reservation_id,
            holder_id,
            plate,
            driver_name,
            property_card_ref,
            photo_ref,
            space_code,
            entry_time,
            exit_time,
        } = value;
        Self {
            id: reservation_id,
            holder_id,
            plate,
            space_code,
            driver_name,
            property_card_ref,
            photo_ref,
            entry_time,
            exit_time,
        }
    }
}
