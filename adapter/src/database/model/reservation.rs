use kernel::model::{id::ReservationId, reservation::Reservation};
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};

// Row layout of `reservas`. Entry and exit stay NULL until check-in / check-out.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ReservationRow {
    pub id: i64,
    pub dni: String,
    pub placa: String,
    pub codigo_espacio: String,
    pub nombre_conductor: String,
    pub tarjeta_propiedad: String,
    pub foto: Option<String>,
    pub hora_entrada: Option<DateTime<Utc>>,
    pub hora_salida: Option<DateTime<Utc>>,
}

impl From<ReservationRow> for Reservation {
    fn from(value: ReservationRow) -> Self {
        let ReservationRow {
            id,
            dni,
            placa,
            codigo_espacio,
            nombre_conductor,
            tarjeta_propiedad,
            foto,
            hora_entrada,
            hora_salida,
        } = value;
        Reservation {
            reservation_id: ReservationId::new(id),
            holder_id: dni,
            plate: placa,
            driver_name: nombre_conductor,
            property_card_ref: tarjeta_propiedad,
            photo_ref: foto,
            space_code: codigo_espacio,
            entry_time: hora_entrada,
            exit_time: hora_salida,
        }
    }
}
