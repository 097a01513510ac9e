use derive_new::new;

#[derive(Debug, Clone, new)]
pub struct CreateReservation {
    pub holder_id: String,
    pub plate: String,
    pub space_code: String,
    pub driver_name: String,
    pub property_card_ref: String,
    pub photo_ref: Option<String>,
}
