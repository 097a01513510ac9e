use derive_new::new;

#[derive(Debug, Clone, new)]
pub struct CreateReport {
    pub reporter_name: String,
    pub holder_id: Option<String>,
    pub description: String,
    pub screenshot_ref: Option<String>,
}
