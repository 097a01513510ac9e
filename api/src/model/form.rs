use std::collections::HashMap;

use axum::extract::Multipart;
use shared::error::{AppError, AppResult};

#[derive(Debug)]
pub struct FormUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A `multipart/form-data` body split into text fields and attached files.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, FormUpload>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::InvalidRequest(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::InvalidRequest(e.body_text()))?;
                    // browsers send an empty part when no file was picked
                    if !bytes.is_empty() {
                        form.files.insert(
                            name,
                            FormUpload {
                                file_name,
                                bytes: bytes.to_vec(),
                            },
                        );
                    }
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::InvalidRequest(e.body_text()))?;
                    form.fields.insert(name, text);
                }
            }
        }
        Ok(form)
    }

    pub fn take_text(&mut self, name: &str) -> String {
        self.fields
            .remove(name)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    pub fn take_optional_text(&mut self, name: &str) -> Option<String> {
        self.fields
            .remove(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn take_file(&mut self, name: &str) -> Option<FormUpload> {
        self.files.remove(name)
    }
}
