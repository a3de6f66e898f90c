//! Collect a multipart body into text fields and uploaded files.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::{AppError, AppResult};

/// Request body cap for routes accepting file uploads: a 10 MB file plus
/// form overhead.
pub const MAX_UPLOAD_BODY_BYTES: usize = 12 * 1024 * 1024;

/// One uploaded file part.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A fully read multipart form.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Read every part. Parts with a file name are treated as files.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let content_type = field.content_type().map(str::to_string);
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.files.insert(
                        name,
                        UploadedFile {
                            filename,
                            content_type,
                            bytes: data.to_vec(),
                        },
                    );
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    /// Parse the JSON text field `name` into `T`; `None` when absent.
    pub fn json_field<T: serde::de::DeserializeOwned>(&self, name: &str) -> AppResult<Option<T>> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| AppError::BadRequest(format!("Invalid JSON in '{name}' field: {e}"))),
        }
    }
}
