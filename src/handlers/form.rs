//! Multipart form collection for upload endpoints

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::ApiError;

/// Name of the multipart part carrying the image
const FILE_FIELD: &str = "file";

pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Text fields plus the single uploaded file of a multipart request
pub struct UploadForm {
    fields: HashMap<String, String>,
    pub file: UploadedFile,
}

impl UploadForm {
    pub async fn collect(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut fields = HashMap::new();
        let mut file = None;

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == FILE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?.to_vec();
                file = Some(UploadedFile { file_name, bytes });
            } else {
                fields.insert(name, field.text().await?);
            }
        }

        let file = file.ok_or_else(|| ApiError::BadRequest("Missing form field: file".to_string()))?;

        Ok(Self { fields, file })
    }

    /// Required text field
    pub fn take(&mut self, name: &str) -> Result<String, ApiError> {
        self.fields
            .remove(name)
            .ok_or_else(|| ApiError::BadRequest(format!("Missing form field: {}", name)))
    }
}
