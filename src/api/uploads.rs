//! Media library: upload files, delete them by id.
//!
//! DESIGN
//! ======
//! `POST /upload` takes a multipart form with one `files` part per file and
//! answers with the stored file records. An upload can be attached straight
//! to an entry's media field (`ref`, `refId`, `field`); otherwise the caller
//! keeps the returned ids and writes them into the entry payload itself.

#[cfg(test)]
#[path = "uploads_test.rs"]
mod uploads_test;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::client::ApiClient;
use super::error::ApiError;
use super::paths;

/// A file picked by the user, read into memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Media field of an existing entry the upload is attached to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadTarget {
    /// Content type uid, e.g. `api::product.product`.
    pub model: String,
    /// Numeric id of the entry.
    pub entry_id: i64,
    pub field: String,
}

impl UploadTarget {
    /// The `images` field of product `entry_id`.
    #[must_use]
    pub fn product_images(entry_id: i64) -> Self {
        Self { model: "api::product.product".to_owned(), entry_id, field: "images".to_owned() }
    }
}

/// Stored file record as returned by the media library.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UploadedFile {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl ApiClient {
    /// Upload one file, optionally attaching it to `target`.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidUpload`] for an unusable mime type, else any
    /// [`ApiError`] from the request pipeline.
    pub async fn upload(&self, file: UploadFile, target: Option<&UploadTarget>) -> Result<UploadedFile, ApiError> {
        let name = file.name.clone();
        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&file.mime)
            .map_err(|e| ApiError::InvalidUpload(e.to_string()))?;
        let mut form = Form::new().part("files", part);
        if let Some(target) = target {
            form = form
                .text("ref", target.model.clone())
                .text("refId", target.entry_id.to_string())
                .text("field", target.field.clone());
        }
        let stored: Vec<UploadedFile> = self.post_multipart(paths::UPLOAD, form).await?;
        let uploaded = stored
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Decode("upload response listed no files".to_owned()))?;
        tracing::info!(file = %name, id = uploaded.id, "file uploaded");
        Ok(uploaded)
    }

    /// Remove an uploaded file from the media library.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request pipeline.
    pub async fn delete_upload(&self, id: i64) -> Result<(), ApiError> {
        tracing::info!(id, "deleting uploaded file");
        self.delete(&format!("{}/{id}", paths::UPLOAD_FILES)).await
    }
}
