use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Extension, Multipart},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::app::errors;
use crate::app::services::AppServices;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no file field in multipart body")]
    MissingFile,
    #[error("multipart read failed: {0}")]
    Multipart(#[from] MultipartError),
    #[error("writing upload failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("replacing upload destination failed: {0}")]
    Persist(#[from] tempfile::PathPersistError),
}

/// Copy the first uploaded file byte-for-byte to the configured path,
/// replacing whatever was there.
///
/// The route runs without a body size limit. A failed upload leaves the
/// previous destination file untouched.
pub async fn upload(
    Extension(services): Extension<Arc<AppServices>>,
    multipart: Multipart,
) -> axum::response::Response {
    match save_first_file(multipart, services.upload_path()).await {
        Ok(bytes_written) => {
            tracing::info!(bytes_written, path = %services.upload_path().display(), "upload stored");
            (StatusCode::OK, Json(serde_json::json!({ "bytes_written": bytes_written }))).into_response()
        }
        Err(UploadError::MissingFile) => {
            errors::json_error(StatusCode::BAD_REQUEST, "missing_file", UploadError::MissingFile.to_string())
        }
        Err(UploadError::Multipart(e)) => errors::json_error(e.status(), "invalid_multipart", e.body_text()),
        Err(e) => {
            tracing::warn!("upload failed: {e}");
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "upload_failed", e.to_string())
        }
    }
}

async fn save_first_file(mut multipart: Multipart, dest: &Path) -> Result<u64, UploadError> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.file_name().is_none() {
            continue;
        }

        // Stage beside `dest` so the final rename stays on one filesystem.
        // Dropping `staged` before persist removes the partial file.
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let (std_file, staged) = tempfile::Builder::new()
            .prefix(".upload-")
            .tempfile_in(dir)?
            .into_parts();
        let mut file = tokio::fs::File::from_std(std_file);

        let mut written = 0u64;
        while let Some(chunk) = field.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        staged.persist(dest)?;
        return Ok(written);
    }

    Err(UploadError::MissingFile)
}
