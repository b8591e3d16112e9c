//! HTTP handlers for the Papermill API
//!
//! Each handler decodes the multipart payload, calls exactly one core
//! operation, and streams the result back as a download. In-memory PDF
//! edits are CPU-bound, so they run on the blocking pool; subprocess
//! operations are awaited in place.

use axum::extract::{Multipart, State};
use std::collections::HashMap;
use std::sync::Arc;

use papermill_core::{
    compress_pdf, convert_office, merge_documents, protect_document, rotate_document,
    split_document, unlock_document, watermark_document,
};

use crate::error::ApiError;
use crate::models::FileDownload;
use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// An uploaded file part.
struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// Decoded multipart payload: file parts in arrival order, plus text
/// parameters by field name.
struct Payload {
    files: Vec<Upload>,
    params: HashMap<String, String>,
}

impl Payload {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut files = Vec::new();
        let mut params = HashMap::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if field.file_name().is_some() {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::InvalidRequest(format!("Failed to read upload: {}", e)))?
                    .to_vec();
                files.push(Upload { filename, bytes });
            } else {
                let value = field.text().await.map_err(|e| {
                    ApiError::InvalidRequest(format!("Failed to read field '{}': {}", name, e))
                })?;
                params.insert(name, value);
            }
        }

        Ok(Self { files, params })
    }

    /// The single uploaded file, or 400.
    fn single_file(&mut self) -> Result<Upload, ApiError> {
        if self.files.len() != 1 {
            return Err(ApiError::InvalidRequest("Exactly one file is required".into()));
        }
        Ok(self.files.remove(0))
    }

    /// A required non-empty text parameter, or 400.
    fn required(&self, key: &str) -> Result<&str, ApiError> {
        match self.params.get(key).map(String::as_str) {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(ApiError::InvalidRequest(format!("No {} provided", key))),
        }
    }

    /// An optional text parameter; empty values count as absent.
    fn optional(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Run a CPU-bound core operation on the blocking pool.
async fn run_blocking<T, F>(op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, papermill_core::PdfToolError> + Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .map_err(ApiError::Core)
}

/// Merge two or more PDFs into one
pub async fn merge(
    State(_state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<FileDownload, ApiError> {
    let payload = Payload::read(multipart).await?;
    if payload.files.len() < 2 {
        return Err(ApiError::InvalidRequest(
            "At least two files are required".into(),
        ));
    }

    let docs: Vec<Vec<u8>> = payload.files.into_iter().map(|f| f.bytes).collect();
    let merged = run_blocking(move || merge_documents(&docs)).await?;

    tracing::info!(bytes = merged.len(), "merged documents");
    Ok(FileDownload::pdf("merged", merged))
}

/// Extract pages selected by a range expression
pub async fn split(
    State(_state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<FileDownload, ApiError> {
    let mut payload = Payload::read(multipart).await?;
    let ranges = payload.required("ranges")?.to_string();
    let file = payload.single_file()?;

    let extracted = run_blocking(move || split_document(&file.bytes, &ranges)).await?;
    Ok(FileDownload::pdf("split", extracted))
}

/// Rotate every page by a quarter-turn multiple
pub async fn rotate(
    State(_state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<FileDownload, ApiError> {
    let mut payload = Payload::read(multipart).await?;
    let angle: i64 = payload
        .required("angle")?
        .trim()
        .parse()
        .map_err(|_| ApiError::InvalidRequest("Rotation angle must be an integer".into()))?;
    let file = payload.single_file()?;

    let rotated = run_blocking(move || rotate_document(&file.bytes, angle)).await?;
    Ok(FileDownload::pdf("rotated", rotated))
}

/// Password-protect a PDF
pub async fn protect(
    State(_state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<FileDownload, ApiError> {
    let mut payload = Payload::read(multipart).await?;
    let password = payload.required("password")?.to_string();
    let file = payload.single_file()?;

    let locked = run_blocking(move || protect_document(&file.bytes, &password)).await?;
    Ok(FileDownload::pdf("protected", locked))
}

/// Remove password protection from a PDF
pub async fn unlock(
    State(_state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<FileDownload, ApiError> {
    let mut payload = Payload::read(multipart).await?;
    let password = payload.optional("password").map(str::to_string);
    let file = payload.single_file()?;

    let unlocked =
        run_blocking(move || unlock_document(&file.bytes, password.as_deref())).await?;
    Ok(FileDownload::pdf("unlocked", unlocked))
}

/// Overlay centered watermark text on every page
pub async fn watermark(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<FileDownload, ApiError> {
    let mut payload = Payload::read(multipart).await?;
    let text = payload.required("text")?.to_string();
    let file = payload.single_file()?;
    let style = state.watermark.clone();

    let marked = run_blocking(move || watermark_document(&file.bytes, &text, &style)).await?;
    Ok(FileDownload::pdf("watermarked", marked))
}

/// Re-encode a PDF through Ghostscript for a smaller file
pub async fn compress(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<FileDownload, ApiError> {
    let mut payload = Payload::read(multipart).await?;
    let file = payload.single_file()?;

    let compressed = compress_pdf(&file.bytes, &state.store, &state.tools).await?;
    Ok(FileDownload::pdf("compressed", compressed))
}

/// Convert an office document to another format via LibreOffice
pub async fn convert(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<FileDownload, ApiError> {
    let mut payload = Payload::read(multipart).await?;
    let format = payload.required("outputFormat")?.to_string();
    let file = payload.single_file()?;

    let converted =
        convert_office(&file.bytes, &file.filename, &format, &state.store, &state.tools).await?;

    tracing::info!(filename = %converted.filename, "converted document");
    Ok(FileDownload::named(converted.filename, converted.bytes))
}
