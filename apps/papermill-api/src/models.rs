//! Response types for the Papermill API

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;

/// A file download response: output bytes plus the filename the client
/// should save them under.
pub struct FileDownload {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl FileDownload {
    /// A PDF result named after the operation and the current time,
    /// e.g. "merged-1714650000000.pdf".
    pub fn pdf(operation: &str, bytes: Vec<u8>) -> Self {
        Self {
            filename: format!("{}-{}.pdf", operation, Utc::now().timestamp_millis()),
            content_type: "application/pdf",
            bytes,
        }
    }

    /// A result that keeps an externally determined filename (office
    /// conversions keep the upload's base name).
    pub fn named(filename: String, bytes: Vec<u8>) -> Self {
        Self {
            filename,
            content_type: "application/octet-stream",
            bytes,
        }
    }
}

impl IntoResponse for FileDownload {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE.as_str(), self.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION.as_str(),
                    format!("attachment; filename=\"{}\"", self.filename),
                ),
            ],
            self.bytes,
        )
            .into_response()
    }
}
