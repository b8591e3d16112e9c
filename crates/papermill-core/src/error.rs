use thiserror::Error;

/// Failure taxonomy for every core operation.
///
/// Each variant maps to one caller-visible failure category: callers can
/// tell a bad password apart from a corrupt file, and a tool failure
/// apart from their own input. All errors are terminal for the request
/// that raised them; no partial output is ever returned.
#[derive(Debug, Error)]
pub enum PdfToolError {
    /// Missing or empty required parameter, no files, empty parsed range.
    /// Rejected before any processing starts.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Wrong or missing password against an encrypted document, or a
    /// password supplied for a document that is not encrypted.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Input bytes could not be parsed as a valid PDF.
    #[error("Failed to parse PDF: {0}")]
    Structural(String),

    /// External tool unavailable, timed out, or exited non-zero. The
    /// message stays generic; raw tool diagnostics go to the log only.
    #[error("External tool failed: {0}")]
    Subprocess(String),

    /// Temp-artifact creation, write, read, or deletion failure.
    #[error("Temp resource error: {0}")]
    Resource(#[from] std::io::Error),
}

impl PdfToolError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }
}
