//! Cross-format conversion via LibreOffice
//!
//! Runs `soffice` in headless batch mode. The converted file keeps the
//! upload's base name with the target extension, which is also how
//! LibreOffice itself names its output.

use crate::config::ExternalToolsConfig;
use crate::error::PdfToolError;
use crate::external::{run_tool, TempStore};
use std::path::Path;
use tokio::process::Command;

/// A converted document plus the filename it should be served under.
#[derive(Debug)]
pub struct ConvertedFile {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Convert a document to `target_format` (e.g. "pdf", "docx", "odt").
///
/// The input is staged under its original base name inside a
/// request-scoped directory, so LibreOffice derives the right output
/// name while concurrent requests can never alias each other's paths.
/// The whole scope is removed before this returns.
pub async fn convert_office(
    bytes: &[u8],
    original_name: &str,
    target_format: &str,
    store: &TempStore,
    config: &ExternalToolsConfig,
) -> Result<ConvertedFile, PdfToolError> {
    validate_format(target_format)?;

    let input_name = sanitize_filename(original_name);
    let base = Path::new(&input_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();

    let scope = store.scope().await?;
    let input = scope.artifact(&input_name);
    input.write(bytes).await?;

    let mut cmd = Command::new(&config.soffice_path);
    cmd.arg("--headless")
        .arg("--convert-to")
        .arg(target_format)
        .arg(input.path())
        .arg("--outdir")
        .arg(scope.dir());

    run_tool("LibreOffice", &mut cmd, config.timeout).await?;

    let filename = format!("{}.{}", base, target_format);
    let output = scope.artifact(&filename);
    let converted = output.read().await.map_err(|e| {
        tracing::error!(error = %e, filename, "LibreOffice exited cleanly but produced no output");
        PdfToolError::Subprocess("LibreOffice produced no output".to_string())
    })?;

    // Scope drop would catch these, but the happy path cleans up eagerly
    let _ = input.delete().await;
    let _ = output.delete().await;

    Ok(ConvertedFile {
        bytes: converted,
        filename,
    })
}

/// Reject formats that could smuggle path separators or tool flags.
fn validate_format(format: &str) -> Result<(), PdfToolError> {
    if format.is_empty() || format.len() > 8 {
        return Err(PdfToolError::validation("Invalid output format"));
    }
    if !format.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(PdfToolError::validation(format!(
            "Invalid output format '{}'",
            format
        )));
    }
    Ok(())
}

/// Reduce an uploaded filename to a bare file name, dropping any path
/// components a hostile client may have sent.
fn sanitize_filename(name: &str) -> String {
    let bare = Path::new(name)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .trim();
    if bare.is_empty() || bare == "." || bare == ".." {
        "document".to_string()
    } else {
        bare.to_string()
    }
}
