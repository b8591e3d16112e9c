//! Size compression via Ghostscript
//!
//! Re-rasterizes and re-encodes the document through `gs` with the
//! ebook quality preset, which trades image fidelity for a markedly
//! smaller file.

use crate::config::ExternalToolsConfig;
use crate::error::PdfToolError;
use crate::external::{run_tool, TempStore};
use tokio::process::Command;

/// Compress a PDF through Ghostscript's pdfwrite device.
///
/// Input and output are staged as temp artifacts; both are removed
/// before this returns, on success and on failure alike.
pub async fn compress_pdf(
    bytes: &[u8],
    store: &TempStore,
    config: &ExternalToolsConfig,
) -> Result<Vec<u8>, PdfToolError> {
    let input = store.create("pdf").await?;
    let output = store.create("pdf").await?;
    input.write(bytes).await?;

    let mut cmd = Command::new(&config.gs_path);
    cmd.arg("-sDEVICE=pdfwrite")
        .arg("-dCompatibilityLevel=1.4")
        .arg("-dPDFSETTINGS=/ebook")
        .arg("-dNOPAUSE")
        .arg("-dBATCH")
        .arg(format!("-sOutputFile={}", output.path().display()))
        .arg(input.path());

    let run = run_tool("Ghostscript", &mut cmd, config.timeout).await;
    let _ = input.delete().await;
    run?;

    let compressed = output.read().await.map_err(|e| {
        tracing::error!(error = %e, "Ghostscript exited cleanly but produced no output");
        PdfToolError::Subprocess("Ghostscript produced no output".to_string())
    })?;
    output.delete().await?;

    Ok(compressed)
}
