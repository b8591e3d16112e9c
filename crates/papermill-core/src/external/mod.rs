//! Out-of-process transformations
//!
//! Compression and office conversion are delegated to external tools.
//! This module owns the shared invocation protocol: stage input to a
//! temp artifact, run the child with a bounded wait, capture its
//! diagnostics for the log, read the designated output on exit 0, and
//! clean every artifact up on every exit path.

pub mod compress;
pub mod convert;
pub mod store;

pub use compress::compress_pdf;
pub use convert::{convert_office, ConvertedFile};
pub use store::{TempArtifact, TempScope, TempStore};

use crate::error::PdfToolError;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Run a child process to completion with a bounded wait.
///
/// Stderr is captured and logged, never handed to the caller: the
/// returned errors carry only a generic notice. A child that outlives
/// the timeout is killed (`kill_on_drop`) and reported as a subprocess
/// failure.
pub(crate) async fn run_tool(
    tool: &str,
    cmd: &mut Command,
    timeout: Duration,
) -> Result<(), PdfToolError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            tracing::error!(tool, error = %e, "failed to launch external tool");
            return Err(PdfToolError::Subprocess(format!(
                "{} is not available",
                tool
            )));
        }
        Err(_) => {
            tracing::error!(tool, timeout_secs = timeout.as_secs(), "external tool timed out");
            return Err(PdfToolError::Subprocess(format!("{} timed out", tool)));
        }
    };

    if !output.stderr.is_empty() {
        tracing::debug!(tool, stderr = %String::from_utf8_lossy(&output.stderr), "tool diagnostics");
    }

    if !output.status.success() {
        tracing::error!(
            tool,
            code = ?output.status.code(),
            stderr = %String::from_utf8_lossy(&output.stderr),
            "external tool exited with failure"
        );
        return Err(PdfToolError::Subprocess(format!(
            "{} exited with an error",
            tool
        )));
    }

    Ok(())
}

/// Check whether an external tool responds to `--version`.
pub async fn tool_available(path: &str) -> bool {
    Command::new(path)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_tool_missing_binary_is_subprocess_error() {
        let mut cmd = Command::new("definitely-not-a-real-tool-xyz");
        let result = run_tool("test tool", &mut cmd, Duration::from_secs(5)).await;
        assert!(matches!(result, Err(PdfToolError::Subprocess(_))));
    }

    #[tokio::test]
    async fn test_run_tool_nonzero_exit_is_subprocess_error() {
        let mut cmd = Command::new("false");
        let result = run_tool("test tool", &mut cmd, Duration::from_secs(5)).await;
        assert!(matches!(result, Err(PdfToolError::Subprocess(_))));
    }

    #[tokio::test]
    async fn test_run_tool_success() {
        let mut cmd = Command::new("true");
        run_tool("test tool", &mut cmd, Duration::from_secs(5))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_tool_timeout_kills_child() {
        let mut cmd = Command::new("sleep");
        cmd.arg("30");
        let result = run_tool("test tool", &mut cmd, Duration::from_millis(50)).await;
        assert!(matches!(result, Err(PdfToolError::Subprocess(_))));
    }

    #[tokio::test]
    async fn test_tool_available_for_missing_binary() {
        assert!(!tool_available("definitely-not-a-real-tool-xyz").await);
    }
}
