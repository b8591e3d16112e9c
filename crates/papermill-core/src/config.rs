//! Operation configuration
//!
//! Styling and tool settings are explicit values handed to the
//! operations rather than process-wide globals, so deployments can tune
//! them per instance.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Watermark overlay styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatermarkStyle {
    /// Font size in points.
    pub font_size: f32,
    /// Fill grey level, 0.0 (black) to 1.0 (white).
    pub gray: f32,
    /// Fill opacity, 0.0 (invisible) to 1.0 (opaque).
    pub opacity: f32,
}

impl Default for WatermarkStyle {
    fn default() -> Self {
        Self {
            font_size: 50.0,
            gray: 0.5,
            opacity: 0.3,
        }
    }
}

/// Settings for the out-of-process transformations.
#[derive(Debug, Clone)]
pub struct ExternalToolsConfig {
    /// Ghostscript executable (default: "gs", resolved via PATH).
    pub gs_path: String,
    /// LibreOffice executable (default: "soffice", resolved via PATH).
    pub soffice_path: String,
    /// Upper bound on a single child process run. A hung tool is killed
    /// and reported as a subprocess failure instead of pinning the
    /// request forever.
    pub timeout: Duration,
    /// Root directory for temp artifacts.
    pub temp_dir: PathBuf,
}

impl Default for ExternalToolsConfig {
    fn default() -> Self {
        Self {
            gs_path: "gs".to_string(),
            soffice_path: "soffice".to_string(),
            timeout: Duration::from_secs(120),
            temp_dir: std::env::temp_dir().join("papermill"),
        }
    }
}
