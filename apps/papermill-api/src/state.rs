//! Application state for the Papermill API

use papermill_core::{ExternalToolsConfig, TempStore, WatermarkStyle};
use std::path::PathBuf;
use std::time::Duration;

/// Shared, read-only request context: tool settings and the temp store.
/// There is no cross-request document state.
pub struct AppState {
    pub store: TempStore,
    pub tools: ExternalToolsConfig,
    pub watermark: WatermarkStyle,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Build state from the environment, falling back to defaults that
    /// resolve the external tools via PATH and stage artifacts under the
    /// system temp directory.
    pub fn from_env() -> Self {
        let mut tools = ExternalToolsConfig::default();

        if let Ok(dir) = std::env::var("PAPERMILL_TEMP_DIR") {
            tools.temp_dir = PathBuf::from(dir);
        }
        if let Ok(path) = std::env::var("PAPERMILL_GS_PATH") {
            tools.gs_path = path;
        }
        if let Ok(path) = std::env::var("PAPERMILL_SOFFICE_PATH") {
            tools.soffice_path = path;
        }
        if let Some(secs) = env_parse::<u64>("PAPERMILL_TOOL_TIMEOUT_SECS") {
            tools.timeout = Duration::from_secs(secs);
        }

        let max_upload_bytes =
            env_parse::<usize>("PAPERMILL_MAX_UPLOAD_BYTES").unwrap_or(100 * 1024 * 1024);

        Self {
            store: TempStore::new(&tools.temp_dir),
            tools,
            watermark: WatermarkStyle::default(),
            max_upload_bytes,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
