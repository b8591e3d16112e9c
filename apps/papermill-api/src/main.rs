//! Papermill API server - document transformation backend
//!
//! Accepts uploaded documents, applies one transformation per request
//! (merge, split, rotate, protect, unlock, watermark, compress,
//! convert), and streams the transformed file back.

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

mod error;
mod handlers;
mod models;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("papermill_api=info".parse()?)
                .add_directive("papermill_core=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let state = Arc::new(AppState::from_env());

    // The editor endpoints work without either tool; flag degraded
    // functionality early instead of at first use
    if !papermill_core::external::tool_available(&state.tools.gs_path).await {
        warn!(path = %state.tools.gs_path, "Ghostscript not found; /api/compress will fail");
    }
    if !papermill_core::external::tool_available(&state.tools.soffice_path).await {
        warn!(path = %state.tools.soffice_path, "LibreOffice not found; /api/convert-office will fail");
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(state.max_upload_bytes));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting Papermill API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/merge", post(handlers::merge))
        .route("/api/split", post(handlers::split))
        .route("/api/rotate", post(handlers::rotate))
        .route("/api/protect", post(handlers::protect))
        .route("/api/unlock", post(handlers::unlock))
        .route("/api/watermark", post(handlers::watermark))
        .route("/api/compress", post(handlers::compress))
        .route("/api/convert-office", post(handlers::convert))
        .with_state(state)
}
