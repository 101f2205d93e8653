use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::{extract::State, http::StatusCode, response::Html, routing::get, Router};
use tracing::info;

async fn index(State(static_dir): State<PathBuf>) -> Result<Html<String>, StatusCode> {
    match tokio::fs::read_to_string(static_dir.join("index.html")).await {
        Ok(body) => Ok(Html(body)),
        Err(_) => Err(StatusCode::NOT_FOUND),
    }
}

/// Serves the landing page next to the bot. Runs until the process exits;
/// bind or serve failures are reported to the caller, which logs them
/// without taking the bot down.
pub(crate) async fn serve_static_page(port: u16, static_dir: PathBuf) -> Result<()> {
    let app = Router::new().route("/", get(index)).with_state(static_dir);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind http port {port}"))?;
    info!(port, "static page server listening");
    axum::serve(listener, app)
        .await
        .context("static page server terminated")
}
