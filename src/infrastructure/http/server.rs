//! HTTP server for the content service
//!
//! Exposes a health probe plus read-only views over provider settings and
//! prompt templates.

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::sync::Arc;
use tracing::info;

use super::handlers::{
    default_provider, health, prompt_template, provider_settings, service_info, ContentAppState,
};
use crate::domain::models::AppSettings;
use crate::services::ConfigAccessors;

/// Build the router without binding a socket.
pub fn router(accessors: Arc<ConfigAccessors>, settings: AppSettings) -> Router {
    let state = ContentAppState {
        accessors,
        settings: Arc::new(settings),
    };

    let content = Router::new()
        .route("/providers", get(default_provider))
        .route("/providers/:provider", get(provider_settings))
        .route("/templates/:group/:template", get(prompt_template));

    Router::new()
        .route("/", get(health))
        .route("/info", get(service_info))
        .nest("/content", content)
        .with_state(state)
}

/// Bind `host:port` and serve until the process is stopped.
pub async fn serve(
    accessors: Arc<ConfigAccessors>,
    settings: AppSettings,
    host: &str,
    port: u16,
) -> Result<()> {
    info!(app = %settings.app_name, "Starting content HTTP server");

    let app = router(accessors, settings);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
