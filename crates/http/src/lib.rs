//! HTTP server facade for Shelf with Axum, bearer auth, error handling, and
//! OpenAPI support.

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Router};

use shelf_authz::TokenSet;
use shelf_kernel::ModuleRegistry;

pub mod auth;
pub mod error;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server with the given module registry
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &shelf_kernel::settings::Settings,
    tokens: Arc<TokenSet>,
) -> anyhow::Result<()> {
    let app = build_router(registry, settings, tokens);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    registry.stop_all().await
}

/// Build the main HTTP router with all module routes mounted.
///
/// Module routes go in first so the auth layer wraps all of them; the health
/// check and API docs are added afterwards and stay unauthenticated.
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &shelf_kernel::settings::Settings,
    tokens: Arc<TokenSet>,
) -> Router {
    let mut builder = RouterBuilder::new();

    for module in registry.modules() {
        tracing::info!(
            module = module.name(),
            "mounting module routes under /api/{}",
            module.name()
        );
        builder = builder.mount_module(module.name(), module.routes());
    }

    builder
        .with_auth(tokens)
        .route("/healthz", get(health_check))
        .with_openapi(registry)
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
    }
}
