use std::sync::Arc;

use anyhow::Context;

use shelf_app::modules::{self, AppState};
use shelf_kernel::settings::Settings;
use shelf_kernel::{InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Shelf settings")?;
    shelf_telemetry::init(&settings.telemetry);

    tracing::info!(env = ?settings.environment, "shelf-app bootstrap starting");

    let state = AppState::new();
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &state, &settings);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;

    let tokens = Arc::new(modules::token_set(&settings));
    if tokens.is_empty() {
        tracing::warn!("no auth tokens configured; every API request will be rejected");
    }

    tracing::info!("shelf-app bootstrap complete");

    shelf_http::start_server(&registry, &settings, tokens).await
}
