//! Koperasi API Server
//!
//! Main entry point for the cooperative ledger service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use koperasi_api::{AppState, create_router};
use koperasi_db::{SettingsHandle, SettingsRepository, connect, seed::seed_defaults};
use koperasi_shared::{AppConfig, StoreBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "koperasi=debug,koperasi_db=debug,koperasi_api=debug,tower_http=debug".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let store = connect(&config.store).await?;

    // A memory store starts empty on every boot.
    if config.store.backend == StoreBackend::Memory {
        let summary = seed_defaults(&store).await?;
        info!(accounts = summary.accounts_created, "Seeded in-memory store");
    }

    // Settings are read once here; later changes apply on update or reload.
    let settings = SettingsHandle::default();
    let loaded = SettingsRepository::new(store.clone(), settings.clone())
        .reload()
        .await?;
    info!(
        mandatory_savings = %loaded.mandatory_savings,
        ceiling_multiplier = %loaded.ceiling_multiplier,
        "Settings loaded"
    );

    let app = create_router(AppState::new(store, settings));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
