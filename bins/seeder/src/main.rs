//! Seeds the default chart of accounts and cooperative settings.
//!
//! Safe to run repeatedly: existing account codes and stored settings are
//! left alone.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use koperasi_db::{connect, seed::seed_defaults};
use koperasi_shared::{AppConfig, StoreBackend};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "koperasi_db=info,seeder=info".into()),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    if config.store.backend == StoreBackend::Memory {
        warn!("Seeding the memory backend has no lasting effect; set KOPERASI__STORE__BACKEND=postgres");
    }

    let store = connect(&config.store).await?;
    let summary = seed_defaults(&store).await?;

    info!(
        backend = store.backend_name(),
        accounts_created = summary.accounts_created,
        settings_written = summary.settings_written,
        "Seeding complete"
    );
    Ok(())
}
