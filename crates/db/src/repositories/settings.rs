//! Settings repository and the in-process settings handle.
//!
//! Settings are read from `pengaturan/umum` once at startup and held in a
//! [`SettingsHandle`]. Callers take a copy per operation; the handle only
//! changes on an explicit reload or after an update.

use std::sync::Arc;

use koperasi_core::settings::{CooperativeSettings, SettingsError};
use koperasi_shared::AppError;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::retry::Retryable;
use crate::store::{StoreClient, StoreError, collections};

/// Errors from settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsRepoError {
    /// The new settings are invalid.
    #[error(transparent)]
    Invalid(#[from] SettingsError),

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Retryable for SettingsRepoError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_retryable())
    }
}

impl From<SettingsRepoError> for AppError {
    fn from(err: SettingsRepoError) -> Self {
        match err {
            SettingsRepoError::Invalid(e) => e.into(),
            SettingsRepoError::Store(e) => e.into(),
        }
    }
}

/// Shared, explicitly refreshed copy of the settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsHandle {
    inner: Arc<RwLock<CooperativeSettings>>,
}

impl SettingsHandle {
    /// Handle holding `settings`.
    #[must_use]
    pub fn new(settings: CooperativeSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Copy of the current settings.
    pub async fn current(&self) -> CooperativeSettings {
        self.inner.read().await.clone()
    }

    async fn replace(&self, settings: CooperativeSettings) {
        *self.inner.write().await = settings;
    }
}

/// Settings repository.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    store: StoreClient,
    handle: SettingsHandle,
}

impl SettingsRepository {
    /// Creates a repository refreshing `handle`.
    #[must_use]
    pub const fn new(store: StoreClient, handle: SettingsHandle) -> Self {
        Self { store, handle }
    }

    /// The handle this repository refreshes.
    #[must_use]
    pub const fn handle(&self) -> &SettingsHandle {
        &self.handle
    }

    /// Reads the stored settings, or the defaults if none are stored.
    pub async fn load(&self) -> Result<CooperativeSettings, StoreError> {
        let mut txn = self.store.begin().await?;
        let stored: Option<CooperativeSettings> = txn
            .get(collections::SETTINGS, collections::SETTINGS_DOC)
            .await?;
        Ok(stored.unwrap_or_else(|| {
            warn!("No stored settings, using defaults");
            CooperativeSettings::default()
        }))
    }

    /// Re-reads the stored settings into the handle.
    pub async fn reload(&self) -> Result<CooperativeSettings, StoreError> {
        let settings = self.load().await?;
        self.handle.replace(settings.clone()).await;
        info!("Settings reloaded");
        Ok(settings)
    }

    /// Validates, stores and activates new settings.
    pub async fn update(
        &self,
        settings: CooperativeSettings,
    ) -> Result<CooperativeSettings, SettingsRepoError> {
        settings.validate()?;

        let settings_ref = &settings;
        self.store
            .run("settings.update", move || async move {
                let mut txn = self.store.begin().await?;
                txn.set(collections::SETTINGS, collections::SETTINGS_DOC, settings_ref)?;
                txn.commit().await?;
                Ok::<_, SettingsRepoError>(())
            })
            .await?;

        self.handle.replace(settings.clone()).await;
        info!("Settings updated");
        Ok(settings)
    }

    /// Writes the defaults if nothing is stored yet. Returns whether it wrote.
    pub async fn seed_defaults(&self) -> Result<bool, StoreError> {
        self.store
            .run("settings.seed", move || async move {
                let mut txn = self.store.begin().await?;
                let stored = txn
                    .get_raw(collections::SETTINGS, collections::SETTINGS_DOC)
                    .await?;
                if stored.is_some() {
                    return Ok(false);
                }
                txn.set(
                    collections::SETTINGS,
                    collections::SETTINGS_DOC,
                    &CooperativeSettings::default(),
                )?;
                txn.commit().await?;
                Ok::<_, StoreError>(true)
            })
            .await
    }
}
