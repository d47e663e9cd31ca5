//! Wiring of configuration, store and clients for one CLI invocation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use lendsqr_business::{
    BusinessConfig, Dashboard, FileStore, KeyValueStore, Session, UsersApi, UsersCache,
};
use tracing::debug;

/// Everything a command needs, built once from configuration.
pub struct AppContext {
    pub config: BusinessConfig,
    pub api: UsersApi,
    pub cache: UsersCache,
    pub session: Session,
}

impl AppContext {
    /// Reads the environment, then applies the `--api-url` / `--data-dir`
    /// overrides.
    pub fn load(api_url: Option<String>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config =
            BusinessConfig::from_env().context("Failed to read configuration from environment")?;
        if let Some(api_url) = api_url {
            config = config.with_api_base_url(api_url);
        }
        if let Some(data_dir) = data_dir {
            config = config.with_data_dir(data_dir);
        }
        Ok(Self::new(config))
    }

    pub fn new(config: BusinessConfig) -> Self {
        debug!(
            api = config.api_base_url(),
            data_dir = %config.data_dir().display(),
            "building app context"
        );
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.data_dir()));
        Self {
            api: UsersApi::new(config.api_base_url()),
            cache: UsersCache::new(store.clone()),
            session: Session::new(store),
            config,
        }
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.api.clone(), self.cache.clone())
    }
}
