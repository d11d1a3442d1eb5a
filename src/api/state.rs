use anyhow::Result;
use std::sync::Arc;

use crate::browser::BrowserManager;
use crate::config::Config;
use crate::models::BackupReason;
use crate::store::{KvStore, PromptStore};

/// Shared application state
pub struct AppState {
    /// The single driven browser session
    pub browser: Arc<BrowserManager>,

    /// Prompt library persistence
    pub store: PromptStore,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let kv = KvStore::open(&config.store_path)?;
        let store = PromptStore::new(kv);

        // Startup snapshot of the library; rate-limited and never fatal.
        if let Err(e) = store.create_backup(BackupReason::Startup) {
            tracing::error!("Startup backup failed: {}", e);
        }

        Ok(Self {
            browser: Arc::new(BrowserManager::new()),
            store,
        })
    }
}
