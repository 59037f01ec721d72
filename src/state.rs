use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db::{DocStore, MemDocStore, PgDocStore};
use crate::ws::SessionManager;

/// Shared application state handed to every route and connection
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocStore>,
    /// Name of the store backend, reported by the readiness check
    pub store_backend: &'static str,
    pub sessions: SessionManager,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn DocStore>, store_backend: &'static str) -> Self {
        let sessions = SessionManager::new(store.clone(), config.persist_policy());
        Self {
            config,
            store,
            store_backend,
            sessions,
        }
    }

    /// Build state with the store the configuration asks for.
    ///
    /// Falls back to the in-memory store when no database URL is set or the
    /// database cannot be reached.
    pub async fn from_config(config: Config) -> Self {
        if let Some(db_url) = &config.db_url {
            match PgDocStore::connect(db_url).await {
                Ok(store) => match store.ensure_schema().await {
                    Ok(()) => {
                        info!("Database initialized successfully");
                        return Self::new(config, Arc::new(store), "postgres");
                    }
                    Err(e) => error!("Failed to prepare database schema: {}", e),
                },
                Err(e) => error!("Failed to initialize database: {}", e),
            }
            warn!("Falling back to in-memory document store");
        } else {
            warn!("No database URL configured - documents are kept in memory only");
        }
        Self::new(config, Arc::new(MemDocStore::new()), "memory")
    }
}
