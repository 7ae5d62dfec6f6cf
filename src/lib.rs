pub mod categories;
pub mod config;
pub mod error;
pub mod rest;
pub mod storage;
pub mod tasks;

use std::sync::Arc;

use anyhow::Result;

use categories::CategoryStore;
use config::ServerConfig;
use storage::Storage;
use tasks::TaskStore;

/// Shared application state passed to every request handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub tasks: TaskStore,
    pub categories: CategoryStore,
    pub started_at: std::time::Instant,
}

impl AppContext {
    /// Open the database under `config.data_dir` and build the stores.
    pub async fn init(config: Arc<ServerConfig>) -> Result<Self> {
        let storage = Storage::new(&config.data_dir).await?;
        let pool = storage.pool();
        Ok(Self {
            config,
            tasks: TaskStore::new(pool.clone()),
            categories: CategoryStore::new(pool),
            started_at: std::time::Instant::now(),
        })
    }
}
