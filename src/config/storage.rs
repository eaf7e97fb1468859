//! Storage backend selection.
//!
//! The choice between the remote SQL backend and the local file fallback is
//! made exactly once, here, from configuration. Business logic only ever sees
//! the [`FoodStore`] and [`KeyValueStore`] traits.

use crate::{
    config::{database, settings::StorageConfig},
    core::{
        storage::{KeyValueStore, LocalStorage, SqlKeyValueStore},
        store::{FoodStore, LocalFoodStore, SqlFoodStore},
    },
    errors::Result,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Which backend was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Remote SQL database
    Remote,
    /// Local JSON file
    Local,
}

/// The opened stores.
pub struct Backends {
    /// Which backend these came from
    pub kind: BackendKind,
    /// Food collection gateway
    pub food_store: Arc<dyn FoodStore>,
    /// Notification bookkeeping storage
    pub storage: Arc<dyn KeyValueStore>,
}

/// Opens the remote backend when a database URL is configured, otherwise the
/// local fallback file.
///
/// # Errors
/// Returns an error if the remote database cannot be reached or its tables
/// cannot be created, or if the local file exists but is unreadable.
pub async fn open_backends(config: &StorageConfig) -> Result<Backends> {
    if let Some(url) = config.remote_url() {
        let db = database::create_connection(url).await?;
        database::create_tables(&db).await?;
        info!("✅ Using remote database");
        return Ok(Backends {
            kind: BackendKind::Remote,
            food_store: Arc::new(SqlFoodStore::new(db.clone())),
            storage: Arc::new(SqlKeyValueStore::new(db)),
        });
    }

    warn!(
        "⚠️ No DATABASE_URL configured, using local file fallback at {:?}",
        config.local_path
    );
    let storage = Arc::new(LocalStorage::open(&config.local_path)?);
    Ok(Backends {
        kind: BackendKind::Local,
        food_store: Arc::new(LocalFoodStore::new(Arc::clone(&storage))),
        storage,
    })
}
