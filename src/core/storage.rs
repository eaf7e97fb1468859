//! Durable key-value storage for notification bookkeeping.
//!
//! Dedup records, new-item markers and the latched notification permission all
//! live here as plain string pairs. Two backends exist: a single JSON file on
//! disk ([`LocalStorage`]) and the `kv_state` SQL table ([`SqlKeyValueStore`]).
//! The local file also hosts the fallback food collection under one fixed key.

use crate::{
    entities::{KvState, kv_state},
    errors::{Error, Result},
};
use async_trait::async_trait;
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::OnConflict};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};
use tracing::{debug, warn};

/// String key-value storage shared by the notification engine and tracker.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// All pairs whose key starts with `prefix`.
    async fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>>;
}

/// A JSON object file of string keys to string values.
///
/// Every mutation rewrites the whole file through a temp file and rename, so a
/// crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct LocalStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl LocalStorage {
    /// Opens the storage file at `path`, starting empty if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or is not a JSON
    /// object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            BTreeMap::new()
        };
        debug!("Opened local storage at {:?} with {} keys", path, entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Synchronous read of a single key.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    /// Synchronous write of a single key. The in-memory map only changes once
    /// the file write succeeds.
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock()?;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    /// Synchronous removal of a single key.
    pub fn remove_item(&self, key: &str) -> Result<()> {
        let mut entries = self.lock()?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    /// Read-modify-write of a single key under one lock.
    ///
    /// `f` sees the current value and returns the replacement, or `None` to
    /// leave the key untouched. An error from `f` aborts without writing.
    pub fn update_item<F>(&self, key: &str, f: F) -> Result<()>
    where
        F: FnOnce(Option<&str>) -> Result<Option<String>>,
    {
        let mut entries = self.lock()?;
        let Some(value) = f(entries.get(key).map(String::as_str))? else {
            return Ok(());
        };
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| Error::persistence(format!("local storage lock poisoned: {e}")))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?).inspect_err(|e| {
            warn!("Failed to write local storage {:?}: {}", tmp, e);
        })?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_item(key)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_item(key, value)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.remove_item(key)
    }

    async fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        Ok(self
            .lock()?
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

/// Key-value storage on the `kv_state` table.
#[derive(Debug, Clone)]
pub struct SqlKeyValueStore {
    db: DatabaseConnection,
}

impl SqlKeyValueStore {
    /// Wraps an existing connection. Tables must already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KeyValueStore for SqlKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(KvState::find()
            .filter(kv_state::Column::Key.eq(key))
            .one(&self.db)
            .await?
            .map(|state| state.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let state = kv_state::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };

        // Single statement so concurrent writers of one key cannot collide
        KvState::insert(state)
            .on_conflict(
                OnConflict::column(kv_state::Column::Key)
                    .update_columns([kv_state::Column::Value, kv_state::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        KvState::delete_many()
            .filter(kv_state::Column::Key.eq(key))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        Ok(KvState::find()
            .filter(kv_state::Column::Key.starts_with(prefix))
            .order_by_asc(kv_state::Column::Key)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|state| (state.key, state.value))
            .collect())
    }
}
