//! Food persistence gateway.
//!
//! [`FoodStore`] is the only writer of the canonical food collection. The
//! remote implementation talks to the `food_items` SQL table; the local
//! fallback keeps a serialized array under one key of a [`LocalStorage`] file.
//! Which one runs is decided once at startup, see `config::storage`.

use crate::{
    core::{category::Category, storage::LocalStorage},
    entities::{FoodItem, food_item},
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::sync::Arc;
use tracing::{info, warn};

/// Key under which the fallback store keeps its serialized collection.
pub const LOCAL_ITEMS_KEY: &str = "keepfresh-food-items";

/// Longest accepted food name, in characters. Names are shown as Discord
/// embed field titles, which are capped at 256.
pub const MAX_NAME_LEN: usize = 100;

/// Payload for a new food item. `id` and `created_at` are filled in by the
/// store when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFoodItem {
    /// Display name
    pub name: String,
    /// Category display name; must match one of [`Category::ALL`]
    pub category: String,
    /// Calendar day the food expires on
    pub expiry_date: NaiveDate,
    /// Pre-assigned id, if the caller already has one
    pub id: Option<String>,
    /// Pre-assigned creation time
    pub created_at: Option<DateTime<Utc>>,
}

impl NewFoodItem {
    /// Builds a payload without pre-assigned identity.
    #[must_use]
    pub fn new(name: impl Into<String>, category: Category, expiry_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            category: category.as_str().to_string(),
            expiry_date,
            id: None,
            created_at: None,
        }
    }

    /// Validates the payload and assigns missing identity fields.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFoodItem`] for an empty name or unknown category.
    pub fn into_model(self) -> Result<food_item::Model> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidFoodItem {
                message: "Food name cannot be empty".to_string(),
            });
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(Error::InvalidFoodItem {
                message: format!("Food name cannot be longer than {MAX_NAME_LEN} characters"),
            });
        }
        let category: Category = self.category.parse()?;

        Ok(food_item::Model {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: name.to_string(),
            category: category.as_str().to_string(),
            expiry_date: self.expiry_date,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        })
    }
}

/// List, insert and delete over the single food collection.
#[async_trait]
pub trait FoodStore: Send + Sync {
    /// All items ordered by ascending expiry date. Ties are in no particular order.
    async fn list(&self) -> Result<Vec<food_item::Model>>;

    /// Persists a new item and returns the stored record.
    async fn insert(&self, item: NewFoodItem) -> Result<food_item::Model>;

    /// Removes an item. Deleting an unknown id succeeds.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Remote store on the `food_items` table.
#[derive(Debug, Clone)]
pub struct SqlFoodStore {
    db: DatabaseConnection,
}

impl SqlFoodStore {
    /// Wraps an existing connection. Tables must already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FoodStore for SqlFoodStore {
    async fn list(&self) -> Result<Vec<food_item::Model>> {
        FoodItem::find()
            .order_by_asc(food_item::Column::ExpiryDate)
            .all(&self.db)
            .await
            .map_err(Error::persistence)
    }

    async fn insert(&self, item: NewFoodItem) -> Result<food_item::Model> {
        let model = item.into_model()?;

        let active = food_item::ActiveModel {
            id: Set(model.id),
            name: Set(model.name),
            category: Set(model.category),
            expiry_date: Set(model.expiry_date),
            created_at: Set(model.created_at),
        };
        let stored = active.insert(&self.db).await.map_err(Error::persistence)?;
        info!("Stored food item '{}' ({})", stored.name, stored.id);
        Ok(stored)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let result = FoodItem::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(Error::persistence)?;
        info!("Deleted food item {} ({} rows)", id, result.rows_affected);
        Ok(())
    }
}

/// Fallback store keeping the collection as one JSON array in local storage.
#[derive(Debug, Clone)]
pub struct LocalFoodStore {
    storage: Arc<LocalStorage>,
}

impl LocalFoodStore {
    /// Uses `storage` as the backing file.
    #[must_use]
    pub const fn new(storage: Arc<LocalStorage>) -> Self {
        Self { storage }
    }

    /// Parses the stored array. A corrupt array reads as an empty collection.
    fn parse(raw: Option<&str>) -> Vec<food_item::Model> {
        raw.map_or_else(Vec::new, |raw| {
            serde_json::from_str(raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable food collection in local storage: {}", e);
                Vec::new()
            })
        })
    }

    /// Applies `change` to the collection under the storage lock. `change`
    /// returns whether anything changed; unchanged collections are not written.
    fn modify<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<food_item::Model>) -> Result<bool>,
    {
        self.storage
            .update_item(LOCAL_ITEMS_KEY, |raw| {
                let mut items = Self::parse(raw);
                if change(&mut items)? {
                    Ok(Some(serde_json::to_string(&items)?))
                } else {
                    Ok(None)
                }
            })
            .map_err(|e| match e {
                Error::Persistence { .. } => e,
                other => Error::persistence(other),
            })
    }
}

#[async_trait]
impl FoodStore for LocalFoodStore {
    async fn list(&self) -> Result<Vec<food_item::Model>> {
        let raw = self.storage.get_item(LOCAL_ITEMS_KEY)?;
        let mut items = Self::parse(raw.as_deref());
        items.sort_by_key(|item| item.expiry_date);
        Ok(items)
    }

    async fn insert(&self, item: NewFoodItem) -> Result<food_item::Model> {
        let model = item.into_model()?;
        self.modify(|items| {
            if items.iter().any(|existing| existing.id == model.id) {
                return Err(Error::persistence(format!(
                    "a food item with id {} already exists",
                    model.id
                )));
            }
            items.push(model.clone());
            Ok(true)
        })?;
        info!("Stored food item '{}' ({}) locally", model.name, model.id);
        Ok(model)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.modify(|items| {
            let before = items.len();
            items.retain(|item| item.id != id);
            Ok(items.len() != before)
        })?;
        info!("Deleted food item {} locally", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{date_in, setup_test_db};

    async fn local_store() -> Result<(tempfile::TempDir, LocalFoodStore)> {
        let dir = tempfile::tempdir()?;
        let storage = Arc::new(LocalStorage::open(dir.path().join("keepfresh.json"))?);
        Ok((dir, LocalFoodStore::new(storage)))
    }

    async fn check_insert_then_list(store: &dyn FoodStore) -> Result<()> {
        store
            .insert(NewFoodItem::new("Yogurt", Category::Dairy, date_in(5)))
            .await?;
        let milk = store
            .insert(NewFoodItem::new("Milk", Category::Dairy, date_in(1)))
            .await?;
        store
            .insert(NewFoodItem::new("Rice", Category::Grains, date_in(30)))
            .await?;

        assert!(!milk.id.is_empty());
        assert!(milk.created_at <= Utc::now());

        let items = store.list().await?;
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], milk);
        assert!(
            items
                .windows(2)
                .all(|pair| pair[0].expiry_date <= pair[1].expiry_date)
        );
        Ok(())
    }

    async fn check_delete_is_idempotent(store: &dyn FoodStore) -> Result<()> {
        let item = store
            .insert(NewFoodItem::new("Salmon", Category::Seafood, date_in(2)))
            .await?;
        store
            .insert(NewFoodItem::new("Apple", Category::Fruits, date_in(7)))
            .await?;

        store.delete(&item.id).await?;
        assert_eq!(store.list().await?.len(), 1);

        store.delete(&item.id).await?;
        store.delete("never-existed").await?;
        assert_eq!(store.list().await?.len(), 1);
        Ok(())
    }

    async fn check_duplicate_id_is_rejected(store: &dyn FoodStore) -> Result<()> {
        let mut first = NewFoodItem::new("Milk", Category::Dairy, date_in(2));
        first.id = Some("same".to_string());
        let mut second = NewFoodItem::new("Cream", Category::Dairy, date_in(4));
        second.id = Some("same".to_string());

        store.insert(first).await?;
        let result = store.insert(second).await;
        assert!(matches!(result, Err(Error::Persistence { .. })));

        let items = store.list().await?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Milk");
        Ok(())
    }

    #[tokio::test]
    async fn test_sql_rejects_duplicate_id() -> Result<()> {
        let store = SqlFoodStore::new(setup_test_db().await?);
        check_duplicate_id_is_rejected(&store).await
    }

    #[tokio::test]
    async fn test_local_rejects_duplicate_id() -> Result<()> {
        let (_dir, store) = local_store().await?;
        check_duplicate_id_is_rejected(&store).await
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_local_concurrent_inserts_are_all_kept() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("keepfresh.json");
        let store = Arc::new(LocalFoodStore::new(Arc::new(LocalStorage::open(&path)?)));

        let inserts: Vec<_> = (0..64)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .insert(NewFoodItem::new(format!("Item {i}"), Category::Other, date_in(i)))
                        .await
                })
            })
            .collect();
        for insert in inserts {
            insert.await.unwrap()?;
        }
        assert_eq!(store.list().await?.len(), 64);

        let reloaded = LocalFoodStore::new(Arc::new(LocalStorage::open(&path)?));
        assert_eq!(reloaded.list().await?.len(), 64);
        Ok(())
    }

    #[tokio::test]
    async fn test_sql_insert_then_list() -> Result<()> {
        let store = SqlFoodStore::new(setup_test_db().await?);
        check_insert_then_list(&store).await
    }

    #[tokio::test]
    async fn test_sql_delete_is_idempotent() -> Result<()> {
        let store = SqlFoodStore::new(setup_test_db().await?);
        check_delete_is_idempotent(&store).await
    }

    #[tokio::test]
    async fn test_local_insert_then_list() -> Result<()> {
        let (_dir, store) = local_store().await?;
        check_insert_then_list(&store).await
    }

    #[tokio::test]
    async fn test_local_delete_is_idempotent() -> Result<()> {
        let (_dir, store) = local_store().await?;
        check_delete_is_idempotent(&store).await
    }

    #[tokio::test]
    async fn test_local_store_survives_reload() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("keepfresh.json");
        let store = LocalFoodStore::new(Arc::new(LocalStorage::open(&path)?));
        let stored = store
            .insert(NewFoodItem::new("Cheese", Category::Dairy, date_in(10)))
            .await?;
        drop(store);

        let reloaded = LocalFoodStore::new(Arc::new(LocalStorage::open(&path)?));
        assert_eq!(reloaded.list().await?, vec![stored]);
        Ok(())
    }

    #[tokio::test]
    async fn test_local_corrupt_collection_reads_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = Arc::new(LocalStorage::open(dir.path().join("keepfresh.json"))?);
        storage.set_item(LOCAL_ITEMS_KEY, "[{broken")?;

        let store = LocalFoodStore::new(storage);
        assert!(store.list().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_insert_keeps_preassigned_identity() -> Result<()> {
        let (_dir, store) = local_store().await?;
        let created_at = Utc::now() - chrono::Duration::hours(2);
        let mut item = NewFoodItem::new("Bread", Category::Grains, date_in(3));
        item.id = Some("fixed-id".to_string());
        item.created_at = Some(created_at);

        let stored = store.insert(item).await?;
        assert_eq!(stored.id, "fixed-id");
        assert_eq!(stored.created_at, created_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_insert_validation() -> Result<()> {
        let (_dir, store) = local_store().await?;

        let result = store
            .insert(NewFoodItem::new("   ", Category::Other, date_in(1)))
            .await;
        assert!(matches!(result, Err(Error::InvalidFoodItem { .. })));

        let mut unknown = NewFoodItem::new("Chips", Category::Other, date_in(1));
        unknown.category = "Snacks".to_string();
        let result = store.insert(unknown).await;
        assert!(matches!(result, Err(Error::InvalidFoodItem { .. })));

        assert!(store.list().await?.is_empty());
        Ok(())
    }

    #[test]
    fn test_name_length_is_capped() {
        let longest = "a".repeat(MAX_NAME_LEN);
        assert!(NewFoodItem::new(longest, Category::Other, date_in(1)).into_model().is_ok());

        let too_long = "a".repeat(MAX_NAME_LEN + 1);
        let result = NewFoodItem::new(too_long, Category::Other, date_in(1)).into_model();
        assert!(matches!(result, Err(Error::InvalidFoodItem { .. })));

        // Counted in characters, not bytes
        let wide = "🥛".repeat(MAX_NAME_LEN);
        assert!(NewFoodItem::new(wide, Category::Other, date_in(1)).into_model().is_ok());
    }

    #[tokio::test]
    async fn test_sql_insert_fails_when_unreachable() -> Result<()> {
        let db = sea_orm::Database::connect("sqlite::memory:").await?;
        // No tables created: every write is rejected by the backend.
        let store = SqlFoodStore::new(db);
        let result = store
            .insert(NewFoodItem::new("Milk", Category::Dairy, date_in(1)))
            .await;
        assert!(matches!(result, Err(Error::Persistence { .. })));
        Ok(())
    }
}
