//! Tracker service - the in-memory view of the food collection.
//!
//! The store stays the only writer of the canonical collection; the tracker
//! keeps a derived copy that is updated only after a write succeeds, and
//! publishes every change so the notification watcher can react.

use crate::{
    core::{
        expiry::{days_until, is_expiring},
        notification::new_item_key,
        storage::KeyValueStore,
        store::{FoodStore, NewFoodItem},
    },
    entities::food_item,
    errors::Result,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Food collection plus its in-memory read copy.
pub struct FoodTracker {
    store: Arc<dyn FoodStore>,
    storage: Arc<dyn KeyValueStore>,
    items: watch::Sender<Vec<food_item::Model>>,
}

impl FoodTracker {
    /// Creates a tracker with an empty copy. Call [`Self::load`] to populate it.
    #[must_use]
    pub fn new(store: Arc<dyn FoodStore>, storage: Arc<dyn KeyValueStore>) -> Self {
        let (items, _) = watch::channel(Vec::new());
        Self {
            store,
            storage,
            items,
        }
    }

    /// Replaces the copy with the store's current contents.
    pub async fn load(&self) -> Result<usize> {
        let items = self.store.list().await?;
        let count = items.len();
        self.items.send_replace(items);
        info!("✅ Loaded {} food items", count);
        Ok(count)
    }

    /// Persists a new item, then adds it to the copy in expiry order.
    ///
    /// # Errors
    /// Validation and persistence errors are returned as-is and leave the copy
    /// unchanged.
    pub async fn add(&self, item: NewFoodItem) -> Result<food_item::Model> {
        let stored = self.store.insert(item).await?;

        let added_on = stored.created_at.date_naive().format("%Y-%m-%d").to_string();
        if let Err(e) = self.storage.set(&new_item_key(&stored.id), &added_on).await {
            warn!("Could not mark {} as new: {}", stored.name, e);
        }

        self.items.send_modify(|items| {
            items.push(stored.clone());
            items.sort_by_key(|item| item.expiry_date);
        });
        info!("➕ Added '{}' expiring {}", stored.name, stored.expiry_date);
        Ok(stored)
    }

    /// Deletes an item and drops it from the copy.
    ///
    /// # Errors
    /// Persistence errors leave the copy unchanged.
    pub async fn remove(&self, id: &str) -> Result<()> {
        self.store.delete(id).await?;

        self.items.send_modify(|items| items.retain(|item| item.id != id));
        if let Err(e) = self.storage.remove(&new_item_key(id)).await {
            warn!("Could not clear new-item marker for {}: {}", id, e);
        }
        info!("🗑️ Removed food item {}", id);
        Ok(())
    }

    /// Snapshot of the copy, ascending by expiry date.
    #[must_use]
    pub fn items(&self) -> Vec<food_item::Model> {
        self.items.borrow().clone()
    }

    /// Receiver that observes every change to the copy.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<food_item::Model>> {
        self.items.subscribe()
    }

    /// Items with three days or fewer left (expired included), paired with
    /// their day offset.
    #[must_use]
    pub fn expiring(&self, today: NaiveDate) -> Vec<(food_item::Model, i64)> {
        self.items
            .borrow()
            .iter()
            .map(|item| (item.clone(), days_until(item.expiry_date, today)))
            .filter(|(_, days)| is_expiring(*days))
            .collect()
    }

    /// Looks an item up by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<food_item::Model> {
        self.items.borrow().iter().find(|item| item.id == id).cloned()
    }

    /// First item whose name matches case-insensitively.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<food_item::Model> {
        let wanted = name.trim();
        self.items
            .borrow()
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(wanted))
            .cloned()
    }

    /// Looks an item up by id, falling back to a case-insensitive name match.
    #[must_use]
    pub fn resolve(&self, id_or_name: &str) -> Option<food_item::Model> {
        self.find(id_or_name.trim())
            .or_else(|| self.find_by_name(id_or_name))
    }

    /// Whether the item still carries its new-item marker.
    pub async fn is_new(&self, id: &str) -> bool {
        self.storage
            .get(&new_item_key(id))
            .await
            .ok()
            .flatten()
            .is_some()
    }
}
