//! Shared test utilities for `KeepFresh`.
//!
//! This module provides helpers for setting up test databases, building food
//! items relative to today, and test doubles for the notification seams.

use crate::{
    core::{
        expiry::today_local,
        notification::{Permission, PermissionRequester},
        notifier::{Notification, Notifier},
    },
    entities::food_item,
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use std::{
    collections::HashSet,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration as StdDuration,
};
use tokio::sync::Mutex;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all SQL-backed tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// The calendar day `days` from today (negative for the past).
#[must_use]
pub fn date_in(days: i64) -> NaiveDate {
    today_local() + Duration::days(days)
}

/// A food item model expiring `days` from today, not persisted anywhere.
#[must_use]
pub fn item_expiring_in(id: &str, name: &str, days: i64) -> food_item::Model {
    food_item::Model {
        id: id.to_string(),
        name: name.to_string(),
        category: "Other".to_string(),
        expiry_date: date_in(days),
        created_at: Utc::now(),
    }
}

/// Notifier that records what it was asked to deliver and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    failing_tags: Mutex<HashSet<String>>,
    fail_next: Mutex<usize>,
    delay: Mutex<Option<StdDuration>>,
}

impl RecordingNotifier {
    /// A notifier that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the next `count` deliveries regardless of tag.
    pub async fn fail_next(&self, count: usize) {
        *self.fail_next.lock().await = count;
    }

    /// Fails every delivery carrying `tag` until cleared.
    pub async fn fail_tag(&self, tag: &str) {
        self.failing_tags.lock().await.insert(tag.to_string());
    }

    /// Makes every delivery take `delay` before it completes.
    pub async fn delay_each(&self, delay: StdDuration) {
        *self.delay.lock().await = Some(delay);
    }

    /// Stops all configured failures.
    pub async fn clear_failures(&self) {
        self.failing_tags.lock().await.clear();
        *self.fail_next.lock().await = 0;
    }

    /// Everything delivered so far.
    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.lock().await.clone()
    }

    /// Tags of everything delivered so far, in order.
    pub async fn tags(&self) -> Vec<String> {
        self.sent.lock().await.iter().map(|n| n.tag.clone()).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        {
            let mut remaining = self.fail_next.lock().await;
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Error::NotificationDelivery {
                    message: "simulated failure".to_string(),
                });
            }
        }
        if self.failing_tags.lock().await.contains(&notification.tag) {
            return Err(Error::NotificationDelivery {
                message: format!("simulated failure for {}", notification.tag),
            });
        }
        self.sent.lock().await.push(notification.clone());
        Ok(())
    }
}

/// Permission requester with a fixed answer that counts how often it is asked.
#[derive(Debug)]
pub struct CountingRequester {
    answer: Permission,
    calls: AtomicUsize,
}

impl CountingRequester {
    /// Always answers `answer`.
    #[must_use]
    pub const fn new(answer: Permission) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of requests made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionRequester for CountingRequester {
    async fn request_permission(&self) -> Permission {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}
