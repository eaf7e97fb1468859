//! Expiry notification policy.
//!
//! The engine owns a latched permission state and decides, for a snapshot of
//! tracked items, which notifications to emit. At most one notification goes
//! out per item per calendar day; the marker recording that lives in the
//! injected [`KeyValueStore`] under `notification-{itemId}-{YYYY-MM-DD}` and is
//! pruned by a daily sweep once it is more than a week old.

use crate::{
    core::{
        expiry::{days_until, is_expiring, today_local},
        notifier::{Notification, Notifier, Urgency},
        storage::KeyValueStore,
    },
    entities::food_item,
    errors::Result,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::{fmt, str::FromStr, sync::Arc, time::Duration};
use tokio::{
    sync::{Mutex, watch},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, error, info, warn};

/// Storage key of the latched permission state.
pub const PERMISSION_KEY: &str = "keepfresh-notification-permission";
/// Prefix of per-item-per-day dedup records.
pub const DEDUP_PREFIX: &str = "notification-";
/// Prefix of new-item markers.
pub const NEW_ITEM_PREFIX: &str = "new-item-";
/// Dedup records and new-item markers older than this are swept.
pub const RETENTION_DAYS: i64 = 7;
/// Interval between sweeps.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Dedup key for `item_id` on `day`.
#[must_use]
pub fn dedup_key(item_id: &str, day: NaiveDate) -> String {
    format!("{DEDUP_PREFIX}{item_id}-{}", day.format(DAY_FORMAT))
}

/// New-item marker key for `item_id`.
#[must_use]
pub fn new_item_key(item_id: &str) -> String {
    format!("{NEW_ITEM_PREFIX}{item_id}")
}

// Item ids may contain dashes, so the day is read from the end of the key.
fn dedup_key_day(key: &str) -> Option<NaiveDate> {
    let rest = key.strip_prefix(DEDUP_PREFIX)?;
    let split = rest.len().checked_sub(DAY_FORMAT_LEN)?;
    let head = rest.get(..split)?;
    let day = rest.get(split..)?;
    if !head.ends_with('-') || head.len() < 2 {
        return None;
    }
    NaiveDate::parse_from_str(day, DAY_FORMAT).ok()
}

const DAY_FORMAT_LEN: usize = "YYYY-MM-DD".len();

/// Whether the user allows notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Never asked
    #[default]
    Default,
    /// Notifications allowed
    Granted,
    /// Notifications refused; the engine does nothing
    Denied,
}

impl Permission {
    /// Stored form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            other => Err(format!("unknown permission '{other}'")),
        }
    }
}

/// Asks the platform (or user) for notification permission.
#[async_trait]
pub trait PermissionRequester: Send + Sync {
    /// Performs the request. Should answer `Granted` or `Denied`.
    async fn request_permission(&self) -> Permission;
}

/// Answers every request with a configured value.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredPermission(pub Permission);

#[async_trait]
impl PermissionRequester for ConfiguredPermission {
    async fn request_permission(&self) -> Permission {
        self.0
    }
}

/// Presentation settings for emitted notifications.
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    /// Icon attached to every notification
    pub icon: String,
    /// Age in days after which dedup records are swept
    pub retention_days: i64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            icon: "/KeepFresh.png".to_string(),
            retention_days: RETENTION_DAYS,
        }
    }
}

/// Title, body and urgency for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    /// Headline
    pub title: String,
    /// Message text
    pub body: String,
    /// Presentation emphasis
    pub urgency: Urgency,
}

/// Picks the message for an item with `days` left, or `None` if it is not
/// expiring yet.
#[must_use]
pub fn compose_message(name: &str, days: i64) -> Option<NotificationMessage> {
    let (title, body, urgency) = match days {
        d if d < 0 => {
            let ago = d.unsigned_abs();
            let unit = if ago == 1 { "day" } else { "days" };
            (
                "❌ Food Has Expired!",
                format!(
                    "{name} already expired {ago} {unit} ago. Check it before eating or throw it out."
                ),
                Urgency::High,
            )
        }
        0 => (
            "⚠️ Food Expires Today!",
            format!("{name} expires today. Use it now or it will go to waste!"),
            Urgency::High,
        ),
        1 => (
            "🚨 Food Expires Tomorrow!",
            format!("{name} expires tomorrow. Plan to use it soon!"),
            Urgency::High,
        ),
        d if is_expiring(d) => (
            "⏰ Food Expiring Soon",
            format!("{name} expires in {d} days. Consider using it soon!"),
            Urgency::Normal,
        ),
        _ => return None,
    };

    Some(NotificationMessage {
        title: title.to_string(),
        body,
        urgency,
    })
}

/// Outcome of one notification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Permission state the pass ran under
    pub permission: Permission,
    /// Number of items at or below the expiring threshold
    pub expiring: usize,
    /// Item ids notified in this pass
    pub sent: Vec<String>,
    /// Item ids already notified today
    pub skipped: Vec<String>,
    /// Item ids whose delivery failed; they are retried on the next pass
    pub failed: Vec<String>,
}

/// Decides and emits expiry notifications.
pub struct NotificationEngine {
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    requester: Arc<dyn PermissionRequester>,
    settings: NotificationSettings,
    activation: Mutex<()>,
    passes: Mutex<()>,
}

impl NotificationEngine {
    /// Builds an engine from its collaborators.
    #[must_use]
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        requester: Arc<dyn PermissionRequester>,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            storage,
            notifier,
            requester,
            settings,
            activation: Mutex::new(()),
            passes: Mutex::new(()),
        }
    }

    /// Current latched permission. Unknown stored values read as `Default`.
    pub async fn permission(&self) -> Result<Permission> {
        let stored = self.storage.get(PERMISSION_KEY).await?;
        Ok(stored.map_or(Permission::Default, |raw| {
            raw.parse().unwrap_or_else(|e| {
                warn!("Ignoring stored notification permission: {}", e);
                Permission::Default
            })
        }))
    }

    /// Changes the permission out-of-band (e.g. the user toggling alerts).
    pub async fn set_permission(&self, permission: Permission) -> Result<()> {
        self.storage.set(PERMISSION_KEY, permission.as_str()).await?;
        info!("Notification permission set to {}", permission);
        Ok(())
    }

    /// Requests permission if it has never been asked for, and latches the
    /// answer. Once answered the engine never asks again.
    pub async fn activate(&self) -> Result<Permission> {
        let _guard = self.activation.lock().await;

        let current = self.permission().await?;
        if current != Permission::Default {
            debug!("Notification permission already {}", current);
            return Ok(current);
        }

        let answer = match self.requester.request_permission().await {
            Permission::Granted => Permission::Granted,
            Permission::Default | Permission::Denied => Permission::Denied,
        };
        self.set_permission(answer).await?;
        if answer == Permission::Granted {
            info!("🔔 Notifications enabled: alerts will be sent when food is expiring soon");
        }
        Ok(answer)
    }

    /// Runs one notification pass over `items` as of `today`.
    ///
    /// Does nothing unless permission is granted. Each item's delivery is
    /// isolated: a failure is logged, recorded in the report and leaves no
    /// dedup record, so the next pass tries again.
    pub async fn check_items(
        &self,
        items: &[food_item::Model],
        today: NaiveDate,
    ) -> Result<PassReport> {
        // One pass at a time, or two passes could both miss the same dedup record.
        let _pass = self.passes.lock().await;

        let permission = self.permission().await?;
        let mut report = PassReport {
            permission,
            ..PassReport::default()
        };

        if permission != Permission::Granted {
            debug!("🚫 Notifications not permitted ({}), skipping pass", permission);
            return Ok(report);
        }

        for item in items {
            let days = days_until(item.expiry_date, today);
            let Some(message) = compose_message(&item.name, days) else {
                continue;
            };
            report.expiring += 1;

            let key = dedup_key(&item.id, today);
            match self.storage.get(&key).await {
                Ok(Some(_)) => {
                    debug!("🔇 Already notified today for: {}", item.name);
                    report.skipped.push(item.id.clone());
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Could not read dedup record for {}: {}", item.name, e);
                    report.failed.push(item.id.clone());
                    continue;
                }
            }

            let notification = Notification {
                title: message.title,
                body: message.body,
                icon: self.settings.icon.clone(),
                tag: item.id.clone(),
                urgency: message.urgency,
            };

            match self.notifier.notify(&notification).await {
                Ok(()) => {
                    if let Err(e) = self.storage.set(&key, "sent").await {
                        warn!("Sent notification for {} but could not record it: {}", item.name, e);
                    }
                    info!("📢 Notification sent for: {} ({} days left)", item.name, days);
                    report.sent.push(item.id.clone());
                }
                Err(e) => {
                    error!("❌ Failed to send notification for {}: {}", item.name, e);
                    report.failed.push(item.id.clone());
                }
            }
        }

        Ok(report)
    }

    /// Deletes dedup records and new-item markers older than the retention
    /// window. Keys whose day cannot be read are left alone. Returns how many
    /// entries were removed.
    pub async fn sweep(&self, today: NaiveDate) -> Result<usize> {
        let retention = self.settings.retention_days;
        let is_stale = |day: NaiveDate| days_until(today, day) > retention;

        let dedup = self.storage.entries_with_prefix(DEDUP_PREFIX).await?;
        let markers = self.storage.entries_with_prefix(NEW_ITEM_PREFIX).await?;

        let stale: Vec<String> = dedup
            .into_iter()
            .filter(|(key, _)| dedup_key_day(key).is_some_and(is_stale))
            .map(|(key, _)| key)
            .chain(
                markers
                    .into_iter()
                    .filter(|(_, value)| {
                        NaiveDate::parse_from_str(value.trim(), DAY_FORMAT)
                            .is_ok_and(is_stale)
                    })
                    .map(|(key, _)| key),
            )
            .collect();

        let mut removed = 0;
        for key in stale {
            match self.storage.remove(&key).await {
                Ok(()) => removed += 1,
                Err(e) => warn!("Could not prune {}: {}", key, e),
            }
        }

        if removed > 0 {
            info!("🧹 Pruned {} old notification records", removed);
        }
        Ok(removed)
    }

    /// Runs [`Self::sweep`] immediately and then once per `period`.
    pub fn spawn_sweeper(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = self.sweep(today_local()).await {
                    error!("Notification sweep failed: {}", e);
                }
            }
        })
    }

    /// Re-runs a pass whenever the tracked item set changes, and once per
    /// `recheck` so that day rollovers are noticed. Stops when the item
    /// source is dropped.
    pub fn spawn_watcher(
        self: Arc<Self>,
        mut items: watch::Receiver<Vec<food_item::Model>>,
        recheck: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(recheck);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    changed = items.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {}
                }

                let snapshot = items.borrow_and_update().clone();
                if snapshot.is_empty() {
                    continue;
                }
                if let Err(e) = self.check_items(&snapshot, today_local()).await {
                    error!("Notification pass failed: {}", e);
                }
            }
            debug!("Item source closed, notification watcher stopping");
        })
    }
}
