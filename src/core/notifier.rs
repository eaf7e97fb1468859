//! Notification delivery surface.
//!
//! The policy engine never talks to a platform directly; it hands a
//! [`Notification`] to whatever [`Notifier`] it was built with. The Discord
//! channel notifier lives in the bot layer. This module provides the
//! framework-agnostic pieces: the message type, a tracing-only notifier and the
//! background delivery agent.

use crate::errors::{Error, Result};
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{
        mpsc::{self, error::TrySendError},
        oneshot,
    },
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

/// Presentation emphasis. Does not affect dedup or emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// Informational reminder
    Normal,
    /// Must be explicitly dismissed where the surface supports it
    High,
}

impl Urgency {
    /// Whether the notification should stay until dismissed.
    #[must_use]
    pub const fn requires_interaction(self) -> bool {
        matches!(self, Self::High)
    }
}

/// A single user-visible alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Headline
    pub title: String,
    /// Message text
    pub body: String,
    /// Icon URL or path
    pub icon: String,
    /// Identity tag, the item id for expiry alerts
    pub tag: String,
    /// Presentation emphasis
    pub urgency: Urgency,
}

/// Something that can show a [`Notification`] to the user.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one notification.
    ///
    /// # Errors
    /// Returns [`crate::errors::Error::NotificationDelivery`] (or a framework
    /// error) when the surface rejects the request.
    async fn notify(&self, notification: &Notification) -> Result<()>;
}

/// Writes notifications to the log. Used when no channel is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        info!(
            tag = %notification.tag,
            urgent = notification.urgency.requires_interaction(),
            "{}: {}",
            notification.title,
            notification.body
        );
        Ok(())
    }
}

/// Tuning for the background delivery agent.
#[derive(Debug, Clone, Copy)]
pub struct AgentOptions {
    /// Queue length before callers fall back to direct delivery
    pub capacity: usize,
    /// Delivery attempts per notification
    pub max_attempts: u32,
    /// Pause between attempts, multiplied by the attempt number
    pub retry_delay: Duration,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            capacity: 64,
            max_attempts: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// A queued notification plus the channel its final outcome is reported on.
type Delivery = (Notification, oneshot::Sender<Result<()>>);

/// Routes notifications through a background delivery task, falling back to
/// direct delivery when the agent is not running or its queue is full.
///
/// `notify` resolves only once the agent has finished with the notification,
/// so a delivery that fails after all retries is reported as a failure.
#[derive(Debug)]
pub struct AgentNotifier<N> {
    queue: mpsc::Sender<Delivery>,
    direct: Arc<N>,
}

/// Starts the delivery agent and returns the routing notifier plus the agent's
/// task handle. The agent stops once the [`AgentNotifier`] is dropped.
pub fn spawn_delivery_agent<N>(
    direct: Arc<N>,
    options: AgentOptions,
) -> (AgentNotifier<N>, JoinHandle<()>)
where
    N: Notifier + 'static,
{
    let (queue, mut inbox) = mpsc::channel::<Delivery>(options.capacity.max(1));
    let agent_direct = Arc::clone(&direct);

    let handle = tokio::spawn(async move {
        info!("Notification delivery agent started");
        while let Some((notification, reply)) = inbox.recv().await {
            let outcome = deliver_with_retry(agent_direct.as_ref(), &notification, options).await;
            if reply.send(outcome).is_err() {
                debug!(tag = %notification.tag, "Caller stopped waiting for delivery outcome");
            }
        }
        info!("Notification delivery agent stopped");
    });

    (AgentNotifier { queue, direct }, handle)
}

async fn deliver_with_retry<N: Notifier + ?Sized>(
    notifier: &N,
    notification: &Notification,
    options: AgentOptions,
) -> Result<()> {
    let attempts = options.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match notifier.notify(notification).await {
            Ok(()) => {
                debug!(tag = %notification.tag, attempt, "Agent delivered notification");
                return Ok(());
            }
            Err(e) if attempt < attempts => {
                warn!(tag = %notification.tag, attempt, "Agent delivery failed, retrying: {}", e);
                tokio::time::sleep(options.retry_delay * attempt).await;
                attempt += 1;
            }
            Err(e) => {
                error!(tag = %notification.tag, "Agent gave up on notification: {}", e);
                return Err(e);
            }
        }
    }
}

#[async_trait]
impl<N: Notifier + 'static> Notifier for AgentNotifier<N> {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        let (reply, outcome) = oneshot::channel();
        match self.queue.try_send((notification.clone(), reply)) {
            Ok(()) => outcome.await.map_err(|_| Error::NotificationDelivery {
                message: "delivery agent stopped before reporting an outcome".to_string(),
            })?,
            Err(TrySendError::Full(_)) => {
                warn!("Delivery agent queue full, notifying directly");
                self.direct.notify(notification).await
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Delivery agent not running, notifying directly");
                self.direct.notify(notification).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingNotifier;

    fn sample(tag: &str) -> Notification {
        Notification {
            title: "⏰ Food Expiring Soon".to_string(),
            body: "Milk expires in 2 days.".to_string(),
            icon: "/KeepFresh.png".to_string(),
            tag: tag.to_string(),
            urgency: Urgency::Normal,
        }
    }

    fn fast_options() -> AgentOptions {
        AgentOptions {
            capacity: 8,
            max_attempts: 3,
            retry_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_agent_delivers_queued_notifications() {
        let direct = Arc::new(RecordingNotifier::new());
        let (agent, handle) = spawn_delivery_agent(Arc::clone(&direct), fast_options());

        agent.notify(&sample("a")).await.ok();
        agent.notify(&sample("b")).await.ok();
        drop(agent);
        handle.await.ok();

        assert_eq!(direct.tags().await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_agent_retries_failed_delivery() {
        let direct = Arc::new(RecordingNotifier::new());
        direct.fail_next(2).await;
        let (agent, handle) = spawn_delivery_agent(Arc::clone(&direct), fast_options());

        assert!(agent.notify(&sample("retry")).await.is_ok());
        drop(agent);
        handle.await.ok();

        assert_eq!(direct.tags().await, vec!["retry"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_direct_when_agent_stopped() {
        let direct = Arc::new(RecordingNotifier::new());
        let (agent, handle) = spawn_delivery_agent(Arc::clone(&direct), fast_options());
        handle.abort();
        let _ = handle.await;

        assert!(agent.notify(&sample("direct")).await.is_ok());
        assert_eq!(direct.tags().await, vec!["direct"]);
    }

    #[tokio::test]
    async fn test_direct_fallback_surfaces_errors() {
        let direct = Arc::new(RecordingNotifier::new());
        direct.fail_next(1).await;
        let (agent, handle) = spawn_delivery_agent(Arc::clone(&direct), fast_options());
        handle.abort();
        let _ = handle.await;

        assert!(agent.notify(&sample("x")).await.is_err());
        assert!(direct.tags().await.is_empty());
    }

    #[tokio::test]
    async fn test_agent_reports_exhausted_retries_as_failure() {
        let direct = Arc::new(RecordingNotifier::new());
        direct.fail_tag("lost").await;
        let (agent, handle) = spawn_delivery_agent(Arc::clone(&direct), fast_options());

        assert!(agent.notify(&sample("lost")).await.is_err());
        assert!(agent.notify(&sample("kept")).await.is_ok());
        drop(agent);
        handle.await.ok();

        assert_eq!(direct.tags().await, vec!["kept"]);
    }

    #[test]
    fn test_urgency_interaction() {
        assert!(Urgency::High.requires_interaction());
        assert!(!Urgency::Normal.requires_interaction());
    }
}
