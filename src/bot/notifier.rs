//! Discord channel notifier.
//!
//! Expiry alerts are posted as embeds to one configured channel. When the
//! delivery agent is enabled the channel notifier sits behind it and is also
//! its direct fallback.

use crate::{
    config::settings::NotificationConfig,
    core::notifier::{
        AgentOptions, LogNotifier, Notification, Notifier, Urgency, spawn_delivery_agent,
    },
    errors::{Error, Result},
};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::info;

const URGENT_COLOR: u32 = 0x00E7_4C3C;
const SOON_COLOR: u32 = 0x00F3_9C12;

/// Posts notifications to a Discord channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    http: Arc<serenity::Http>,
    channel: serenity::ChannelId,
}

impl ChannelNotifier {
    /// Notifier for `channel_id` using the given HTTP client.
    #[must_use]
    pub fn new(http: Arc<serenity::Http>, channel_id: u64) -> Self {
        Self {
            http,
            channel: serenity::ChannelId::new(channel_id),
        }
    }
}

/// Builds the embed for one notification.
#[must_use]
pub fn notification_embed(notification: &Notification) -> serenity::CreateEmbed {
    let color = match notification.urgency {
        Urgency::High => URGENT_COLOR,
        Urgency::Normal => SOON_COLOR,
    };

    let embed = serenity::CreateEmbed::default()
        .title(&notification.title)
        .description(&notification.body)
        .color(color)
        .footer(serenity::CreateEmbedFooter::new("KeepFresh"));

    // Discord only accepts absolute URLs for thumbnails.
    if notification.icon.starts_with("http") {
        embed.thumbnail(&notification.icon)
    } else {
        embed
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        let mut message =
            serenity::CreateMessage::new().embed(notification_embed(notification));
        if notification.urgency.requires_interaction() {
            message = message.content("🔔 **Action needed**");
        }

        self.channel
            .send_message(self.http.as_ref(), message)
            .await
            .map_err(|e| Error::NotificationDelivery {
                message: e.to_string(),
            })?;
        Ok(())
    }
}

/// Chooses the notifier for this run: the channel notifier (optionally behind
/// the delivery agent) when a channel is configured, the log otherwise.
#[must_use]
pub fn build_notifier(config: &NotificationConfig, http: Arc<serenity::Http>) -> Arc<dyn Notifier> {
    let Some(channel_id) = config.channel_id else {
        info!("No notification channel configured, alerts go to the log");
        return Arc::new(LogNotifier);
    };

    let direct = Arc::new(ChannelNotifier::new(http, channel_id));
    if config.use_delivery_agent {
        info!("Routing alerts for channel {} through the delivery agent", channel_id);
        let (agent, _handle) = spawn_delivery_agent(direct, AgentOptions::default());
        Arc::new(agent)
    } else {
        info!("Sending alerts directly to channel {}", channel_id);
        direct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(urgency: Urgency, icon: &str) -> Notification {
        Notification {
            title: "🚨 Food Expires Tomorrow!".to_string(),
            body: "Milk expires tomorrow. Plan to use it soon!".to_string(),
            icon: icon.to_string(),
            tag: "item-1".to_string(),
            urgency,
        }
    }

    #[test]
    fn test_embed_builds_for_relative_and_absolute_icons() {
        let _ = notification_embed(&notification(Urgency::High, "/KeepFresh.png"));
        let _ = notification_embed(&notification(
            Urgency::Normal,
            "https://example.com/KeepFresh.png",
        ));
    }

    #[tokio::test]
    async fn test_build_notifier_without_channel_logs() -> Result<()> {
        let http = Arc::new(serenity::Http::new("token"));
        let notifier = build_notifier(&NotificationConfig::default(), http);
        notifier
            .notify(&notification(Urgency::Normal, "/KeepFresh.png"))
            .await
    }
}
