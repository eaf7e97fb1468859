//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for `KeepFresh`, including all
//! slash commands, autocomplete handlers, the channel notifier and the bot
//! startup routine.

/// Discord command implementations (food, recipes, notifications, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;
/// Delivery of expiry alerts to a Discord channel
pub mod notifier;

use crate::{
    core::{notification::NotificationEngine, tracker::FoodTracker},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use std::{sync::Arc, time::Duration};
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
/// This structure holds the tracker, the notification engine and the
/// presentation settings that commands need to access.
pub struct BotData {
    /// In-memory view of the food collection, backed by the store
    pub tracker: Arc<FoodTracker>,
    /// Notification policy engine
    pub engine: Arc<NotificationEngine>,
    /// Artificial delay before recipe suggestions are shown
    pub recipe_delay: Duration,
}

impl BotData {
    /// Creates a new `BotData` instance from its shared services.
    #[must_use]
    pub const fn new(
        tracker: Arc<FoodTracker>,
        engine: Arc<NotificationEngine>,
        recipe_delay: Duration,
    ) -> Self {
        Self {
            tracker,
            engine,
            recipe_delay,
        }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ An error occurred: {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the poise framework and runs the Discord client until it stops.
///
/// # Errors
/// Returns an error if the client cannot be created or the gateway connection
/// fails.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}
