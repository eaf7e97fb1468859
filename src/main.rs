use dotenvy::dotenv;
use keepfresh::{
    bot::{self, BotData, notifier::build_notifier},
    config::{settings::load_app_configuration, storage::open_backends},
    core::{
        notification::{
            ConfiguredPermission, NotificationEngine, NotificationSettings, SWEEP_INTERVAL,
        },
        tracker::FoodTracker,
    },
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use std::{env, sync::Arc, time::Duration};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = load_app_configuration()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!("Successfully processed application configuration.");

    // 4. Pick the storage backend once
    let backends = open_backends(&app_config.storage)
        .await
        .inspect(|b| info!("Storage backend ready: {:?}", b.kind))
        .inspect_err(|e| error!("Failed to open storage: {}", e))?;

    // 5. Load the tracked food; an unreachable store starts us empty
    let tracker = Arc::new(FoodTracker::new(
        Arc::clone(&backends.food_store),
        Arc::clone(&backends.storage),
    ));
    match tracker.load().await {
        Ok(count) => info!("Loaded {} food item(s)", count),
        Err(e) => warn!("Could not load food items, starting empty: {}", e),
    }

    // DISCORD_BOT_TOKEN is loaded here, directly before use, not stored in AppConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    // 6. Notifications: channel delivery, permission latch, background tasks
    let notifications = &app_config.notifications;
    let http = Arc::new(serenity::Http::new(&token));
    let engine = Arc::new(NotificationEngine::new(
        Arc::clone(&backends.storage),
        build_notifier(notifications, http),
        Arc::new(ConfiguredPermission(notifications.permission_answer)),
        NotificationSettings {
            icon: notifications.icon.clone(),
            ..NotificationSettings::default()
        },
    ));
    let permission = engine.activate().await?;
    info!("Notification permission: {}", permission);

    Arc::clone(&engine).spawn_sweeper(SWEEP_INTERVAL);
    Arc::clone(&engine).spawn_watcher(
        tracker.subscribe(),
        Duration::from_secs(notifications.check_interval_secs.max(1)),
    );

    // 7. Run the bot
    let data = BotData::new(
        tracker,
        engine,
        notifications.recipe_delay(),
    );
    bot::run_bot(token, data).await?;

    Ok(())
}
