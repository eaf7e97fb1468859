//! Food Discord commands - add, list, expiring and remove.
//!
//! These commands go through the shared [`FoodTracker`](crate::core::tracker::FoodTracker)
//! so the in-memory view, the store and the new-item markers stay in step.

use crate::{
    core::expiry::{ExpiryStatus, describe_days_left},
    entities::FoodItemModel,
};

/// Discord's limit on fields per embed.
pub const MAX_EMBED_FIELDS: usize = 25;

/// Embed field for one listed item: (title, value).
#[must_use]
pub fn item_field(item: &FoodItemModel, days: i64, is_new: bool) -> (String, String) {
    let status = ExpiryStatus::from_days(days);
    let title = if is_new {
        format!("🆕 {}", item.name)
    } else {
        item.name.clone()
    };
    let value = format!(
        "{} · {}\n{} · {}",
        item.category,
        item.expiry_date.format("%Y-%m-%d"),
        describe_days_left(days),
        status.label()
    );
    (title, value)
}

/// Footer line noting how many items did not fit in the embed.
#[must_use]
pub fn overflow_note(total: usize) -> Option<String> {
    (total > MAX_EMBED_FIELDS).then(|| format!("…and {} more", total - MAX_EMBED_FIELDS))
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{MAX_EMBED_FIELDS, item_field, overflow_note};
    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            category::Category,
            expiry::{days_until, describe_days_left, parse_calendar_day, today_local},
            store::NewFoodItem,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::info;

    /// Adds a food item to track.
    ///
    /// The expiry date is a calendar day such as `2025-06-30`.
    #[poise::command(slash_command, prefix_command)]
    pub async fn add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name of the food (e.g., 'Milk')"] name: String,
        #[description = "Food category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: String,
        #[description = "Expiry date (YYYY-MM-DD)"] expiry: String,
    ) -> Result<()> {
        let category: Category = category.parse()?;
        let Some(expiry_date) = parse_calendar_day(&expiry) else {
            ctx.say(format!(
                "❌ `{expiry}` is not a valid date. Please use the YYYY-MM-DD format."
            ))
            .await?;
            return Ok(());
        };

        let item = ctx
            .data()
            .tracker
            .add(NewFoodItem::new(name, category, expiry_date))
            .await?;
        info!("Added {} ({}) via Discord", item.name, item.id);

        let days = days_until(item.expiry_date, today_local());
        ctx.say(format!(
            "✅ Added **{}** ({}) expiring on {}. {}",
            item.name,
            item.category,
            item.expiry_date.format("%Y-%m-%d"),
            describe_days_left(days)
        ))
        .await?;
        Ok(())
    }

    /// Lists all tracked food, soonest expiry first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let tracker = &ctx.data().tracker;
        let items = tracker.items();

        if items.is_empty() {
            ctx.say("🥕 No food tracked yet. Add some with `/add`!").await?;
            return Ok(());
        }

        let today = today_local();
        let mut fields = Vec::with_capacity(items.len().min(MAX_EMBED_FIELDS));
        for item in items.iter().take(MAX_EMBED_FIELDS) {
            let is_new = tracker.is_new(&item.id).await;
            let (title, value) = item_field(item, days_until(item.expiry_date, today), is_new);
            fields.push((title, value, false));
        }

        let mut embed = serenity::CreateEmbed::default()
            .title("🧊 Your Food")
            .description(format!("Tracking {} item(s)", items.len()))
            .color(0x002E_CC71)
            .fields(fields);
        if let Some(note) = overflow_note(items.len()) {
            embed = embed.footer(serenity::CreateEmbedFooter::new(note));
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows food expiring within three days, including anything already expired.
    #[poise::command(slash_command, prefix_command)]
    pub async fn expiring(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let tracker = &ctx.data().tracker;
        let expiring = tracker.expiring(today_local());

        if expiring.is_empty() {
            ctx.say("✅ Nothing is expiring in the next three days.").await?;
            return Ok(());
        }

        let mut fields = Vec::with_capacity(expiring.len().min(MAX_EMBED_FIELDS));
        for (item, days) in expiring.iter().take(MAX_EMBED_FIELDS) {
            let is_new = tracker.is_new(&item.id).await;
            let (title, value) = item_field(item, *days, is_new);
            fields.push((title, value, false));
        }

        let mut embed = serenity::CreateEmbed::default()
            .title("⏰ Expiring Soon")
            .description("Use these first! Try `/recipes` for ideas.")
            .color(0x00F3_9C12)
            .fields(fields);
        if let Some(note) = overflow_note(expiring.len()) {
            embed = embed.footer(serenity::CreateEmbedFooter::new(note));
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Stops tracking a food item.
    #[poise::command(slash_command, prefix_command)]
    pub async fn remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name of the food to remove"]
        #[autocomplete = "autocomplete::autocomplete_item"]
        name: String,
    ) -> Result<()> {
        let tracker = &ctx.data().tracker;
        let item = tracker
            .resolve(&name)
            .ok_or_else(|| Error::ItemNotFound { name: name.clone() })?;

        tracker.remove(&item.id).await?;
        info!("Removed {} ({}) via Discord", item.name, item.id);

        ctx.say(format!("🗑️ Removed **{}**.", item.name)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
