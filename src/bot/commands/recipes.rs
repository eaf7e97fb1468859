//! Recipe Discord command - suggestions for using up a tracked item.

use crate::core::recipe::Recipe;
use poise::serenity_prelude as serenity;

/// How many recipe embeds a single reply carries.
pub const MAX_RECIPE_EMBEDS: usize = 3;

/// Renders one recipe as an embed.
#[must_use]
pub fn recipe_embed(recipe: &Recipe) -> serenity::CreateEmbed {
    let ingredients = recipe
        .ingredients
        .iter()
        .map(|line| format!("• {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    let instructions = recipe
        .instructions
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {step}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    serenity::CreateEmbed::default()
        .title(format!("🍳 {}", recipe.title))
        .description(&recipe.summary)
        .color(0x0027_AE60)
        .fields(vec![
            ("⏱️ Ready in", format!("{} min", recipe.ready_in_minutes), true),
            ("🍽️ Servings", recipe.servings.to_string(), true),
            ("📈 Difficulty", recipe.difficulty.as_str().to_string(), true),
            ("Ingredients", ingredients, false),
            ("Instructions", instructions, false),
        ])
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{MAX_RECIPE_EMBEDS, recipe_embed};
    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::recipe::generate_recipes,
        errors::{Error, Result},
    };

    /// Suggests recipes that use up one of your tracked items.
    #[poise::command(slash_command, prefix_command)]
    pub async fn recipes(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name of the food to cook with"]
        #[autocomplete = "autocomplete::autocomplete_item"]
        name: String,
    ) -> Result<()> {
        let data = ctx.data();
        let item = data
            .tracker
            .resolve(&name)
            .ok_or_else(|| Error::ItemNotFound { name: name.clone() })?;

        // Generation waits on purpose, so acknowledge first
        ctx.defer().await?;

        let recipes = generate_recipes(&item.name, &item.category, data.recipe_delay).await;
        let mut reply = poise::CreateReply::default()
            .content(format!("👨‍🍳 Recipe ideas for **{}**", item.name));
        for recipe in recipes.iter().take(MAX_RECIPE_EMBEDS) {
            reply = reply.embed(recipe_embed(recipe));
        }

        ctx.send(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
