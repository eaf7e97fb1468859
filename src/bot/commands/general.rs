//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't touch the food store
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**KeepFresh Help**\n\
        Track what's in your fridge and get reminded before it goes off.\n\n\
        **Food Commands**\n\
        • `/add <name> <category> <expiry>` - Starts tracking a food item (expiry as YYYY-MM-DD).\n\
        • `/list` - Shows everything you're tracking, soonest expiry first.\n\
        • `/expiring` - Shows food expiring within three days, including expired items.\n\
        • `/remove <name>` - Stops tracking a food item.\n\
        • `/recipes <name>` - Suggests recipes to use up an item.\n\n\
        **Alerts**\n\
        • `/notifications <enable|disable|status|check>` - Manages expiry alerts.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
