//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

use crate::{bot::BotData, errors::Error};

/// Food tracking commands
pub mod food;

/// General utility commands
pub mod general;

/// Notification toggling commands
pub mod notifications;

/// Recipe suggestion commands
pub mod recipes;

// Export commands
pub use food::*;
pub use general::*;
pub use notifications::*;
pub use recipes::*;

/// Every command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        add(),
        list(),
        expiring(),
        remove(),
        recipes(),
        notifications(),
        ping(),
        help(),
    ]
}
