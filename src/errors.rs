//! Unified error type for `KeepFresh`.
//!
//! Every fallible operation in the crate returns [`Result`]. Persistence failures
//! are surfaced to the user and leave in-memory state untouched; notification
//! delivery failures are logged per item and never escape a notification pass.

use thiserror::Error;

/// All errors produced by `KeepFresh`.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// The backing store was unreachable or rejected a write
    #[error("Persistence error: {message}")]
    Persistence {
        /// Human-readable description
        message: String,
    },

    /// Raw `SeaORM` error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem error from the local store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// (De)serialization error from the local store
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing or unreadable environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A food item failed validation before it reached the store
    #[error("Invalid food item: {message}")]
    InvalidFoodItem {
        /// What was wrong with the item
        message: String,
    },

    /// No tracked item matched the given name or id
    #[error("Food item not found: {name}")]
    ItemNotFound {
        /// Name or id that was looked up
        name: String,
    },

    /// The notification surface refused or failed to deliver
    #[error("Notification delivery failed: {message}")]
    NotificationDelivery {
        /// Human-readable description
        message: String,
    },

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Wraps any store-level failure as a [`Error::Persistence`].
    pub fn persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence {
            message: err.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
