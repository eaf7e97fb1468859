/// Database connection and table management
pub mod database;

/// Application settings from config.toml and the environment
pub mod settings;

/// One-time selection of the remote or local storage backend
pub mod storage;
