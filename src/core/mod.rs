//! Core business logic - framework-agnostic food tracking, expiry and
//! notification policy. Nothing in here knows about Discord.

/// Fixed set of food categories
pub mod category;
/// Calendar-day arithmetic for expiry dates
pub mod expiry;
/// Permission state machine, dedup records and notification passes
pub mod notification;
/// Notification payloads and delivery implementations
pub mod notifier;
/// Template-based recipe suggestions
pub mod recipe;
/// Durable key-value storage (file and SQL backed)
pub mod storage;
/// Food persistence gateway (remote SQL and local fallback)
pub mod store;
/// In-memory view of the collection, synced after each mutation
pub mod tracker;
