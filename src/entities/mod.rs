//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables used by the SQL-backed stores.

pub mod food_item;
pub mod kv_state;

// Re-export specific types to avoid conflicts
pub use food_item::{Column as FoodItemColumn, Entity as FoodItem, Model as FoodItemModel};
pub use kv_state::{Column as KvStateColumn, Entity as KvState, Model as KvStateModel};
