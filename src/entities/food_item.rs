//! Food item entity - One tracked piece of food and its expiry date.
//!
//! Rows are created by an explicit add and destroyed by an explicit delete;
//! they are never updated in place. The same model is serialized as-is by the
//! local file store, so the serde field names double as the fallback format.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Food item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "food_items")]
pub struct Model {
    /// Opaque unique identifier (UUID v4 when assigned locally)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name of the food (e.g., "Spinach")
    pub name: String,
    /// Category display name (e.g., "Vegetables")
    pub category: String,
    /// Calendar day the food expires on
    pub expiry_date: Date,
    /// When the item was added
    pub created_at: DateTimeUtc,
}

/// `FoodItem` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
