//! Key-value state entity - Durable string pairs for notification bookkeeping.
//! Holds dedup records, new-item markers and the latched notification
//! permission when the app runs against a SQL backend.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Key-value state database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kv_state")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Storage key (e.g., `"notification-<id>-2025-06-01"`)
    #[sea_orm(unique)]
    pub key: String,
    /// Stored value
    pub value: String,
    /// When this pair was last written
    pub updated_at: DateTime,
}

/// `KvState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
