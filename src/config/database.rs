//! Database configuration module for `KeepFresh`.
//!
//! This module handles the SQL connection used by the remote store and creates
//! the `food_items` and `kv_state` tables from the entity definitions. `SeaORM`'s
//! `Schema::create_table_from_entity` generates the statements, so the schema
//! always matches the Rust structs. Works against hosted Postgres and `SQLite`.

use crate::entities::{FoodItem, KvState};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::info;

/// Connects to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables that do not exist yet.
///
/// Safe to run on every startup against an existing database.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut food_item_table = schema.create_table_from_entity(FoodItem);
    let mut kv_state_table = schema.create_table_from_entity(KvState);
    food_item_table.if_not_exists();
    kv_state_table.if_not_exists();

    db.execute(builder.build(&food_item_table)).await?;
    db.execute(builder.build(&kv_state_table)).await?;

    info!("Database tables ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{FoodItemModel, KvStateModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<FoodItemModel> = FoodItem::find().limit(1).all(&db).await?;
        let _: Vec<KvStateModel> = KvState::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
