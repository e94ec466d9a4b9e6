//! Database configuration module for the product catalog.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust model
//! without hand-written SQL.

use crate::entities::ProductEntity;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info, instrument};

/// Default location of the catalog database when nothing else is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/products.sqlite?mode=rwc";

/// Creates the `products` table if it does not already exist.
///
/// Safe to call on every start-up.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut product_table = schema.create_table_from_entity(ProductEntity);
    product_table.if_not_exists();

    debug!("Ensuring products table exists");
    db.execute(builder.build(&product_table)).await?;
    Ok(())
}

/// Connects to `database_url` and makes sure the catalog tables exist.
#[instrument]
pub async fn init_db(database_url: &str) -> Result<DatabaseConnection> {
    info!("Initializing database");
    let db = Database::connect(database_url).await?;
    create_tables(&db).await?;
    info!("Database tables ensured");
    Ok(db)
}
