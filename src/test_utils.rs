//! Shared test utilities for the product catalog.
//!
//! This module provides helpers for setting up test databases and a deterministic
//! product factory. The factory cycles through small pools of names, prices and
//! categories so batches always contain duplicates to filter on.

use crate::{core::product::Product, entities::Category, errors::Result};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing_subscriber::EnvFilter;

const NAMES: [&str; 3] = ["Hat", "Hammer", "Apple"];
const DESCRIPTIONS: [&str; 4] = [
    "Keeps the sun off",
    "Drives nails",
    "Crisp and sweet",
    "Spare part",
];
// Quarter-unit prices survive the round trip through SQLite's REAL storage exactly.
const PRICE_CENTS: [i64; 4] = [1250, 2025, 775, 3450];
const CATEGORIES: [Category; 6] = [
    Category::Unknown,
    Category::Cloths,
    Category::Food,
    Category::Housewares,
    Category::Automotive,
    Category::Tools,
];

/// Installs a `tracing` subscriber that writes through the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    crate::config::database::init_db("sqlite::memory:").await
}

/// Builds transient products with predictable, varied field values.
#[derive(Debug, Default)]
pub struct ProductFactory {
    sequence: usize,
}

impl ProductFactory {
    /// Builds the next product in the sequence.
    pub fn build(&mut self) -> Product {
        let n = self.sequence;
        self.sequence += 1;
        Product::new(
            NAMES[n % NAMES.len()],
            format!("{} #{n}", DESCRIPTIONS[n % DESCRIPTIONS.len()]),
            Decimal::new(PRICE_CENTS[n % PRICE_CENTS.len()], 2),
            n % 2 == 0,
            CATEGORIES[n % CATEGORIES.len()],
        )
    }

    /// Builds `count` products.
    pub fn build_batch(&mut self, count: usize) -> Vec<Product> {
        (0..count).map(|_| self.build()).collect()
    }
}

/// Builds and persists `count` products, returning them with their ids.
pub async fn create_batch<C>(db: &C, count: usize) -> Result<Vec<Product>>
where
    C: ConnectionTrait,
{
    let mut products = ProductFactory::default().build_batch(count);
    for product in &mut products {
        product.create(db).await?;
    }
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_batches_contain_duplicates() {
        let products = ProductFactory::default().build_batch(10);
        let first = &products[0];

        assert!(products.iter().skip(1).any(|p| p.name == first.name));
        assert!(products.iter().skip(1).any(|p| p.price == first.price));
        assert!(products.iter().any(|p| p.available != first.available));
        assert!(products.iter().all(|p| p.id().is_none()));
    }
}
