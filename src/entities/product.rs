//! Product entity - Represents one row of the `products` table.
//!
//! The row carries a name, a free-text description, a fixed-point price, an
//! availability flag and a [`Category`]. Categories are stored by member name so
//! the table stays readable from plain SQL.

use crate::errors::Error;
use sea_orm::{Iterable, entity::prelude::*};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier assigned by the store
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Fedora", "Hammer")
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Unit price
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub price: Decimal,
    /// Whether the product can currently be sold
    pub available: bool,
    /// Catalog category, stored by name
    pub category: Category,
}

/// Products have no relationships to other tables
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Closed set of catalog categories.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// Not yet categorized
    #[default]
    #[sea_orm(string_value = "UNKNOWN")]
    Unknown,
    /// Apparel and accessories
    #[sea_orm(string_value = "CLOTHS")]
    Cloths,
    /// Groceries and edibles
    #[sea_orm(string_value = "FOOD")]
    Food,
    /// Kitchen and household goods
    #[sea_orm(string_value = "HOUSEWARES")]
    Housewares,
    /// Car parts and supplies
    #[sea_orm(string_value = "AUTOMOTIVE")]
    Automotive,
    /// Hand and power tools
    #[sea_orm(string_value = "TOOLS")]
    Tools,
}

impl Category {
    /// Member name, as stored in the database and in serialized products.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Cloths => "CLOTHS",
            Self::Food => "FOOD",
            Self::Housewares => "HOUSEWARES",
            Self::Automotive => "AUTOMOTIVE",
            Self::Tools => "TOOLS",
        }
    }

    /// Looks a category up by its exact member name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|category| category.as_str() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::validation(format!("Invalid attribute: {s}")))
    }
}
