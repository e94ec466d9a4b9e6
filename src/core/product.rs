//! Product business logic - Handles all product-related operations.
//!
//! [`Product`] is the caller-owned, in-memory view of one row in the `products`
//! table. It knows which lifecycle state it is in ([`Lifecycle`]) and is kept in
//! sync with the store explicitly through [`Product::create`], [`Product::update`]
//! and [`Product::delete`]. Lookups are associated functions; the single-field
//! filters return a [`ProductQuery`] that can be counted and listed repeatedly.
//!
//! Every store operation is generic over [`ConnectionTrait`], so the caller decides
//! whether it runs on a plain connection or inside a transaction.

use crate::{
    entities::{Category, ProductEntity, product},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait,
    EntityTrait, PaginatorTrait, QueryFilter, Select, Set, sea_query::IntoCondition,
};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};
use tracing::{debug, info, instrument, warn};

/// Message used whenever the input to [`Product::deserialize`] is not a JSON object.
const BAD_OR_NO_DATA: &str = "Invalid product: body of request contained bad or no data";

/// Where a [`Product`] stands relative to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifecycle {
    /// Built in memory, never inserted
    #[default]
    Transient,
    /// Backed by the row with this id
    Persisted(i64),
    /// The row with this id has been removed
    Deleted(i64),
}

impl Lifecycle {
    /// Store id, if the product has ever been persisted.
    #[must_use]
    pub const fn id(self) -> Option<i64> {
        match self {
            Self::Transient => None,
            Self::Persisted(id) | Self::Deleted(id) => Some(id),
        }
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Product {
    lifecycle: Lifecycle,
    /// Product name, never blank once stored
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Unit price
    pub price: Decimal,
    /// Whether the product can currently be sold
    pub available: bool,
    /// Catalog category
    pub category: Category,
}

impl Product {
    /// Builds a new, not yet persisted product.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            lifecycle: Lifecycle::Transient,
            name: name.into(),
            description: description.into(),
            price,
            available,
            category,
        }
    }

    /// Builds a transient product from its serialized form.
    ///
    /// # Errors
    /// Returns `Error::DataValidation` under the same rules as [`Product::deserialize`].
    pub fn from_value(data: Option<&Value>) -> Result<Self> {
        let mut product = Self::default();
        product.deserialize(data)?;
        Ok(product)
    }

    /// Store id, if the product has ever been persisted.
    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.lifecycle.id()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn active_model(&self) -> product::ActiveModel {
        product::ActiveModel {
            id: NotSet,
            name: Set(self.name.clone()),
            description: Set(self.description.clone()),
            price: Set(self.price),
            available: Set(self.available),
            category: Set(self.category),
        }
    }

    /// Inserts the current field values as a new row and adopts the new id.
    ///
    /// Any id the product held before is discarded, so calling this twice stores two rows.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The product name is empty or whitespace-only
    /// - The database insert fails
    #[instrument(skip_all, fields(name = %self.name))]
    pub async fn create<C>(&mut self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        if self.name.trim().is_empty() {
            return Err(Error::validation("Invalid product: name cannot be empty"));
        }

        info!("Creating {}", self.name);
        let model = self.active_model().insert(db).await?;
        self.lifecycle = Lifecycle::Persisted(model.id);
        debug!(id = model.id, "Product created");
        Ok(())
    }

    /// Writes the current field values over the existing row.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The product was never persisted, or has been deleted (no store access happens)
    /// - The row no longer exists or the database update fails
    #[instrument(skip_all, fields(name = %self.name))]
    pub async fn update<C>(&mut self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let id = match self.lifecycle {
            Lifecycle::Persisted(id) => id,
            Lifecycle::Transient => {
                return Err(Error::validation("Update called with empty ID field"));
            }
            Lifecycle::Deleted(id) => {
                return Err(Error::validation(format!(
                    "Update called on deleted product id=[{id}]"
                )));
            }
        };

        info!("Saving {}", self);
        let model = product::ActiveModel {
            id: Unchanged(id),
            ..self.active_model()
        };
        model.update(db).await?;
        Ok(())
    }

    /// Removes the row and marks the product as deleted.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The product was never persisted, or was already deleted (no store access happens)
    /// - The database delete fails
    #[instrument(skip_all, fields(name = %self.name))]
    pub async fn delete<C>(&mut self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let id = match self.lifecycle {
            Lifecycle::Persisted(id) => id,
            Lifecycle::Transient => {
                return Err(Error::validation("Delete called with empty ID field"));
            }
            Lifecycle::Deleted(id) => {
                return Err(Error::validation(format!(
                    "Delete called on deleted product id=[{id}]"
                )));
            }
        };

        info!("Deleting {}", self);
        let result = ProductEntity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            warn!(id, "No row removed; product was already gone from the store");
        }
        self.lifecycle = Lifecycle::Deleted(id);
        Ok(())
    }

    /// Serializes the product into a plain JSON object.
    ///
    /// `id` is `null` until the product has been persisted, `price` is rendered as a
    /// decimal string and `category` as its member name.
    #[must_use]
    pub fn serialize(&self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("id".to_string(), self.id().map_or(Value::Null, Value::from));
        data.insert("name".to_string(), Value::String(self.name.clone()));
        data.insert(
            "description".to_string(),
            Value::String(self.description.clone()),
        );
        data.insert("price".to_string(), Value::String(self.price.to_string()));
        data.insert("available".to_string(), Value::Bool(self.available));
        data.insert(
            "category".to_string(),
            Value::String(self.category.as_str().to_string()),
        );
        data
    }

    /// Sets every field from a serialized product.
    ///
    /// Either all fields are replaced or, on error, none are. The lifecycle state and
    /// id are never touched; an `id` key in `data` is ignored.
    ///
    /// # Errors
    /// Returns `Error::DataValidation` if:
    /// - `data` is `None` or not a JSON object
    /// - Any of `name`, `description`, `price`, `available`, `category` is missing
    /// - `available` is not a JSON boolean
    /// - `category` is not the name of a [`Category`]
    /// - `name`/`description` are not strings, `name` is blank, or `price` is not numeric
    pub fn deserialize(&mut self, data: Option<&Value>) -> Result<&mut Self> {
        let data = match data {
            Some(Value::Object(data)) => data,
            _ => return Err(Error::validation(BAD_OR_NO_DATA)),
        };

        let name = string_field(data, "name")?;
        if name.trim().is_empty() {
            return Err(Error::validation("Invalid product: name cannot be empty"));
        }
        let description = string_field(data, "description")?;
        let price = match required(data, "price")? {
            Value::Number(number) => parse_price(&number.to_string())?,
            Value::String(text) => parse_price(text)?,
            other => {
                return Err(Error::validation(format!(
                    "Invalid type for decimal [price]: {}",
                    json_type(other)
                )));
            }
        };
        let available = match required(data, "available")? {
            Value::Bool(available) => *available,
            other => {
                return Err(Error::validation(format!(
                    "Invalid type for boolean [available]: {}",
                    json_type(other)
                )));
            }
        };
        let category = match required(data, "category")? {
            Value::String(text) => text.parse::<Category>()?,
            other => return Err(Error::validation(format!("Invalid attribute: {other}"))),
        };

        self.name = name.to_string();
        self.description = description.to_string();
        self.price = price;
        self.available = available;
        self.category = category;
        Ok(self)
    }

    /// Returns every stored product.
    pub async fn all<C>(db: &C) -> Result<Vec<Self>>
    where
        C: ConnectionTrait,
    {
        info!("Processing all Products");
        let models = ProductEntity::find().all(db).await?;
        Ok(models.into_iter().map(Self::from).collect())
    }

    /// Finds a product by id, returning None if there is no such row.
    pub async fn find<C>(db: &C, product_id: i64) -> Result<Option<Self>>
    where
        C: ConnectionTrait,
    {
        info!("Processing lookup for id {product_id} ...");
        let model = ProductEntity::find_by_id(product_id).one(db).await?;
        Ok(model.map(Self::from))
    }

    /// Products whose name equals `name` exactly.
    #[must_use]
    pub fn find_by_name(name: &str) -> ProductQuery {
        info!("Processing name query for {name} ...");
        ProductQuery::matching(product::Column::Name.eq(name))
    }

    /// Products with the given availability.
    #[must_use]
    pub fn find_by_availability(available: bool) -> ProductQuery {
        info!("Processing available query for {available} ...");
        ProductQuery::matching(product::Column::Available.eq(available))
    }

    /// Products in the given category.
    #[must_use]
    pub fn find_by_category(category: Category) -> ProductQuery {
        info!("Processing category query for {category} ...");
        ProductQuery::matching(product::Column::Category.eq(category))
    }

    /// Products whose price equals `price`.
    ///
    /// Accepts a [`Decimal`] or its textual form, e.g. `"12.50"`.
    ///
    /// # Errors
    /// Returns `Error::DataValidation` if a textual price is not a number.
    pub fn find_by_price(price: impl PriceInput) -> Result<ProductQuery> {
        let price = price.into_price()?;
        info!("Processing price query for {price} ...");
        Ok(ProductQuery::matching(product::Column::Price.eq(price)))
    }
}

impl From<product::Model> for Product {
    fn from(model: product::Model) -> Self {
        Self {
            lifecycle: Lifecycle::Persisted(model.id),
            name: model.name,
            description: model.description,
            price: model.price,
            available: model.available,
            category: model.category,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "<Product {} id=[{id}]>", self.name),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}

/// A price given either as a decimal or as text.
pub trait PriceInput {
    /// Normalizes the input to a decimal.
    ///
    /// # Errors
    /// Returns `Error::DataValidation` if the input is not a number.
    fn into_price(self) -> Result<Decimal>;
}

impl PriceInput for Decimal {
    fn into_price(self) -> Result<Decimal> {
        Ok(self)
    }
}

impl PriceInput for &str {
    fn into_price(self) -> Result<Decimal> {
        parse_price(self)
    }
}

impl PriceInput for String {
    fn into_price(self) -> Result<Decimal> {
        parse_price(&self)
    }
}

/// Parses a textual price, ignoring surrounding spaces and double quotes.
///
/// # Errors
/// Returns `Error::DataValidation` if the text is not a decimal number.
pub fn parse_price(text: &str) -> Result<Decimal> {
    let trimmed = text.trim_matches(|c| c == ' ' || c == '"');
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| Error::validation(format!("Invalid product: price is not a number: {text}")))
}

fn required<'a>(data: &'a Map<String, Value>, key: &str) -> Result<&'a Value> {
    data.get(key)
        .ok_or_else(|| Error::validation(format!("Invalid product: missing {key}")))
}

fn string_field<'a>(data: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    match required(data, key)? {
        Value::String(value) => Ok(value),
        other => Err(Error::validation(format!(
            "Invalid type for string [{key}]: {}",
            json_type(other)
        ))),
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A lazy single-field filter over the `products` table.
///
/// Nothing is sent to the store until [`ProductQuery::count`] or
/// [`ProductQuery::all`] runs, and each call issues a fresh query.
#[derive(Debug, Clone)]
pub struct ProductQuery {
    select: Select<ProductEntity>,
}

impl ProductQuery {
    fn matching(condition: impl IntoCondition) -> Self {
        Self {
            select: ProductEntity::find().filter(condition),
        }
    }

    /// Number of matching products.
    pub async fn count<C>(&self, db: &C) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        self.select.clone().count(db).await.map_err(Into::into)
    }

    /// Every matching product.
    pub async fn all<C>(&self, db: &C) -> Result<Vec<Product>>
    where
        C: ConnectionTrait,
    {
        let models = self.select.clone().all(db).await?;
        Ok(models.into_iter().map(Product::from).collect())
    }
}
