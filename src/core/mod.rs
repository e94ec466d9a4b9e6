//! Core business logic - framework-agnostic product operations.

pub mod product;

pub use product::{Lifecycle, PriceInput, Product, ProductQuery, parse_price};
