//! Business logic services for the catalog.
//!
//! # Services
//!
//! - `catalog` - Query resolvers and mutation handlers for categories and products

pub mod catalog;

pub use catalog::{CatalogService, ProductFields};
