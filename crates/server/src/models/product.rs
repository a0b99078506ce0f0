//! Product domain types.

use serde::{Deserialize, Serialize};

use catalog_core::{CategoryId, Name, Price, ProductId};

use super::Category;

/// A sellable item belonging to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name, as stored.
    pub name: String,
    /// Unbounded description text.
    pub description: String,
    /// Unit price, exact to the cent.
    pub price: Price,
    /// Units on hand.
    pub quantity: i32,
    /// Owning category.
    pub category_id: CategoryId,
}

/// A product together with its eagerly loaded category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductWithCategory {
    /// The product itself.
    pub product: Product,
    /// The category the product belongs to.
    pub category: Category,
}

/// Every writable product field, already validated.
///
/// Used for both creates and updates: an update overwrites all of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    /// Product name.
    pub name: Name,
    /// Description text.
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Units on hand.
    pub quantity: i32,
    /// Category the product is filed under.
    pub category_id: CategoryId,
}

/// Validated product fields for a category that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: Name,
    pub description: String,
    pub price: Price,
    pub quantity: i32,
}

/// Filter for product listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact, case-sensitive category name.
    pub category_name: Option<String>,
}

impl ProductFilter {
    /// Build a filter from the optional API argument.
    ///
    /// An empty string means "no filter", matching how the API has always
    /// treated a blank category argument.
    #[must_use]
    pub fn by_category(category: Option<String>) -> Self {
        Self {
            category_name: category.filter(|name| !name.is_empty()),
        }
    }
}
