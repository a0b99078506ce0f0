//! Catalog service.
//!
//! Every operation validates its input completely before touching storage, so
//! malformed requests never open a transaction.

use std::str::FromStr;

use sqlx::PgPool;
use tracing::instrument;

use catalog_core::{CategoryId, IdParseError, Name, Price, ProductId};

use crate::db::{CategoryRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::{Category, Product, ProductFilter, ProductRecord, ProductWithCategory};

/// Product fields exactly as they arrive from the API.
///
/// Every field is nullable on the wire, but creates and updates both require
/// all of them: there are no partial updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
    pub category: Option<i32>,
}

impl ProductFields {
    /// Check presence and shape of every field.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` naming the first missing or malformed field.
    pub fn validate(self) -> Result<ProductRecord> {
        let name = Name::parse(&required(self.name, "name")?)?;
        let description = required(self.description, "description")?;
        let price = Price::from_f64(required(self.price, "price")?)?;
        let quantity = required(self.quantity, "quantity")?;
        let category_id = CategoryId::new(required(self.category, "category")?);

        Ok(ProductRecord {
            name,
            description,
            price,
            quantity,
            category_id,
        })
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| AppError::Validation(format!("field `{field}` is required")))
}

/// Parse an optional API identifier into a typed id.
///
/// An absent id resolves to no record, so it is reported as not found; a
/// malformed one is a validation error.
fn parse_id<T>(id: Option<&str>, entity: &str) -> Result<T>
where
    T: FromStr<Err = IdParseError>,
{
    let raw = id.ok_or_else(|| AppError::NotFound(format!("{entity} id was not provided")))?;
    Ok(raw.parse::<T>()?)
}

/// Catalog service.
///
/// Implements the two list queries and the four create/update mutations.
pub struct CatalogService<'a> {
    categories: CategoryRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            categories: CategoryRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// List products with their categories, optionally for one category name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, category: Option<String>) -> Result<Vec<ProductWithCategory>> {
        let filter = ProductFilter::by_category(category);
        let products = self.products.list(&filter).await?;
        tracing::debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.list().await?)
    }

    /// Load the products of the given categories in one round trip.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    #[instrument(skip(self, category_ids), fields(categories = category_ids.len()))]
    pub async fn products_for_categories(&self, category_ids: &[CategoryId]) -> Result<Vec<Product>> {
        Ok(self.products.list_for_categories(category_ids).await?)
    }

    // =========================================================================
    // Category Mutations
    // =========================================================================

    /// Create a category with the given name and an empty description.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the name is blank or too long.
    /// Returns `AppError::UniquenessViolation` if the name is taken.
    #[instrument(skip(self))]
    pub async fn create_category(&self, name: &str) -> Result<Category> {
        let name = Name::parse(name)?;
        let category = self.categories.create(&name, "").await?;
        tracing::info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the id or name is malformed.
    /// Returns `AppError::NotFound` if the id is absent or the category does not exist.
    /// Returns `AppError::UniquenessViolation` if another category has the name.
    #[instrument(skip(self))]
    pub async fn update_category(&self, id: Option<&str>, name: &str) -> Result<Category> {
        let id: CategoryId = parse_id(id, "Category")?;
        let name = Name::parse(name)?;

        let category = self
            .categories
            .update_name(id, &name)
            .await
            .map_err(|e| AppError::from_repository("Category", id, e))?;

        tracing::info!(category_id = %category.id, "Updated category");
        Ok(category)
    }

    // =========================================================================
    // Product Mutations
    // =========================================================================

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if any field is missing or malformed.
    /// Returns `AppError::ForeignKeyViolation` if the category does not exist.
    #[instrument(skip(self))]
    pub async fn create_product(&self, fields: ProductFields) -> Result<ProductWithCategory> {
        let record = fields.validate()?;
        let created = self.products.create(&record).await?;
        tracing::info!(
            product_id = %created.product.id,
            category_id = %created.category.id,
            "Created product"
        );
        Ok(created)
    }

    /// Overwrite every field of a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the id or any field is missing or malformed.
    /// Returns `AppError::NotFound` if the id is absent or the product does not exist.
    /// Returns `AppError::ForeignKeyViolation` if the category does not exist.
    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: Option<&str>,
        fields: ProductFields,
    ) -> Result<ProductWithCategory> {
        let id: ProductId = parse_id(id, "Product")?;
        let record = fields.validate()?;

        let updated = self
            .products
            .update(id, &record)
            .await
            .map_err(|e| AppError::from_repository("Product", id, e))?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated)
    }
}
