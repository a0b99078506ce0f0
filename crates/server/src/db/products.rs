//! Product repository for database operations.
//!
//! Product reads always join the owning category in the same statement, so a
//! listing of N products costs one round trip instead of N + 1.

use rust_decimal::Decimal;
use sqlx::PgPool;

use catalog_core::{CategoryId, Price, ProductId};

use super::{RepositoryError, classify_write_error};
use crate::models::{Category, Product, ProductFilter, ProductRecord, ProductWithCategory};

const MISSING_CATEGORY: &str = "product references a category that does not exist";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product columns.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
    quantity: i32,
    category_id: i32,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        // NUMERIC(10,2) already enforces the `Price` bound.
        let price = Price::try_from(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid product price in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price,
            quantity: row.quantity,
            category_id: CategoryId::new(row.category_id),
        })
    }
}

/// Internal row type for a product joined with its category.
#[derive(Debug, sqlx::FromRow)]
struct ProductWithCategoryRow {
    #[sqlx(flatten)]
    product: ProductRow,
    category_name: String,
    category_description: String,
}

impl TryFrom<ProductWithCategoryRow> for ProductWithCategory {
    type Error = RepositoryError;

    fn try_from(row: ProductWithCategoryRow) -> Result<Self, Self::Error> {
        let product = Product::try_from(row.product)?;

        Ok(Self {
            category: Category {
                id: product.category_id,
                name: row.category_name,
                description: row.category_description,
            },
            product,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products with their categories, optionally restricted to one
    /// category by exact name.
    ///
    /// An unknown category name yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductWithCategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductWithCategoryRow>(
            r"
            SELECT
                p.id, p.name, p.description, p.price, p.quantity, p.category_id,
                c.name AS category_name,
                c.description AS category_description
            FROM catalog.product p
            JOIN catalog.category c ON c.id = p.category_id
            WHERE ($1::text IS NULL OR c.name = $1)
            ORDER BY p.id
            ",
        )
        .bind(filter.category_name.as_deref())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a product with its category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<ProductWithCategory>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductWithCategoryRow>(
            r"
            SELECT
                p.id, p.name, p.description, p.price, p.quantity, p.category_id,
                c.name AS category_name,
                c.description AS category_description
            FROM catalog.product p
            JOIN catalog.category c ON c.id = p.category_id
            WHERE p.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Load the products of several categories in one statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_categories(
        &self,
        category_ids: &[CategoryId],
    ) -> Result<Vec<Product>, RepositoryError> {
        if category_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = category_ids.iter().map(CategoryId::as_i32).collect();

        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, quantity, category_id
            FROM catalog.product
            WHERE category_id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the category does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        record: &ProductRecord,
    ) -> Result<ProductWithCategory, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductWithCategoryRow>(
            r"
            WITH inserted AS (
                INSERT INTO catalog.product (name, description, price, quantity, category_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, name, description, price, quantity, category_id
            )
            SELECT
                p.id, p.name, p.description, p.price, p.quantity, p.category_id,
                c.name AS category_name,
                c.description AS category_description
            FROM inserted p
            JOIN catalog.category c ON c.id = p.category_id
            ",
        )
        .bind(record.name.as_str())
        .bind(&record.description)
        .bind(record.price.amount())
        .bind(record.quantity)
        .bind(record.category_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| classify_write_error(e, "product already exists", MISSING_CATEGORY))?
        .ok_or_else(|| RepositoryError::InvalidReference(MISSING_CATEGORY.to_owned()))?;

        tx.commit().await?;

        row.try_into()
    }

    /// Overwrite every field of an existing product.
    ///
    /// The row is locked before it is rewritten. On any failure the
    /// transaction is rolled back and the stored product is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::InvalidReference` if the category does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        record: &ProductRecord,
    ) -> Result<ProductWithCategory, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<i32> = sqlx::query_scalar(
            r"
            SELECT id FROM catalog.product
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let row = sqlx::query_as::<_, ProductWithCategoryRow>(
            r"
            WITH updated AS (
                UPDATE catalog.product
                SET name = $2,
                    description = $3,
                    price = $4,
                    quantity = $5,
                    category_id = $6
                WHERE id = $1
                RETURNING id, name, description, price, quantity, category_id
            )
            SELECT
                p.id, p.name, p.description, p.price, p.quantity, p.category_id,
                c.name AS category_name,
                c.description AS category_description
            FROM updated p
            JOIN catalog.category c ON c.id = p.category_id
            ",
        )
        .bind(id)
        .bind(record.name.as_str())
        .bind(&record.description)
        .bind(record.price.amount())
        .bind(record.quantity)
        .bind(record.category_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| classify_write_error(e, "product already exists", MISSING_CATEGORY))?
        .ok_or_else(|| RepositoryError::InvalidReference(MISSING_CATEGORY.to_owned()))?;

        tx.commit().await?;

        row.try_into()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_row_keeps_stored_names() {
        let row = ProductWithCategoryRow {
            product: ProductRow {
                id: 1,
                name: String::new(),
                description: String::new(),
                price: Decimal::new(150, 2),
                quantity: 0,
                category_id: 2,
            },
            category_name: " Legacy ".to_owned(),
            category_description: String::new(),
        };

        let loaded = ProductWithCategory::try_from(row).unwrap();
        assert_eq!(loaded.product.name, "");
        assert_eq!(loaded.category.name, " Legacy ");
        assert_eq!(loaded.product.price.to_string(), "1.50");
    }
}
