//! Category repository for database operations.

use sqlx::PgPool;

use catalog_core::{CategoryId, Name};

use super::{RepositoryError, classify_write_error};
use crate::models::{Category, ProductDraft};

const DUPLICATE_NAME: &str = "category name already exists";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for category queries.
#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    description: String,
}

/// Stored names are returned exactly as the column holds them; `Name` rules
/// apply to writes only.
impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            description: row.description,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, description
            FROM catalog.category
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, description
            FROM catalog.category
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    /// Get a category by its exact name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_name(&self, name: &Name) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, description
            FROM catalog.category
            WHERE name = $1
            ",
        )
        .bind(name.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    /// Create a new category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, name: &Name, description: &str) -> Result<Category, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            INSERT INTO catalog.category (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description
            ",
        )
        .bind(name.as_str())
        .bind(description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| classify_write_error(e, DUPLICATE_NAME, "category"))?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Create a category together with its products in one transaction.
    ///
    /// Either the category and every product are stored, or nothing is.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_products(
        &self,
        name: &Name,
        description: &str,
        products: &[ProductDraft],
    ) -> Result<Category, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            INSERT INTO catalog.category (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description
            ",
        )
        .bind(name.as_str())
        .bind(description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| classify_write_error(e, DUPLICATE_NAME, "category"))?;

        for product in products {
            sqlx::query(
                r"
                INSERT INTO catalog.product (name, description, price, quantity, category_id)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(product.name.as_str())
            .bind(&product.description)
            .bind(product.price.amount())
            .bind(product.quantity)
            .bind(row.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            category_id = row.id,
            products = products.len(),
            "Created category with products"
        );
        Ok(row.into())
    }

    /// Rename a category.
    ///
    /// The row is locked before it is rewritten, so the update observes the
    /// category exactly as it was loaded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no category has this ID.
    /// Returns `RepositoryError::Conflict` if another category already has the name.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_name(
        &self,
        id: CategoryId,
        name: &Name,
    ) -> Result<Category, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<i32> = sqlx::query_scalar(
            r"
            SELECT id FROM catalog.category
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

        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            UPDATE catalog.category
            SET name = $2
            WHERE id = $1
            RETURNING id, name, description
            ",
        )
        .bind(id)
        .bind(name.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| classify_write_error(e, DUPLICATE_NAME, "category"))?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Delete a category and, through `ON DELETE CASCADE`, all of its products.
    ///
    /// Not reachable through the GraphQL API; used by maintenance tooling.
    ///
    /// Returns the number of products removed along with the category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no category has this ID.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: CategoryId) -> Result<i64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Locking the category blocks concurrent product inserts that
        // reference it until the delete commits.
        let existing: Option<i32> = sqlx::query_scalar(
            r"
            SELECT id FROM catalog.category
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

        let products: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM catalog.product
            WHERE category_id = $1
            ",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM catalog.category WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(category_id = %id, products, "Deleted category");
        Ok(products)
    }
}
