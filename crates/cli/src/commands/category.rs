//! Category management commands.
//!
//! Deletion has no GraphQL mutation; it is an operator task.

use catalog_core::CategoryId;
use catalog_server::db::{CategoryRepository, RepositoryError};
use thiserror::Error;

use super::{CommandError, connect};

/// Errors that can occur during category operations.
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error("Category {0} does not exist")]
    NotFound(CategoryId),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Delete a category. Its products are removed by `ON DELETE CASCADE`.
pub async fn delete(id: i32) -> Result<(), CategoryError> {
    let id = CategoryId::new(id);
    let pool = connect().await?;

    let removed = match CategoryRepository::new(&pool).delete(id).await {
        Ok(removed) => removed,
        Err(RepositoryError::NotFound) => return Err(CategoryError::NotFound(id)),
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Deleted category {id} and {removed} product(s)");
    Ok(())
}
