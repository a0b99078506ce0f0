//! Database operations for the catalog `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `catalog.category` - Product categories (unique name)
//! - `catalog.product` - Products, `ON DELETE CASCADE` from their category
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/`, embedded into the
//! binary, and run via:
//! ```bash
//! cargo run -p catalog-cli -- migrate
//! ```
//!
//! # Transactions
//!
//! Every write method opens its own transaction and commits it before
//! returning. A failed write is rolled back when the transaction is dropped,
//! so callers never observe half-applied mutations.

pub mod categories;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use products::ProductRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation (e.g., duplicate category name).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Foreign key violation (e.g., product pointing at a missing category).
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply all pending migrations embedded from `crates/server/migrations/`.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails or the
/// database's migration history diverges from the embedded set.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Classify a write error by the constraint it tripped.
///
/// `conflict` and `reference` describe the violation in terms of the entity
/// being written; the constraint name from Postgres is appended when present.
fn classify_write_error(e: sqlx::Error, conflict: &str, reference: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        let detail = db_err
            .constraint()
            .map_or_else(String::new, |name| format!(" ({name})"));

        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(format!("{conflict}{detail}"));
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::InvalidReference(format!("{reference}{detail}"));
        }
    }
    RepositoryError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_passes_through_non_database_errors() {
        let err = classify_write_error(sqlx::Error::RowNotFound, "dup", "missing");
        assert!(matches!(err, RepositoryError::Database(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn test_repository_error_display() {
        assert_eq!(RepositoryError::NotFound.to_string(), "not found");
        assert_eq!(
            RepositoryError::Conflict("category name already exists".to_owned()).to_string(),
            "constraint violation: category name already exists"
        );
    }
}
