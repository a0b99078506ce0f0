//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for the catalog service. GraphQL
//! resolvers return `async_graphql::Result`; `AppError::extend` turns an
//! `AppError` into an `async_graphql::Error` carrying a machine-readable
//! `code` extension.
//! Server-side failures are captured to Sentry before they are reported.

use async_graphql::ErrorExtensions;
use thiserror::Error;

use catalog_core::{IdParseError, NameError, PriceError};

use crate::db::RepositoryError;

/// Application-level error type for the catalog.
#[derive(Debug, Error)]
pub enum AppError {
    /// Referenced id does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate category name.
    #[error("Uniqueness violation: {0}")]
    UniquenessViolation(String),

    /// Product references a category that does not exist.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Missing required field or malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[source] RepositoryError),
}

impl AppError {
    /// Stable error code exposed to clients in `extensions.code`.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::UniquenessViolation(_) => "UNIQUENESS_VIOLATION",
            Self::ForeignKeyViolation(_) => "FOREIGN_KEY_VIOLATION",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "INTERNAL_ERROR",
        }
    }

    /// Not-found error naming the missing entity.
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} {id} does not exist"))
    }

    /// Map a repository error, naming the entity for not-found errors.
    pub fn from_repository(entity: &str, id: impl std::fmt::Display, err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::not_found(entity, id),
            other => other.into(),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("record does not exist".to_owned()),
            RepositoryError::Conflict(msg) => Self::UniquenessViolation(msg),
            RepositoryError::InvalidReference(msg) => Self::ForeignKeyViolation(msg),
            other @ (RepositoryError::Database(_) | RepositoryError::DataCorruption(_)) => {
                Self::Database(other)
            }
        }
    }
}

impl From<NameError> for AppError {
    fn from(err: NameError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<PriceError> for AppError {
    fn from(err: PriceError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<IdParseError> for AppError {
    fn from(err: IdParseError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        // Capture server errors to Sentry
        if let Self::Database(source) = self {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %source,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match self {
            Self::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        let code = self.code();
        async_graphql::Error::new(message).extend_with(|_, e| e.set("code", code))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(err: &async_graphql::Error) -> Option<String> {
        let value = err.extensions.as_ref()?.get("code")?;
        match value {
            async_graphql::Value::String(code) => Some(code.clone()),
            _ => None,
        }
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123 does not exist".to_string());
        assert_eq!(err.to_string(), "Not found: product 123 does not exist");

        let err = AppError::Validation("field `price` is required".to_string());
        assert_eq!(err.to_string(), "Validation error: field `price` is required");
    }

    #[test]
    fn test_repository_errors_map_to_kinds() {
        assert!(matches!(
            AppError::from(RepositoryError::Conflict("dup".into())),
            AppError::UniquenessViolation(_)
        ));
        assert!(matches!(
            AppError::from(RepositoryError::InvalidReference("missing".into())),
            AppError::ForeignKeyViolation(_)
        ));
        assert!(matches!(
            AppError::from(RepositoryError::DataCorruption("bad".into())),
            AppError::Database(_)
        ));
    }

    #[test]
    fn test_from_repository_names_entity() {
        let err = AppError::from_repository("Category", 9, RepositoryError::NotFound);
        assert_eq!(err.to_string(), "Not found: Category 9 does not exist");
    }

    #[test]
    fn test_graphql_error_codes() {
        let cases = [
            (AppError::NotFound("x".into()), "NOT_FOUND"),
            (AppError::UniquenessViolation("x".into()), "UNIQUENESS_VIOLATION"),
            (AppError::ForeignKeyViolation("x".into()), "FOREIGN_KEY_VIOLATION"),
            (AppError::Validation("x".into()), "VALIDATION_ERROR"),
        ];

        for (err, expected) in cases {
            let gql = err.extend();
            assert_eq!(code_of(&gql).as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::Database(RepositoryError::DataCorruption(
            "invalid product price in database".into(),
        ));
        let gql = err.extend();
        assert_eq!(gql.message, "Internal server error");
        assert_eq!(code_of(&gql).as_deref(), Some("INTERNAL_ERROR"));
    }

    #[test]
    fn test_price_errors_are_validation_errors() {
        let err: AppError = PriceError::NotFinite.into();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}
