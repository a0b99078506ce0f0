//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::CatalogConfig;
use crate::graphql::{self, CatalogSchema};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the database pool and the GraphQL schema built at start-up.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CatalogConfig,
    pool: PgPool,
    schema: CatalogSchema,
}

impl AppState {
    /// Create a new application state, building the GraphQL schema once.
    #[must_use]
    pub fn new(config: CatalogConfig, pool: PgPool) -> Self {
        let schema = graphql::build_schema(pool.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                schema,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the GraphQL schema.
    #[must_use]
    pub fn schema(&self) -> &CatalogSchema {
        &self.inner.schema
    }
}
