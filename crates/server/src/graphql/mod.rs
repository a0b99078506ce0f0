//! GraphQL schema for the catalog.
//!
//! The schema is built once at start-up by [`build_schema`] and handed to the
//! HTTP layer as an immutable value; there is no global schema object.
//!
//! # Operations
//!
//! - `products(category: String)` - List products, optionally by category name
//! - `categories` - List categories
//! - `createCategory(name: String!)` / `updateCategory(id: ID, name: String!)`
//! - `createProduct(input: ProductInput!)` / `updateProduct(input: ProductInput!, id: ID)`
//!
//! Failures are reported as GraphQL errors whose `extensions.code` is one of
//! `NOT_FOUND`, `UNIQUENESS_VIOLATION`, `FOREIGN_KEY_VIOLATION`,
//! `VALIDATION_ERROR` or `INTERNAL_ERROR`.

pub mod mutation;
pub mod query;
pub mod types;

use async_graphql::extensions::Tracing;
use async_graphql::{EmptySubscription, Schema};
use sqlx::PgPool;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

/// The catalog's executable schema.
pub type CatalogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Maximum selection depth. Categories and products reference each other, so
/// an unbounded query could nest indefinitely.
const MAX_QUERY_DEPTH: usize = 12;

/// Build the schema with the database pool available to every resolver.
#[must_use]
pub fn build_schema(pool: PgPool) -> CatalogSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(pool)
        .extension(Tracing)
        .limit_depth(MAX_QUERY_DEPTH)
        .finish()
}

/// Render the schema in GraphQL SDL.
#[must_use]
pub fn schema_sdl() -> String {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .finish()
        .sdl()
}
