//! Domain models for the catalog.
//!
//! These types represent validated domain objects, separate from the
//! database row types in [`crate::db`] and the GraphQL bindings in
//! [`crate::graphql`].

pub mod category;
pub mod product;

pub use category::Category;
pub use product::{Product, ProductDraft, ProductFilter, ProductRecord, ProductWithCategory};
