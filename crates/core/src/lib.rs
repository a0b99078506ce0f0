//! Catalog Core - Shared domain types.
//!
//! This crate provides the types used across the catalog components:
//! - `server` - GraphQL API over the product catalog
//! - `cli` - Command-line tools for migrations, seeding and maintenance
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. Database encoding for ids is available behind the
//! `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, exact prices and names

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
