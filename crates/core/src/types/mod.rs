//! Core types for the catalog.
//!
//! This module provides type-safe wrappers for the catalog's domain concepts.

pub mod id;
pub mod name;
pub mod price;

pub use id::*;
pub use name::{Name, NameError};
pub use price::{Price, PriceError};
