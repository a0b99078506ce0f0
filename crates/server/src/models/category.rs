//! Category domain type.

use serde::{Deserialize, Serialize};

use catalog_core::CategoryId;

/// A grouping of products, identified by a unique name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Category name, unique across the catalog, as stored.
    pub name: String,
    /// Free-form description (at most 255 characters, empty by default).
    pub description: String,
}
