//! GraphQL object types for categories and products.
//!
//! Each type lists its exposed fields explicitly; nothing is derived from the
//! storage schema.

use std::collections::HashMap;

use async_graphql::{Context, ErrorExtensions, ID, Object, Result};
use rust_decimal::Decimal;
use sqlx::PgPool;

use catalog_core::CategoryId;

use crate::models::{Category, Product, ProductWithCategory};
use crate::services::CatalogService;

/// A category as seen by API clients.
///
/// Products may be preloaded by the parent resolver; otherwise they are
/// fetched when the `products` field is selected.
pub struct CategoryType {
    category: Category,
    products: Option<Vec<Product>>,
}

impl CategoryType {
    /// Wrap a category whose products will be loaded on demand.
    #[must_use]
    pub const fn new(category: Category) -> Self {
        Self {
            category,
            products: None,
        }
    }

    /// Wrap a category together with its already loaded products.
    #[must_use]
    pub const fn with_products(category: Category, products: Vec<Product>) -> Self {
        Self {
            category,
            products: Some(products),
        }
    }

    /// Attach batch-loaded products to their categories.
    ///
    /// Categories without products get an empty list rather than `None`, so
    /// no follow-up query is issued for them.
    #[must_use]
    pub fn attach_products(categories: Vec<Category>, products: Vec<Product>) -> Vec<Self> {
        let mut by_category: HashMap<CategoryId, Vec<Product>> = HashMap::new();
        for product in products {
            by_category.entry(product.category_id).or_default().push(product);
        }

        categories
            .into_iter()
            .map(|category| {
                let products = by_category.remove(&category.id).unwrap_or_default();
                Self::with_products(category, products)
            })
            .collect()
    }
}

#[Object]
impl CategoryType {
    async fn id(&self) -> ID {
        ID(self.category.id.to_string())
    }

    async fn name(&self) -> &str {
        self.category.name.as_str()
    }

    async fn description(&self) -> &str {
        &self.category.description
    }

    /// Products filed under this category.
    async fn products(&self, ctx: &Context<'_>) -> Result<Vec<ProductType>> {
        let products = if let Some(products) = &self.products {
            products.clone()
        } else {
            let pool = ctx.data::<PgPool>()?;
            CatalogService::new(pool)
                .products_for_categories(&[self.category.id])
                .await
                .map_err(|e| e.extend())?
        };

        Ok(products
            .into_iter()
            .map(|product| ProductType::new(product, self.category.clone()))
            .collect())
    }
}

/// A product as seen by API clients, with its category already loaded.
pub struct ProductType {
    product: Product,
    category: Category,
}

impl ProductType {
    /// Wrap a product and its category.
    #[must_use]
    pub const fn new(product: Product, category: Category) -> Self {
        Self { product, category }
    }
}

impl From<ProductWithCategory> for ProductType {
    fn from(value: ProductWithCategory) -> Self {
        Self::new(value.product, value.category)
    }
}

#[Object]
impl ProductType {
    async fn id(&self) -> ID {
        ID(self.product.id.to_string())
    }

    async fn name(&self) -> &str {
        self.product.name.as_str()
    }

    async fn description(&self) -> &str {
        &self.product.description
    }

    async fn category(&self) -> CategoryType {
        CategoryType::new(self.category.clone())
    }

    /// Unit price as an exact decimal string with two places.
    async fn price(&self) -> Decimal {
        self.product.price.amount()
    }

    async fn quantity(&self) -> i32 {
        self.product.quantity
    }
}
