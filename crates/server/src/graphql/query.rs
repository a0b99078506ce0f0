//! Query root: the read-only `products` and `categories` resolvers.

use async_graphql::{Context, ErrorExtensions, Object, Result};
use sqlx::PgPool;

use super::types::{CategoryType, ProductType};
use crate::services::CatalogService;

/// Root of all read-only queries.
#[derive(Debug, Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All products, or only those whose category has exactly this name.
    async fn products(
        &self,
        ctx: &Context<'_>,
        category: Option<String>,
    ) -> Result<Vec<ProductType>> {
        let pool = ctx.data::<PgPool>()?;
        let products = CatalogService::new(pool)
            .list_products(category)
            .await
            .map_err(|e| e.extend())?;

        Ok(products.into_iter().map(ProductType::from).collect())
    }

    /// All categories.
    async fn categories(&self, ctx: &Context<'_>) -> Result<Vec<CategoryType>> {
        let pool = ctx.data::<PgPool>()?;
        let service = CatalogService::new(pool);
        let categories = service.list_categories().await.map_err(|e| e.extend())?;

        if !ctx.look_ahead().field("products").exists() {
            return Ok(categories.into_iter().map(CategoryType::new).collect());
        }

        let ids: Vec<_> = categories.iter().map(|c| c.id).collect();
        let products = service
            .products_for_categories(&ids)
            .await
            .map_err(|e| e.extend())?;

        Ok(CategoryType::attach_products(categories, products))
    }
}
