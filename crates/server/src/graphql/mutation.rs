//! Mutation root: create/update handlers for categories and products.

use async_graphql::{Context, ErrorExtensions, ID, InputObject, Object, Result, SimpleObject};
use sqlx::PgPool;

use super::types::{CategoryType, ProductType};
use crate::services::{CatalogService, ProductFields};

/// Product fields accepted by `createProduct` and `updateProduct`.
///
/// All fields must be supplied; updates overwrite every column.
#[derive(Debug, InputObject)]
pub struct ProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Converted to an exact two-place decimal before it is stored.
    pub price: Option<f64>,
    pub quantity: Option<i32>,
    /// ID of the owning category.
    pub category: Option<i32>,
}

impl From<ProductInput> for ProductFields {
    fn from(input: ProductInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
            price: input.price,
            quantity: input.quantity,
            category: input.category,
        }
    }
}

/// Payload of `createCategory`.
#[derive(SimpleObject)]
pub struct CreateCategory {
    pub category: CategoryType,
}

/// Payload of `updateCategory`.
#[derive(SimpleObject)]
pub struct UpdateCategory {
    pub category: CategoryType,
}

/// Payload of `createProduct`.
#[derive(SimpleObject)]
pub struct CreateProduct {
    pub product: ProductType,
}

/// Payload of `updateProduct`.
#[derive(SimpleObject)]
pub struct UpdateProduct {
    pub product: ProductType,
}

/// Root of all mutations.
#[derive(Debug, Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_category(&self, ctx: &Context<'_>, name: String) -> Result<CreateCategory> {
        let pool = ctx.data::<PgPool>()?;
        let category = CatalogService::new(pool)
            .create_category(&name)
            .await
            .map_err(|e| e.extend())?;

        Ok(CreateCategory {
            category: CategoryType::new(category),
        })
    }

    async fn update_category(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
        name: String,
    ) -> Result<UpdateCategory> {
        let pool = ctx.data::<PgPool>()?;
        let category = CatalogService::new(pool)
            .update_category(id.as_ref().map(|id| id.as_str()), &name)
            .await
            .map_err(|e| e.extend())?;

        Ok(UpdateCategory {
            category: CategoryType::new(category),
        })
    }

    async fn create_product(
        &self,
        ctx: &Context<'_>,
        input: ProductInput,
    ) -> Result<CreateProduct> {
        let pool = ctx.data::<PgPool>()?;
        let created = CatalogService::new(pool)
            .create_product(input.into())
            .await
            .map_err(|e| e.extend())?;

        Ok(CreateProduct {
            product: created.into(),
        })
    }

    async fn update_product(
        &self,
        ctx: &Context<'_>,
        input: ProductInput,
        id: Option<ID>,
    ) -> Result<UpdateProduct> {
        let pool = ctx.data::<PgPool>()?;
        let updated = CatalogService::new(pool)
            .update_product(id.as_ref().map(|id| id.as_str()), input.into())
            .await
            .map_err(|e| e.extend())?;

        Ok(UpdateProduct {
            product: updated.into(),
        })
    }
}
