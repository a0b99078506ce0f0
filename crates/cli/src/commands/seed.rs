//! Seed the catalog from a YAML file.
//!
//! Categories are matched by name: a category that already exists is left
//! untouched together with its products, so running the same file twice
//! does not create duplicates. A category and its products are committed
//! together.
//!
//! ```yaml
//! categories:
//!   - name: Tools
//!     description: Hand and power tools
//!     products:
//!       - name: Hammer
//!         description: 16 oz claw hammer
//!         price: 19.99
//!         quantity: 5
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use catalog_core::{Name, NameError, Price, PriceError};
use catalog_server::db::{CategoryRepository, RepositoryError};
use catalog_server::models::ProductDraft;

use super::{CommandError, connect};

/// Root of a seed file.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub quantity: i32,
}

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid name {name:?}: {source}")]
    InvalidName { name: String, source: NameError },

    #[error("Description of category {category:?} exceeds {max} characters")]
    DescriptionTooLong { category: String, max: usize },

    #[error("Invalid price for product {product:?}: {source}")]
    InvalidPrice { product: String, source: PriceError },

    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Totals reported after a seed run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories_created: usize,
    pub categories_skipped: usize,
    pub products_created: usize,
}

fn parse_name(raw: &str) -> Result<Name, SeedError> {
    Name::parse(raw).map_err(|source| SeedError::InvalidName {
        name: raw.to_owned(),
        source,
    })
}

/// A seed category whose names and prices have been validated.
#[derive(Debug)]
struct PreparedCategory {
    name: Name,
    description: String,
    products: Vec<ProductDraft>,
}

/// Check every name and price before anything is written.
fn prepare(file: &SeedFile) -> Result<Vec<PreparedCategory>, SeedError> {
    file.categories
        .iter()
        .map(|category| {
            let name = parse_name(&category.name)?;
            if category.description.chars().count() > Name::MAX_LENGTH {
                return Err(SeedError::DescriptionTooLong {
                    category: category.name.clone(),
                    max: Name::MAX_LENGTH,
                });
            }

            let products = category
                .products
                .iter()
                .map(|product| {
                    Ok(ProductDraft {
                        name: parse_name(&product.name)?,
                        description: product.description.clone(),
                        price: Price::from_f64(product.price).map_err(|source| {
                            SeedError::InvalidPrice {
                                product: product.name.clone(),
                                source,
                            }
                        })?,
                        quantity: product.quantity,
                    })
                })
                .collect::<Result<Vec<_>, SeedError>>()?;

            Ok(PreparedCategory {
                name,
                description: category.description.clone(),
                products,
            })
        })
        .collect()
}

/// Seed categories and products from a YAML file.
///
/// Each category is written together with its products in one transaction,
/// so an interrupted run never leaves a category half populated.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, contains invalid
/// names or prices, or a database operation fails.
pub async fn catalog(file_path: &str) -> Result<(), SeedError> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(SeedError::FileNotFound(file_path.to_owned()));
    }

    info!(path = %file_path, "Loading catalog seed file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let file: SeedFile = serde_yaml::from_str(&content)?;
    let prepared = prepare(&file)?;

    info!(categories = prepared.len(), "Parsed seed file");

    let pool = connect().await?;
    let categories = CategoryRepository::new(&pool);
    let mut summary = SeedSummary::default();

    for seed in &prepared {
        match categories
            .create_with_products(&seed.name, &seed.description, &seed.products)
            .await
        {
            Ok(_) => {
                summary.categories_created += 1;
                summary.products_created += seed.products.len();
            }
            Err(RepositoryError::Conflict(_)) => {
                info!(category = %seed.name, "Category already exists, skipping");
                summary.categories_skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!("Seeding complete!");
    info!("  Categories created: {}", summary.categories_created);
    info!("  Categories skipped (already exist): {}", summary.categories_skipped);
    info!("  Products created: {}", summary.products_created);

    Ok(())
}
