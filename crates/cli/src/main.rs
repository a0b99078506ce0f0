//! Catalog CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run catalog database migrations
//! catalog-cli migrate
//!
//! # Load categories and products from a YAML file
//! catalog-cli seed data/catalog.yaml
//!
//! # Print the GraphQL schema
//! catalog-cli schema
//!
//! # Delete a category and, by cascade, its products
//! catalog-cli category delete 3
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the catalog from a YAML file
//! - `schema` - Print the GraphQL SDL
//! - `category delete` - Delete a category

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(author, version, about = "Catalog CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed categories and products from a YAML file
    Seed {
        /// Path to the YAML seed file
        file: String,
    },
    /// Print the GraphQL schema in SDL
    Schema,
    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Delete a category together with its products
    Delete {
        /// Category id
        id: i32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => commands::seed::catalog(&file).await?,
        Commands::Schema => commands::schema::print(),
        Commands::Category { action } => match action {
            CategoryAction::Delete { id } => commands::category::delete(id).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_category_delete() {
        let cli = Cli::try_parse_from(["catalog-cli", "category", "delete", "7"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Category {
                action: CategoryAction::Delete { id: 7 }
            }
        ));
    }

    #[test]
    fn test_seed_requires_file() {
        assert!(Cli::try_parse_from(["catalog-cli", "seed"]).is_err());
    }
}
