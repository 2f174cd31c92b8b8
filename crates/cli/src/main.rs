//! Dev Books CLI - Catalog inspection tools.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog the storefront would serve
//! books-cli catalog list
//!
//! # Validate a catalog file
//! books-cli catalog validate --file catalog.json
//!
//! # Show a single book
//! books-cli catalog show 1
//! ```
//!
//! # Commands
//!
//! - `catalog list` - List every book, marking the featured one
//! - `catalog validate` - Check a catalog file against the storefront's rules
//! - `catalog show` - Print one book's details

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "books-cli")]
#[command(author, version, about = "Dev Books CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and validate book catalogs
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List every book in the catalog
    List {
        /// Catalog JSON file (defaults to `STOREFRONT_CATALOG_PATH`, then the sample catalog)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Validate a catalog JSON file
    Validate {
        /// Catalog JSON file
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Show one book
    Show {
        /// Book identifier
        id: String,

        /// Catalog JSON file (defaults to `STOREFRONT_CATALOG_PATH`, then the sample catalog)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { file } => {
                commands::catalog::list(file)?;
            }
            CatalogAction::Validate { file } => {
                commands::catalog::validate(&file)?;
            }
            CatalogAction::Show { id, file } => {
                commands::catalog::show(&id, file)?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_validate_requires_file() {
        assert!(Cli::try_parse_from(["books-cli", "catalog", "validate"]).is_err());
    }

    #[test]
    fn test_parse_show() {
        let cli = Cli::try_parse_from(["books-cli", "catalog", "show", "2", "-f", "books.json"])
            .unwrap_or_else(|e| panic!("{e}"));
        let Commands::Catalog {
            action: CatalogAction::Show { id, file },
        } = cli.command
        else {
            panic!("expected catalog show");
        };
        assert_eq!(id, "2");
        assert_eq!(file, Some(PathBuf::from("books.json")));
    }
}
