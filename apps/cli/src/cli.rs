//! Command line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ecomlite_core::{Money, ProductId};

#[derive(Debug, Parser)]
#[command(name = "ecomlite", version, about = "EcomLite storefront from the terminal")]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the catalog
    Products {
        /// Only show this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one product from the catalog API
    Product { id: ProductId },
    /// Inspect or change the cart
    #[command(subcommand)]
    Cart(CartCommand),
    /// Place a simulated order and empty the cart
    Checkout,
    /// Start a mock session (nothing is verified)
    Login {
        #[arg(short, long)]
        username: String,
        /// At least 6 characters; checked and discarded
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        avatar: Option<String>,
    },
    /// End the mock session
    Logout,
    /// Show the mock session's profile
    Whoami,
    /// Catalog edits (requires login; not sent to the API)
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Show or create the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Print lines and totals
    Show,
    /// Add a product by id
    Add {
        id: ProductId,
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },
    /// Remove a line
    Remove { id: ProductId },
    /// Set a line's quantity (0 removes it)
    Set {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create a product
    Add(ProductForm),
    /// Edit a product
    Edit {
        id: ProductId,
        #[command(flatten)]
        form: ProductForm,
    },
    /// Delete a product
    Remove { id: ProductId },
}

/// Fields of the admin product form.
#[derive(Debug, Clone, Args)]
pub struct ProductForm {
    #[arg(long)]
    pub title: String,
    /// Decimal price, e.g. 24.50
    #[arg(long, value_parser = parse_money)]
    pub price: Money,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_money(value: &str) -> Result<Money, String> {
    value
        .trim()
        .trim_start_matches('$')
        .parse::<f64>()
        .ok()
        .and_then(Money::from_decimal)
        .ok_or_else(|| format!("'{}' is not a price", value))
}
