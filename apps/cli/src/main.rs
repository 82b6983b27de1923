//! # EcomLite CLI
//!
//! Terminal front end for the EcomLite storefront.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse arguments (clap)                                             │
//! │  2. Initialize tracing (stderr, RUST_LOG aware)                        │
//! │  3. Load configuration (file → env → validate)                         │
//! │  4. Open cart + session from the data directory                        │
//! │  5. Run one command                                                    │
//! │  6. Drop the app: queued slot writes are flushed before exit           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cli;
mod commands;
mod config;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, ConfigCommand};
use crate::commands::App;
use crate::config::StorefrontConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    // Config commands must work even when the current file is broken.
    if let Command::Config(command) = &cli.command {
        return run_config(command, cli.config.clone());
    }

    let config = StorefrontConfig::load(cli.config.clone())?;
    info!(api = %config.api_url(), "Configuration loaded");

    let app = App::open(config)?;

    match cli.command {
        Command::Products { category } => app.products(category.as_deref()).await,
        Command::Product { id } => app.product(id).await,
        Command::Cart(command) => app.cart(command).await,
        Command::Checkout => app.checkout(),
        Command::Login {
            username,
            password,
            avatar,
        } => app.login(username, password, avatar),
        Command::Logout => app.logout(),
        Command::Whoami => {
            app.whoami();
            Ok(())
        }
        Command::Admin(command) => app.admin(command).await,
        Command::Config(_) => Ok(()),
    }
}

fn run_config(command: &ConfigCommand, path: Option<std::path::PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let config = StorefrontConfig::load_or_default(path);
            print!("{}", config.to_toml()?);
            println!("# data dir: {}", config.data_dir()?.display());
        }
        ConfigCommand::Init { force } => {
            let target = match path.or_else(StorefrontConfig::default_config_path) {
                Some(target) => target,
                None => bail!("no config path available; pass --config"),
            };
            if target.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", target.display());
            }
            let written = StorefrontConfig::default().save(Some(target))?;
            println!("Wrote {}", written.display());
        }
    }
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ecomlite=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
