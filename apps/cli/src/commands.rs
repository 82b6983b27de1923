//! # Command Handlers
//!
//! Each handler is a thin view: it calls into the core crates and prints.
//!
//! ## Application Context
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  App                                                                    │
//! │  ├── config    StorefrontConfig                                        │
//! │  ├── cart      CartStore    ─┐                                         │
//! │  ├── session   MockSession  ─┴─► one slot directory (data_dir)         │
//! │  └── catalog   ProductCatalog ──► catalog API (lazy, fetched on use)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use ecomlite_core::catalog::ProductDraft;
use ecomlite_core::checkout::Order;
use ecomlite_core::validation::validate_quantity;
use ecomlite_core::{CartState, Product, ProductId};
use ecomlite_fetch::{ClientConfig, FetchMode, HttpFetcher, ProductCatalog};
use ecomlite_store::{
    CartStore, FileSlot, KeyValueSlot, LoginRequest, MockSession, SlotCartRepository,
    SlotProfileRepository, WriteBehindSlot,
};
use tracing::debug;

use crate::cli::{AdminCommand, CartCommand, ProductForm};
use crate::config::StorefrontConfig;

/// Everything a command may need, opened once per invocation.
pub struct App {
    pub config: StorefrontConfig,
    pub cart: CartStore,
    pub session: MockSession,
    pub catalog: ProductCatalog,
}

impl App {
    /// Opens the persisted cart and session and prepares the catalog.
    pub fn open(config: StorefrontConfig) -> Result<Self> {
        let data_dir = config.data_dir()?;
        let files = FileSlot::open(&data_dir)
            .with_context(|| format!("cannot open data directory {}", data_dir.display()))?;
        debug!(dir = %data_dir.display(), write_behind = config.storage.write_behind, "Opening storage");

        let slot: Arc<dyn KeyValueSlot> = if config.storage.write_behind {
            Arc::new(WriteBehindSlot::spawn(files)?)
        } else {
            Arc::new(files)
        };

        let cart = CartStore::open(SlotCartRepository::new(Arc::clone(&slot)));
        let session = MockSession::open(SlotProfileRepository::new(slot));

        let fetcher = HttpFetcher::new(ClientConfig::new().with_timeout(config.timeout()))?;
        let catalog = ProductCatalog::new(config.api_url(), Arc::new(fetcher), FetchMode::Lazy);

        Ok(App {
            config,
            cart,
            session,
            catalog,
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub async fn products(&self, category: Option<&str>) -> Result<()> {
        let products = self.load_catalog().await?;
        let shown: Vec<&Product> = products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category.eq_ignore_ascii_case(c)))
            .collect();

        if shown.is_empty() {
            println!("No products found.");
            return Ok(());
        }
        for product in shown {
            println!("{}", product_row(product));
        }
        Ok(())
    }

    pub async fn product(&self, id: ProductId) -> Result<()> {
        let product = self.fetch_product(id).await?;

        println!("{}", product.title);
        println!("  id:       {}", product.id);
        println!("  price:    {}", product.price);
        if !product.category.is_empty() {
            println!("  category: {}", product.category);
        }
        if let Some(rating) = product.rating {
            println!("  rating:   {:.1} ({} reviews)", rating.rate, rating.count);
        }
        if !product.description.is_empty() {
            println!();
            println!("{}", product.description);
        }
        Ok(())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub async fn cart(&self, command: CartCommand) -> Result<()> {
        match command {
            CartCommand::Show => {}
            CartCommand::Add { id, quantity } => {
                validate_quantity(quantity)?;
                let product = self.fetch_product(id).await?;
                println!("Added {} × {}", quantity, product.title);
                self.cart.add(product, quantity);
            }
            CartCommand::Remove { id } => {
                if self.cart.snapshot().line(id).is_none() {
                    println!("Product {} is not in the cart.", id);
                }
                self.cart.remove(id);
            }
            CartCommand::Set { id, quantity } => {
                if quantity > 0 {
                    validate_quantity(quantity)?;
                }
                if quantity > 0 && self.cart.snapshot().line(id).is_none() {
                    println!("Product {} is not in the cart; add it first.", id);
                }
                self.cart.set_quantity(id, quantity);
            }
            CartCommand::Clear => {
                self.cart.clear();
            }
        }

        print_cart(&self.cart.snapshot());
        Ok(())
    }

    pub fn checkout(&self) -> Result<()> {
        let order = self.cart.checkout()?;
        print_order(&order);
        Ok(())
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub fn login(&self, username: String, password: String, avatar: Option<String>) -> Result<()> {
        let profile = self.session.login(LoginRequest {
            username,
            password,
            avatar,
        })?;
        println!("Logged in as {}.", profile.username);
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.session.logout()?;
        println!("Logged out.");
        Ok(())
    }

    pub fn whoami(&self) {
        match self.session.profile() {
            Some(profile) => {
                println!("{}", profile.username);
                if let Some(avatar) = profile.avatar {
                    println!("  avatar: {}", avatar);
                }
            }
            None => println!("Not logged in."),
        }
    }

    // =========================================================================
    // Admin
    // =========================================================================

    pub async fn admin(&self, command: AdminCommand) -> Result<()> {
        let admin = self
            .session
            .require_login()
            .context("admin commands require a session; run `ecomlite login` first")?;
        debug!(username = %admin.username, "Admin command");

        self.load_catalog().await?;

        match command {
            AdminCommand::Add(form) => {
                let product = self.catalog.add_product(draft(form))?;
                println!("Created {}", product_row(&product));
            }
            AdminCommand::Edit { id, form } => {
                let product = self.catalog.update_product(id, draft(form))?;
                println!("Updated {}", product_row(&product));
            }
            AdminCommand::Remove { id } => {
                if !self.catalog.remove_product(id) {
                    bail!("product {} not found", id);
                }
                println!("Removed product {}", id);
            }
        }

        println!();
        println!("Catalog now ({} products, local only):", self.catalog.products().len());
        for product in self.catalog.products() {
            println!("{}", product_row(&product));
        }
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn load_catalog(&self) -> Result<Vec<Product>> {
        let state = self.catalog.refresh().await;
        if let Some(error) = state.error {
            bail!("could not load products: {}", error);
        }
        Ok(state.data.unwrap_or_default())
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Product> {
        let state = self.catalog.product(id, FetchMode::Lazy).trigger().await;
        if let Some(error) = state.error {
            bail!("could not load product {}: {}", id, error);
        }
        state
            .data
            .with_context(|| format!("product {} not found", id))
    }
}

fn draft(form: ProductForm) -> ProductDraft {
    ProductDraft {
        title: form.title,
        price: form.price,
        description: form.description,
        category: form.category,
        image: form.image,
    }
}

fn product_row(product: &Product) -> String {
    format!("{:>6}  {:>9}  {}", product.id, product.price.to_string(), product.title)
}

fn print_cart(cart: &CartState) {
    if cart.is_empty() {
        println!("Cart is empty.");
        return;
    }

    for line in cart.lines() {
        println!(
            "{:>6}  {:>4} × {:>9}  {:>9}  {}",
            line.product.id,
            line.quantity,
            line.product.price.to_string(),
            line.line_total().to_string(),
            line.product.title
        );
    }
    let totals = cart.totals();
    println!(
        "{} lines, {} items, total {}",
        totals.line_count, totals.total_items, totals.total_price
    );
}

fn print_order(order: &Order) {
    println!("Order {} placed at {}", order.id, order.placed_at.to_rfc3339());
    for line in &order.lines {
        println!(
            "  {:>4} × {}  {}",
            line.quantity, line.title, line.line_total
        );
    }
    println!("{} items, total {}", order.total_items, order.total_price);
    println!("(Simulated checkout: nothing was charged.)");
}
