//! # Commands
//!
//! Every command loads the cart first, applies at most one action, then
//! prints the resulting cart.

use crate::terminal::{ProbeScriptLoader, TerminalHost, TerminalWidget};
use cart_core::{Cart, CartPage, CheckoutOrchestrator, PlainChrome, ProductId, Totals};
use cart_http::{ClientConfig, HttpCartBackend};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::io::{self, Write};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "cart-page", version, about = "Storefront shopping cart in the terminal")]
pub struct Cli {
    /// Backend base URL (overrides CART_API_BASE_URL)
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    /// Session cookie as `name=value` (overrides CART_SESSION_COOKIE)
    #[arg(long, global = true)]
    pub session_cookie: Option<String>,

    /// Skip the startup banner
    #[arg(long, global = true)]
    pub no_banner: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Show the cart (default)
    Show {
        /// Print the page markup instead of a table
        #[arg(long)]
        html: bool,
    },
    /// Set an item's quantity; zero or below removes it
    SetQty {
        #[arg(value_parser = parse_product_id)]
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Add one to an item's quantity
    Increment {
        #[arg(value_parser = parse_product_id)]
        product_id: ProductId,
    },
    /// Take one off an item's quantity
    Decrement {
        #[arg(value_parser = parse_product_id)]
        product_id: ProductId,
    },
    /// Remove an item
    Remove {
        #[arg(value_parser = parse_product_id)]
        product_id: ProductId,
    },
    /// Pay for the cart through the hosted checkout
    Checkout,
}

/// Numeric ids go back to the backend as numbers, anything else as text
pub fn parse_product_id(raw: &str) -> Result<ProductId, Infallible> {
    Ok(match raw.parse::<i64>() {
        Ok(id) => ProductId::Numeric(id),
        Err(_) => ProductId::Text(raw.to_string()),
    })
}

impl Cli {
    /// Environment configuration with command-line overrides applied
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = ClientConfig::from_env()?;
        if let Some(url) = &self.api_base_url {
            config.api_base_url = url.clone();
        }
        if let Some(cookie) = &self.session_cookie {
            config = config.with_session_cookie(cookie.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.client_config()?;
    let settings = config.checkout.clone();
    info!("Backend: {}", config.api_base_url);

    let mut page = CartPage::new(HttpCartBackend::new(config)?);
    page.load().await;

    let command = cli.command.unwrap_or(Command::Show { html: false });
    let changed = match command {
        Command::Show { html: true } => {
            println!("{}", page.render(&PlainChrome));
            return Ok(());
        }
        Command::Show { html: false } => None,
        Command::SetQty {
            product_id,
            quantity,
        } => Some(page.change_quantity(&product_id, quantity).await),
        Command::Increment { product_id } => Some(page.increment(&product_id).await),
        Command::Decrement { product_id } => Some(page.decrement(&product_id).await),
        Command::Remove { product_id } => Some(page.remove_item(&product_id).await),
        Command::Checkout => {
            let loader = ProbeScriptLoader::new(reqwest::Client::new(), settings.script_url.clone());
            let mut checkout = CheckoutOrchestrator::new(
                loader,
                TerminalWidget::stdio(),
                TerminalHost::stderr(),
                settings,
            );
            let state = page.checkout(&mut checkout).await;
            println!("Checkout: {}", state);
            None
        }
    };

    if changed == Some(false) {
        eprintln!("The cart was not changed; see the log for details.");
    }

    let mut stdout = io::stdout().lock();
    print_cart(&mut stdout, page.cart(), &page.totals())?;
    Ok(())
}

/// Text rendition of the cart page
pub fn print_cart(out: &mut impl Write, cart: &Cart, totals: &Totals) -> io::Result<()> {
    if cart.is_empty() {
        writeln!(out, "Your Cart is Empty")?;
        writeln!(out, "Add some items to get started!")?;
        return Ok(());
    }

    writeln!(out, "Shopping Cart ({})", cart.username)?;
    writeln!(out, "You have {} items in your cart", totals.item_count)?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<12} {:<28} {:>5} {:>12} {:>12}",
        "ID", "Product", "Qty", "Price", "Total"
    )?;
    for item in &cart.items {
        writeln!(
            out,
            "{:<12} {:<28} {:>5} {:>12} {:>12}",
            item.product_id.to_string(),
            item.name,
            item.quantity,
            item.unit_price.display(),
            item.line_total.display()
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Subtotal: {}", totals.subtotal.display())?;
    writeln!(out, "Shipping: {}", totals.shipping.display())?;
    writeln!(out, "Total:    {}", totals.grand_total.display())?;
    Ok(())
}
