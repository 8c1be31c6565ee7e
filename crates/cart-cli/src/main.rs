//! # cart-page
//!
//! The storefront shopping cart, driven from a terminal.
//!
//! ## Usage
//!
//! ```bash
//! # Point at the storefront backend and a logged-in session
//! export CART_API_BASE_URL=http://localhost:8080
//! export CART_SESSION_COOKIE=authToken=...
//! export RAZORPAY_KEY_ID=rzp_test_...
//!
//! cart-page show
//! cart-page increment 42
//! cart-page checkout
//! ```

use cart_cli::Cli;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout is reserved for the cart itself
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    if !cli.no_banner {
        print_banner();
    }

    cart_cli::run(cli).await
}

fn print_banner() {
    eprintln!(
        r#"
  🛒 Cart Page 🛒
  ━━━━━━━━━━━━━━━━━━━━━━━
  Storefront shopping cart
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
