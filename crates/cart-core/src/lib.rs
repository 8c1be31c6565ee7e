//! # cart-core
//!
//! Core types and workflow for the storefront shopping-cart page.
//!
//! This crate provides:
//! - `Cart`, `CartItem` and the `/api/cart/items` snapshot shape
//! - `Price` and `Currency` with exact minor-unit arithmetic
//! - `Totals` for the order summary (subtotal, flat shipping, grand total)
//! - `CartPage` with the load / remove / change-quantity handlers
//! - `CheckoutOrchestrator`, the hosted-checkout state machine
//! - Collaborator traits (`CartBackend`, `ScriptLoader`, `PaymentWidget`,
//!   `PageHost`) so every outside dependency can be swapped for a fake
//! - HTML rendering of the page
//! - `CartError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use cart_core::{CartPage, CheckoutOrchestrator, CheckoutSettings, PlainChrome};
//!
//! let mut page = CartPage::new(backend);
//! page.load().await;
//!
//! page.change_quantity(&product_id, 3).await;
//! println!("{}", page.render(&PlainChrome));
//!
//! let mut checkout = CheckoutOrchestrator::new(loader, widget, host, CheckoutSettings::default());
//! let state = page.checkout(&mut checkout).await;
//! ```

pub mod cart;
pub mod checkout;
pub mod error;
pub mod gateway;
pub mod money;
pub mod orchestrator;
pub mod page;
pub mod totals;
pub mod view;

// Re-exports for convenience
pub use cart::{Cart, CartItem, CartSnapshot, ProductId};
pub use checkout::{
    CheckoutLine, CheckoutRequest, CheckoutSettings, OrderToken, Prefill, Theme,
    VerificationPayload, WidgetHandle, WidgetOptions, WidgetOutcome, WidgetResponder,
    WidgetResponse,
};
pub use error::{CartError, CartResult};
pub use gateway::{CartBackend, PageHost, PaymentWidget, ScriptLoader};
pub use money::{Currency, Price};
pub use orchestrator::{CheckoutOrchestrator, CheckoutState};
pub use page::CartPage;
pub use totals::{Totals, SHIPPING};
pub use view::{PageChrome, PlainChrome};
