//! # Collaborator Traits
//!
//! Everything the cart page talks to but does not own: the storefront
//! backend, the hosted checkout script and widget, and the host page
//! (alerts and navigation).
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         CartPage                             │
//! │   load / remove_item / change_quantity / checkout            │
//! └──────────────────────────────────────────────────────────────┘
//!        │                 │                  │            │
//!  ┌─────┴──────┐  ┌───────┴──────┐  ┌────────┴─────┐ ┌────┴─────┐
//!  │CartBackend │  │ ScriptLoader │  │PaymentWidget │ │ PageHost │
//!  │ (HTTP API) │  │(checkout.js) │  │(hosted modal)│ │alert/nav │
//!  └────────────┘  └──────────────┘  └──────────────┘ └──────────┘
//! ```
//!
//! The traits are `?Send`: the page runs on a single cooperative event loop
//! (the browser, or a current-thread runtime).

use crate::cart::{CartSnapshot, ProductId};
use crate::checkout::{CheckoutRequest, OrderToken, VerificationPayload, WidgetHandle, WidgetOptions};
use crate::error::CartResult;
use async_trait::async_trait;

/// Storefront backend. Every call carries the session credentials.
#[async_trait(?Send)]
pub trait CartBackend {
    /// `GET /api/cart/items`
    async fn fetch_cart(&self) -> CartResult<CartSnapshot>;

    /// `DELETE /api/cart/delete`. Succeeds only on 204.
    async fn remove_item(&self, username: &str, product_id: &ProductId) -> CartResult<()>;

    /// `PUT /api/cart/update`
    async fn update_quantity(
        &self,
        username: &str,
        product_id: &ProductId,
        quantity: u32,
    ) -> CartResult<()>;

    /// `POST /api/payment/create`. Returns the plaintext order token.
    async fn create_payment_order(&self, request: &CheckoutRequest) -> CartResult<OrderToken>;

    /// `POST /api/payment/verify`. Returns the response body.
    async fn verify_payment(&self, payload: &VerificationPayload) -> CartResult<String>;
}

/// Loads the hosted checkout script.
#[async_trait(?Send)]
pub trait ScriptLoader {
    /// Make sure the script is present, injecting it at most once.
    /// Returns `false` when it could not be loaded.
    async fn ensure_loaded(&self) -> bool;
}

/// The hosted payment widget.
pub trait PaymentWidget {
    /// Open the widget. The returned handle resolves once the widget reports
    /// a result or is dismissed.
    fn open(&self, options: WidgetOptions) -> CartResult<WidgetHandle>;
}

/// The page hosting the cart: blocking alerts and route changes.
pub trait PageHost {
    fn alert(&self, message: &str);

    fn navigate(&self, route: &str);
}
