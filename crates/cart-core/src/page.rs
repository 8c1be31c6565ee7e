//! # Cart Page
//!
//! The page state: the local mirror of the server cart and the handlers for
//! what the user can do with it. Local state only ever changes after the
//! backend confirmed the matching mutation.

use crate::cart::{Cart, ProductId};
use crate::gateway::{CartBackend, PageHost, PaymentWidget, ScriptLoader};
use crate::orchestrator::{CheckoutOrchestrator, CheckoutState};
use crate::totals::Totals;
use crate::view::{self, PageChrome};
use tracing::{error, info, instrument, warn};

/// Shopping-cart page bound to a backend
pub struct CartPage<B> {
    backend: B,
    cart: Cart,
}

impl<B: CartBackend> CartPage<B> {
    /// Create an empty page; call [`CartPage::load`] once when it is shown
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cart: Cart::default(),
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn username(&self) -> &str {
        &self.cart.username
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Order summary for the items currently shown
    pub fn totals(&self) -> Totals {
        Totals::of(&self.cart.items)
    }

    /// Replace the local cart with the server snapshot. On failure the page
    /// shows an empty cart.
    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        match self.backend.fetch_cart().await {
            Ok(snapshot) => {
                self.cart = Cart::from_snapshot(snapshot);
                info!(
                    "Loaded cart: user={}, {} items",
                    self.cart.username,
                    self.cart.len()
                );
            }
            Err(e) => {
                error!("Error fetching cart items: {}", e);
                self.cart = Cart::default();
            }
        }
    }

    /// Remove an item once the backend confirmed the delete.
    ///
    /// Returns true if the local cart changed.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn remove_item(&mut self, product_id: &ProductId) -> bool {
        match self
            .backend
            .remove_item(&self.cart.username, product_id)
            .await
        {
            Ok(()) => {
                let removed = self.cart.remove(product_id).is_some();
                info!("Removed item: {}", product_id);
                removed
            }
            Err(e) => {
                error!("Error removing item: {}", e);
                false
            }
        }
    }

    /// Set an item's quantity. Zero or below removes the item.
    ///
    /// Returns true if the local cart changed.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn change_quantity(&mut self, product_id: &ProductId, new_quantity: i64) -> bool {
        if new_quantity <= 0 {
            return self.remove_item(product_id).await;
        }
        let quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);

        if let Err(e) = self
            .backend
            .update_quantity(&self.cart.username, product_id, quantity)
            .await
        {
            error!("Error updating quantity: {}", e);
            return false;
        }

        match self.cart.set_quantity(product_id, quantity) {
            Ok(item) => {
                info!(
                    "Updated quantity: {} x{} = {}",
                    product_id,
                    quantity,
                    item.line_total.display()
                );
                true
            }
            Err(e) => {
                warn!("Quantity confirmed for an item not on the page: {}", e);
                false
            }
        }
    }

    /// The "+" stepper button
    pub async fn increment(&mut self, product_id: &ProductId) -> bool {
        let Some(current) = self.cart.get(product_id).map(|i| i.quantity as i64) else {
            return false;
        };
        self.change_quantity(product_id, current + 1).await
    }

    /// The "−" stepper button; stepping below one removes the item
    pub async fn decrement(&mut self, product_id: &ProductId) -> bool {
        let Some(current) = self.cart.get(product_id).map(|i| i.quantity as i64) else {
            return false;
        };
        self.change_quantity(product_id, current - 1).await
    }

    /// "Proceed to Checkout". Does nothing while the cart is empty, since
    /// the empty page has no checkout button.
    pub async fn checkout<S, W, H>(
        &self,
        orchestrator: &mut CheckoutOrchestrator<S, W, H>,
    ) -> CheckoutState
    where
        S: ScriptLoader,
        W: PaymentWidget,
        H: PageHost,
    {
        if self.cart.is_empty() {
            warn!("Checkout requested with an empty cart");
            return orchestrator.state();
        }
        orchestrator
            .run(&self.backend, &self.cart.username, &self.cart.items)
            .await
    }

    /// Render the page markup
    pub fn render(&self, chrome: &dyn PageChrome) -> String {
        view::render(&self.cart, &self.totals(), chrome)
    }
}
