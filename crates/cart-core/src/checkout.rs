//! # Checkout Types
//!
//! Request and response shapes for the hosted checkout: the order-creation
//! snapshot, widget configuration, the widget's result channel and the
//! verification payload.

use crate::cart::{CartItem, ProductId};
use crate::error::{CartError, CartResult};
use crate::money::{serialize_decimal, Currency, Price};
use crate::totals::Totals;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Default hosted checkout script
pub const DEFAULT_SCRIPT_URL: &str = "https://checkout.razorpay.com/v1/checkout.js";

/// Route shown after a verified payment
pub const DEFAULT_SUCCESS_ROUTE: &str = "/customerhome";

/// Opaque order id issued by the backend for one payment attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderToken(pub String);

impl OrderToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One line of the order-creation request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(serialize_with = "serialize_decimal")]
    pub price: Price,
}

/// Body of `POST /api/payment/create`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Subtotal of the cart (shipping is not charged through the widget)
    #[serde(serialize_with = "serialize_decimal")]
    pub total_amount: Price,
    pub cart_items: Vec<CheckoutLine>,
}

impl CheckoutRequest {
    /// Snapshot the current item list
    pub fn from_items(items: &[CartItem]) -> Self {
        Self {
            total_amount: Totals::of(items).subtotal,
            cart_items: items
                .iter()
                .map(|item| CheckoutLine {
                    product_id: item.product_id.clone(),
                    quantity: item.quantity,
                    price: item.unit_price,
                })
                .collect(),
        }
    }
}

/// What the hosted widget hands back on completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetResponse {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// Body of `POST /api/payment/verify`, forwarded from the widget unmodified
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationPayload {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

impl From<WidgetResponse> for VerificationPayload {
    fn from(response: WidgetResponse) -> Self {
        Self {
            razorpay_order_id: response.razorpay_order_id,
            razorpay_payment_id: response.razorpay_payment_id,
            razorpay_signature: response.razorpay_signature,
        }
    }
}

/// Buyer details prefilled in the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub color: String,
}

/// Configuration object passed to the hosted widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetOptions {
    pub key: String,
    /// Amount in the smallest currency unit
    pub amount: i64,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub order_id: String,
    pub prefill: Prefill,
    pub theme: Theme,
}

impl WidgetOptions {
    pub fn new(settings: &CheckoutSettings, order: &OrderToken, amount: Price, username: &str) -> Self {
        Self {
            key: settings.key.clone(),
            amount: amount.amount,
            currency: settings.currency.as_str().to_string(),
            name: settings.display_name.clone(),
            description: settings.description.clone(),
            order_id: order.0.clone(),
            prefill: Prefill {
                name: username.to_string(),
                email: settings.prefill_email.clone(),
                contact: settings.prefill_contact.clone(),
            },
            theme: Theme {
                color: settings.theme_color.clone(),
            },
        }
    }
}

/// How an opened widget finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetOutcome {
    /// The widget reported a payment
    Completed(WidgetResponse),
    /// The widget closed without reporting anything
    Dismissed,
}

/// Receiving end of the widget's result channel
#[derive(Debug)]
pub struct WidgetHandle {
    rx: oneshot::Receiver<WidgetResponse>,
}

/// Sending end, given to whatever receives the widget's completion callback
#[derive(Debug)]
pub struct WidgetResponder {
    tx: oneshot::Sender<WidgetResponse>,
}

impl WidgetHandle {
    /// Create a connected responder/handle pair
    pub fn channel() -> (WidgetResponder, WidgetHandle) {
        let (tx, rx) = oneshot::channel();
        (WidgetResponder { tx }, WidgetHandle { rx })
    }

    /// Wait for the widget. A dropped responder counts as dismissal.
    pub async fn outcome(self) -> WidgetOutcome {
        match self.rx.await {
            Ok(response) => WidgetOutcome::Completed(response),
            Err(_) => WidgetOutcome::Dismissed,
        }
    }
}

impl WidgetResponder {
    /// Deliver the widget result. Fails if nobody is waiting any more.
    pub fn complete(self, response: WidgetResponse) -> CartResult<()> {
        self.tx
            .send(response)
            .map_err(|_| CartError::Widget("checkout is no longer waiting for the widget".to_string()))
    }
}

/// Static checkout configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CheckoutSettings {
    /// Public widget key
    pub key: String,
    pub currency: Currency,
    /// Merchant name shown in the widget
    pub display_name: String,
    pub description: String,
    pub prefill_email: String,
    pub prefill_contact: String,
    pub theme_color: String,
    pub script_url: String,
    /// Where to go after a verified payment
    pub success_route: String,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            key: String::new(),
            currency: Currency::INR,
            display_name: "SalesSavvy".to_string(),
            description: "Test Transaction".to_string(),
            prefill_email: String::new(),
            prefill_contact: String::new(),
            theme_color: "#3399cc".to_string(),
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            success_route: DEFAULT_SUCCESS_ROUTE.to_string(),
        }
    }
}

impl CheckoutSettings {
    /// Builder: set the widget key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Builder: set prefill contact details
    pub fn with_prefill(mut self, email: impl Into<String>, contact: impl Into<String>) -> Self {
        self.prefill_email = email.into();
        self.prefill_contact = contact.into();
        self
    }

    /// Check if using a test key
    pub fn is_test_mode(&self) -> bool {
        self.key.starts_with("rzp_test_")
    }

    /// Check if using a live key
    pub fn is_live_mode(&self) -> bool {
        self.key.starts_with("rzp_live_")
    }

    /// Load settings from a TOML string; missing keys keep their defaults
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
