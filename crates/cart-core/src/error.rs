//! # Cart Error Types
//!
//! Typed error handling for the cart page.
//! Every backend call and widget interaction returns `Result<T, CartError>`.

use thiserror::Error;

/// Core error type for cart and checkout operations
#[derive(Debug, Error)]
pub enum CartError {
    /// Configuration errors (missing keys, unreadable config file)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a status the call does not accept
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Item is not in the local cart
    #[error("Item not in cart: {product_id}")]
    ItemNotFound { product_id: String },

    /// Hosted widget could not be opened or answered
    #[error("Widget error: {0}")]
    Widget(String),
}

impl CartError {
    /// Response body when the backend rejected the call with a status
    pub fn response_body(&self) -> Option<&str> {
        match self {
            CartError::Status { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    /// Returns true if the backend was reached and answered
    pub fn is_rejection(&self) -> bool {
        matches!(self, CartError::Status { .. })
    }
}

/// Result type alias for cart operations
pub type CartResult<T> = Result<T, CartError>;
