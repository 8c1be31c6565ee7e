//! # Client Configuration
//!
//! Configuration for talking to the storefront backend and opening the
//! hosted checkout. Values come from environment variables (and a `.env`
//! file when present), with widget display settings optionally read from a
//! TOML file.

use cart_core::{CartError, CheckoutSettings};
use std::env;
use tracing::warn;

/// Default storefront API location
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Storefront client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash
    pub api_base_url: String,

    /// Session cookie to send with every request (`name=value`). Browsers
    /// attach their own cookies and leave this unset.
    pub session_cookie: Option<String>,

    /// Hosted checkout settings
    pub checkout: CheckoutSettings,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Recognised env vars:
    /// - `CART_API_BASE_URL` (default `http://localhost:8080`)
    /// - `CART_SESSION_COOKIE`
    /// - `CHECKOUT_CONFIG`: path to a TOML file with checkout settings
    /// - `RAZORPAY_KEY_ID`, `CHECKOUT_PREFILL_EMAIL`, `CHECKOUT_PREFILL_CONTACT`
    ///   override the matching TOML values
    pub fn from_env() -> Result<Self, CartError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url =
            env::var("CART_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let session_cookie = env::var("CART_SESSION_COOKIE").ok().filter(|c| !c.is_empty());

        let mut checkout = match env::var("CHECKOUT_CONFIG") {
            Ok(path) => {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    CartError::Configuration(format!("Failed to read {}: {}", path, e))
                })?;
                CheckoutSettings::from_toml(&content).map_err(|e| {
                    CartError::Configuration(format!("Failed to parse {}: {}", path, e))
                })?
            }
            Err(_) => CheckoutSettings::default(),
        };

        if let Ok(key) = env::var("RAZORPAY_KEY_ID") {
            checkout.key = key;
        }
        if let Ok(email) = env::var("CHECKOUT_PREFILL_EMAIL") {
            checkout.prefill_email = email;
        }
        if let Ok(contact) = env::var("CHECKOUT_PREFILL_CONTACT") {
            checkout.prefill_contact = contact;
        }

        let config = Self {
            api_base_url,
            session_cookie,
            checkout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            session_cookie: None,
            checkout: CheckoutSettings::default(),
        }
    }

    /// Builder: set the session cookie
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Builder: set checkout settings
    pub fn with_checkout(mut self, checkout: CheckoutSettings) -> Self {
        self.checkout = checkout;
        self
    }

    /// Check base URL and widget key formats
    pub fn validate(&self) -> Result<(), CartError> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(CartError::Configuration(format!(
                "CART_API_BASE_URL must be an http(s) URL, got {:?}",
                self.api_base_url
            )));
        }

        if self.checkout.key.is_empty() {
            warn!("RAZORPAY_KEY_ID not set; checkout widget will be opened without a key");
        } else if !self.checkout.is_test_mode() && !self.checkout.is_live_mode() {
            return Err(CartError::Configuration(
                "RAZORPAY_KEY_ID must start with rzp_test_ or rzp_live_".to_string(),
            ));
        }

        Ok(())
    }

    /// Full URL for an API path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url.trim_end_matches('/'), path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}
