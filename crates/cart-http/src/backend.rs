//! # Storefront Backend Client
//!
//! `reqwest` implementation of [`CartBackend`]. Every request carries the
//! session credentials: a cookie jar (plus an optional configured cookie)
//! natively, `credentials: include` in the browser.

use crate::config::ClientConfig;
use async_trait::async_trait;
use cart_core::{
    CartBackend, CartError, CartResult, CartSnapshot, CheckoutRequest, OrderToken, ProductId,
    VerificationPayload,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use tracing::{debug, error, instrument};

pub const CART_ITEMS_PATH: &str = "/api/cart/items";
pub const CART_DELETE_PATH: &str = "/api/cart/delete";
pub const CART_UPDATE_PATH: &str = "/api/cart/update";
pub const PAYMENT_CREATE_PATH: &str = "/api/payment/create";
pub const PAYMENT_VERIFY_PATH: &str = "/api/payment/verify";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveItemBody<'a> {
    username: &'a str,
    product_id: &'a ProductId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateQuantityBody<'a> {
    username: &'a str,
    product_id: &'a ProductId,
    quantity: u32,
}

/// HTTP client for the storefront cart and payment endpoints
pub struct HttpCartBackend {
    config: ClientConfig,
    client: Client,
}

impl HttpCartBackend {
    /// Create a new backend client
    pub fn new(config: ClientConfig) -> CartResult<Self> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.cookie_store(true);

        let client = builder
            .build()
            .map_err(|e| CartError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CartResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Attach session credentials to a request
    fn authenticated(&self, request: RequestBuilder) -> RequestBuilder {
        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        match &self.config.session_cookie {
            Some(cookie) => request.header(reqwest::header::COOKIE, cookie),
            None => request,
        }
    }

    /// Send a request and read the whole body as text
    async fn send(&self, request: RequestBuilder) -> CartResult<(StatusCode, String)> {
        let response = self
            .authenticated(request)
            .send()
            .await
            .map_err(|e| CartError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CartError::Network(e.to_string()))?;

        debug!("Backend responded: status={}, {} bytes", status, body.len());
        Ok((status, body))
    }

    fn reject(call: &str, status: StatusCode, body: String) -> CartError {
        error!("Backend rejected {}: status={}, body={}", call, status, body);
        CartError::Status {
            status: status.as_u16(),
            body,
        }
    }
}

#[async_trait(?Send)]
impl CartBackend for HttpCartBackend {
    #[instrument(skip(self))]
    async fn fetch_cart(&self) -> CartResult<CartSnapshot> {
        let url = self.config.endpoint(CART_ITEMS_PATH);
        let (status, body) = self.send(self.client.get(&url)).await?;

        if !status.is_success() {
            return Err(Self::reject("cart fetch", status, body));
        }

        CartSnapshot::from_json(&body)
    }

    #[instrument(skip(self, username, product_id), fields(product_id = %product_id))]
    async fn remove_item(&self, username: &str, product_id: &ProductId) -> CartResult<()> {
        let url = self.config.endpoint(CART_DELETE_PATH);
        let request = self.client.delete(&url).json(&RemoveItemBody {
            username,
            product_id,
        });
        let (status, body) = self.send(request).await?;

        if status != StatusCode::NO_CONTENT {
            return Err(Self::reject("item removal", status, body));
        }

        Ok(())
    }

    #[instrument(skip(self, username, product_id), fields(product_id = %product_id))]
    async fn update_quantity(
        &self,
        username: &str,
        product_id: &ProductId,
        quantity: u32,
    ) -> CartResult<()> {
        let url = self.config.endpoint(CART_UPDATE_PATH);
        let request = self.client.put(&url).json(&UpdateQuantityBody {
            username,
            product_id,
            quantity,
        });
        let (status, body) = self.send(request).await?;

        if !status.is_success() {
            return Err(Self::reject("quantity update", status, body));
        }

        Ok(())
    }

    #[instrument(skip(self, request), fields(items = request.cart_items.len()))]
    async fn create_payment_order(&self, request: &CheckoutRequest) -> CartResult<OrderToken> {
        let url = self.config.endpoint(PAYMENT_CREATE_PATH);
        let (status, body) = self.send(self.client.post(&url).json(request)).await?;

        if !status.is_success() {
            return Err(Self::reject("payment order creation", status, body));
        }

        Ok(OrderToken(body))
    }

    #[instrument(skip(self, payload), fields(order_id = %payload.razorpay_order_id))]
    async fn verify_payment(&self, payload: &VerificationPayload) -> CartResult<String> {
        let url = self.config.endpoint(PAYMENT_VERIFY_PATH);
        let (status, body) = self.send(self.client.post(&url).json(payload)).await?;

        if !status.is_success() {
            return Err(Self::reject("payment verification", status, body));
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mutation_bodies() {
        let id = ProductId::Numeric(4);
        assert_eq!(
            serde_json::to_value(RemoveItemBody {
                username: "asha",
                product_id: &id
            })
            .unwrap(),
            json!({ "username": "asha", "productId": 4 })
        );
        assert_eq!(
            serde_json::to_value(UpdateQuantityBody {
                username: "asha",
                product_id: &id,
                quantity: 3
            })
            .unwrap(),
            json!({ "username": "asha", "productId": 4, "quantity": 3 })
        );
    }

    #[test]
    fn test_client_builds() {
        let backend = HttpCartBackend::new(ClientConfig::default()).unwrap();
        assert_eq!(backend.config().api_base_url, "http://localhost:8080");
    }
}
