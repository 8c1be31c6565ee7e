//! # cart-http
//!
//! HTTP plumbing for the storefront cart page.
//!
//! This crate provides:
//!
//! 1. **HttpCartBackend** - `reqwest` client for the cart and payment endpoints
//!    - `GET /api/cart/items`, `DELETE /api/cart/delete`, `PUT /api/cart/update`
//!    - `POST /api/payment/create`, `POST /api/payment/verify`
//!    - Session credentials on every request
//!
//! 2. **ClientConfig** - backend URL, session cookie and checkout settings
//!    loaded from the environment
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cart_core::CartPage;
//! use cart_http::HttpCartBackend;
//!
//! let backend = HttpCartBackend::from_env()?;
//! let mut page = CartPage::new(backend);
//! page.load().await;
//! ```

pub mod backend;
pub mod config;

// Re-exports
pub use backend::HttpCartBackend;
pub use config::{ClientConfig, DEFAULT_API_BASE_URL};
