//! # Cart Types
//!
//! The local mirror of the server-side cart, plus the wire shape of the
//! `/api/cart/items` snapshot it is loaded from.

use crate::error::{CartError, CartResult};
use crate::money::{deserialize_amount, Currency, Price};
use serde::{Deserialize, Deserializer, Serialize};

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Quantities arrive as arbitrary JSON numbers. Negative and null read as
/// zero, fractions are truncated, and anything past `u32::MAX` saturates.
fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();
    // float-to-int `as` saturates and maps NaN to 0
    Ok(raw.trunc() as u32)
}

/// Product identifier, echoed back to the backend exactly as received
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Numeric(i64),
    Text(String),
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductId::Numeric(id) => write!(f, "{}", id),
            ProductId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        ProductId::Numeric(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::Text(id.to_string())
    }
}

/// One line of the cart
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(rename = "price_per_unit", deserialize_with = "deserialize_amount", default)]
    pub unit_price: Price,

    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u32,

    /// Unit price × quantity. Taken from the server on load and recomputed
    /// locally after a confirmed quantity change.
    #[serde(rename = "total_price", deserialize_with = "deserialize_amount", default)]
    pub line_total: Price,
}

impl CartItem {
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Price,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            description: String::new(),
            image_url: None,
            unit_price,
            quantity,
            line_total: unit_price.times(quantity),
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Set a new quantity and recompute the line total
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.line_total = self.unit_price.times(quantity);
    }
}

/// `cart` object of the snapshot
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartBody {
    #[serde(default)]
    pub products: Option<Vec<CartItem>>,

    #[serde(deserialize_with = "deserialize_amount", default)]
    pub overall_total_price: Price,
}

/// Response of `GET /api/cart/items`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartSnapshot {
    #[serde(default)]
    pub cart: Option<CartBody>,

    #[serde(default)]
    pub username: Option<String>,
}

impl CartSnapshot {
    /// Parse a snapshot from a JSON body
    pub fn from_json(body: &str) -> CartResult<Self> {
        serde_json::from_str(body)
            .map_err(|e| CartError::Decode(format!("Failed to parse cart snapshot: {}", e)))
    }
}

/// The cart as shown on the page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub username: String,
    /// Total as last reported by the server
    pub overall_total: Price,
}

impl Cart {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            username: username.into(),
            overall_total: Price::zero(Currency::default()),
        }
    }

    /// Builder: add an item
    pub fn with_item(mut self, item: CartItem) -> Self {
        self.items.push(item);
        self
    }

    /// Build the local cart from a server snapshot, substituting empty values
    /// for anything the server left out
    pub fn from_snapshot(snapshot: CartSnapshot) -> Self {
        let body = snapshot.cart.unwrap_or_default();
        Self {
            items: body.products.unwrap_or_default(),
            username: snapshot.username.unwrap_or_default(),
            overall_total: body.overall_total_price,
        }
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    /// Drop an item by id, returning it if it was present
    pub fn remove(&mut self, product_id: &ProductId) -> Option<CartItem> {
        let pos = self.items.iter().position(|i| &i.product_id == product_id)?;
        Some(self.items.remove(pos))
    }

    /// Patch one item's quantity (and its line total)
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> CartResult<&CartItem> {
        let item = self
            .items
            .iter_mut()
            .find(|i| &i.product_id == product_id)
            .ok_or_else(|| CartError::ItemNotFound {
                product_id: product_id.to_string(),
            })?;
        item.set_quantity(quantity);
        Ok(&*item)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across lines
    pub fn unit_count(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, i| acc.saturating_add(u64::from(i.quantity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "cart": {
            "products": [
                {
                    "product_id": 7,
                    "name": "Desk Lamp",
                    "description": "Warm light",
                    "image_url": "https://img.example/lamp.png",
                    "price_per_unit": 499.5,
                    "quantity": 2,
                    "total_price": "999.00"
                },
                {
                    "product_id": 9,
                    "name": "Notebook",
                    "description": null,
                    "price_per_unit": "45",
                    "quantity": 1,
                    "total_price": 45
                }
            ],
            "overall_total_price": 1044
        },
        "username": "asha"
    }"#;

    #[test]
    fn test_snapshot_parsing() {
        let cart = Cart::from_snapshot(CartSnapshot::from_json(SNAPSHOT).unwrap());

        assert_eq!(cart.username, "asha");
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.overall_total.decimal_string(), "1044.00");

        let lamp = cart.get(&ProductId::Numeric(7)).unwrap();
        assert_eq!(lamp.unit_price.amount, 49950);
        assert_eq!(lamp.line_total.amount, 99900);
        assert_eq!(lamp.image_url.as_deref(), Some("https://img.example/lamp.png"));

        let notebook = cart.get(&ProductId::Numeric(9)).unwrap();
        assert_eq!(notebook.description, "");
        assert!(notebook.image_url.is_none());
        assert_eq!(cart.unit_count(), 3);
    }

    #[test]
    fn test_snapshot_missing_fields_degrade_to_empty() {
        let cart = Cart::from_snapshot(CartSnapshot::from_json("{}").unwrap());
        assert!(cart.is_empty());
        assert_eq!(cart.username, "");
        assert_eq!(cart.overall_total.amount, 0);

        let cart = Cart::from_snapshot(CartSnapshot::from_json(r#"{"cart": {}}"#).unwrap());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_odd_quantities_are_clamped() {
        let snapshot = CartSnapshot::from_json(
            r#"{
                "cart": {
                    "products": [
                        { "product_id": 1, "price_per_unit": 10, "quantity": -2, "total_price": 0 },
                        { "product_id": 2, "price_per_unit": 10, "quantity": 1.5, "total_price": 15 },
                        { "product_id": 3, "price_per_unit": 10, "quantity": null, "total_price": 0 },
                        { "product_id": 4, "price_per_unit": 10, "quantity": 9999999999, "total_price": 0 }
                    ]
                },
                "username": "asha"
            }"#,
        )
        .unwrap();
        let cart = Cart::from_snapshot(snapshot);

        assert_eq!(cart.len(), 4);
        assert_eq!(cart.get(&ProductId::Numeric(1)).unwrap().quantity, 0);
        assert_eq!(cart.get(&ProductId::Numeric(2)).unwrap().quantity, 1);
        assert_eq!(cart.get(&ProductId::Numeric(3)).unwrap().quantity, 0);
        assert_eq!(cart.get(&ProductId::Numeric(4)).unwrap().quantity, u32::MAX);
        // server line totals are kept as sent
        assert_eq!(cart.get(&ProductId::Numeric(2)).unwrap().line_total.amount, 1500);
    }

    #[test]
    fn test_quantity_must_still_be_numeric() {
        let err = CartSnapshot::from_json(
            r#"{"cart": {"products": [{"product_id": 1, "quantity": "two"}]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CartError::Decode(_)));
    }

    #[test]
    fn test_snapshot_garbage_is_decode_error() {
        let err = CartSnapshot::from_json("<html>").unwrap_err();
        assert!(matches!(err, CartError::Decode(_)));
    }

    #[test]
    fn test_product_id_round_trips_shape() {
        assert_eq!(serde_json::to_string(&ProductId::Numeric(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&ProductId::from("sku-3")).unwrap(), "\"sku-3\"");
    }

    #[test]
    fn test_set_quantity_recomputes_line_total() {
        let mut cart = Cart::new("asha")
            .with_item(CartItem::new(ProductId::Numeric(1), "Pen", Price::new(12.25, Currency::INR), 1));

        let item = cart.set_quantity(&ProductId::Numeric(1), 4).unwrap();
        assert_eq!(item.line_total.decimal_string(), "49.00");

        assert!(cart.set_quantity(&ProductId::Numeric(2), 1).is_err());
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::new("asha")
            .with_item(CartItem::new(ProductId::Numeric(1), "Pen", Price::new(10.0, Currency::INR), 1))
            .with_item(CartItem::new(ProductId::Numeric(2), "Ink", Price::new(5.0, Currency::INR), 1));

        assert!(cart.remove(&ProductId::Numeric(1)).is_some());
        assert!(cart.remove(&ProductId::Numeric(1)).is_none());
        assert_eq!(cart.len(), 1);
    }
}
