//! # Totals
//!
//! Order-summary figures derived from the current item list. Always computed
//! from the items at hand, never stored.

use crate::cart::CartItem;
use crate::money::{Currency, Price};

/// Flat shipping charge (5.00 × 74)
pub const SHIPPING: Price = Price {
    amount: 37_000,
    currency: Currency::INR,
};

/// Figures shown in the order summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Sum of line totals
    pub subtotal: Price,
    pub shipping: Price,
    /// Subtotal plus shipping
    pub grand_total: Price,
    /// Number of lines
    pub item_count: usize,
    /// Sum of quantities
    pub unit_count: u64,
}

impl Totals {
    /// Derive totals from an item list
    pub fn of(items: &[CartItem]) -> Self {
        let subtotal = items
            .iter()
            .map(|i| i.line_total)
            .fold(Price::zero(SHIPPING.currency), |acc, p| acc.plus(&p));

        Self {
            subtotal,
            shipping: SHIPPING,
            grand_total: subtotal.plus(&SHIPPING),
            item_count: items.len(),
            unit_count: items
                .iter()
                .fold(0u64, |acc, i| acc.saturating_add(u64::from(i.quantity))),
        }
    }
}
