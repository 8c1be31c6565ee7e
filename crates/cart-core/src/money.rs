//! # Money Types
//!
//! Currency and price types for the cart page.
//! Amounts are held in the smallest currency unit so line totals and
//! subtotals stay exact; the backend sends decimals (numbers or strings).

use crate::error::{CartError, CartResult};
use serde::{Deserialize, Deserializer, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
    JPY,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
        }
    }

    /// Look up a currency by its ISO code, ignoring case
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "INR" => Some(Currency::INR),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }

    /// Number of decimal places for this currency
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "₹",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
        }
    }

    fn scale(&self) -> i64 {
        10_i64.pow(self.decimal_places() as u32)
    }

    /// Convert a decimal amount to the smallest currency unit, rounding
    /// half away from zero.
    pub fn to_smallest_unit(&self, amount: f64) -> i64 {
        (amount * self.scale() as f64).round() as i64
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (paise for INR)
    pub amount: i64,
    pub currency: Currency,
}

impl Price {
    /// Create a price from a decimal amount
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self {
            amount: currency.to_smallest_unit(amount),
            currency,
        }
    }

    /// Create a price from smallest unit
    pub fn from_minor(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::from_minor(0, currency)
    }

    /// Parse a decimal string such as `"129.5"` or `"  42 "`
    pub fn parse(text: &str, currency: Currency) -> CartResult<Self> {
        let value: f64 = text
            .trim()
            .parse()
            .map_err(|_| CartError::Decode(format!("not a decimal amount: {:?}", text)))?;
        if !value.is_finite() {
            return Err(CartError::Decode(format!("not a finite amount: {:?}", text)));
        }
        Ok(Self::new(value, currency))
    }

    /// Multiply by a quantity, saturating at the `i64` bounds
    pub fn times(&self, quantity: u32) -> Self {
        Self::from_minor(self.amount.saturating_mul(i64::from(quantity)), self.currency)
    }

    /// Add two prices of the same currency, saturating at the `i64` bounds
    pub fn plus(&self, other: &Price) -> Self {
        debug_assert_eq!(self.currency, other.currency);
        Self::from_minor(self.amount.saturating_add(other.amount), self.currency)
    }

    /// Plain decimal rendering with the currency's precision, e.g. `"370.00"`
    pub fn decimal_string(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        if places == 0 {
            return self.amount.to_string();
        }
        let scale = self.currency.scale();
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        format!(
            "{}{}.{:0width$}",
            sign,
            abs / scale as u64,
            abs % scale as u64,
            width = places
        )
    }

    /// Format for display (e.g., "₹370.00")
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.decimal_string())
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Self {
        iter.fold(Price::zero(Currency::default()), |acc, p| {
            Price::from_minor(acc.amount.saturating_add(p.amount), p.currency)
        })
    }
}

/// Amount as the backend sends it: a JSON number or a numeric string
#[derive(Deserialize)]
#[serde(untagged)]
enum WireAmount {
    Number(f64),
    Text(String),
}

/// Deserialize a backend decimal (number, numeric string or null) into a
/// storefront-currency `Price`. Null and missing values read as zero.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Price, D::Error>
where
    D: Deserializer<'de>,
{
    let currency = Currency::default();
    match Option::<WireAmount>::deserialize(deserializer)? {
        None => Ok(Price::zero(currency)),
        Some(WireAmount::Number(n)) => Ok(Price::new(n, currency)),
        Some(WireAmount::Text(s)) => Price::parse(&s, currency).map_err(serde::de::Error::custom),
    }
}

/// Serialize a `Price` as the decimal string the backend expects
pub fn serialize_decimal<S>(price: &Price, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&price.decimal_string())
}
