//! Price representation that preserves the catalog's decimal text.
//!
//! The catalog sends prices as decimal strings (`"20"`, `"749.00"`), and some
//! records carry plain JSON numbers instead. Both deserialize into [`Price`];
//! serialization always emits the string form so snapshots round-trip the
//! original text unchanged.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when interpreting a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The text is not a decimal number.
    #[error("invalid price: {0:?}")]
    Invalid(String),
}

/// A decimal-as-string price.
///
/// ## Examples
///
/// ```
/// use emarket_core::Price;
///
/// let price = Price::new("19.5");
/// assert_eq!(price.as_str(), "19.5");
/// assert_eq!(price.display(), "$19.50");
/// assert!(Price::new("abc").to_decimal().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(String);

impl Price {
    /// Wrap price text exactly as received.
    #[must_use]
    pub fn new(amount: impl Into<String>) -> Self {
        Self(amount.into())
    }

    /// Returns the original price text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the price as an exact decimal.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Invalid`] if the text is not a decimal number.
    pub fn to_decimal(&self) -> Result<Decimal, PriceError> {
        parse_decimal(&self.0)
    }

    /// Parse the price as a float for display-grade arithmetic.
    ///
    /// Returns `None` for non-numeric or non-finite text.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        self.0
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite())
    }

    /// Format for display (e.g., "$19.99"), falling back to the raw text.
    #[must_use]
    pub fn display(&self) -> String {
        self.to_f64()
            .map_or_else(|| format!("${}", self.0), format_amount)
    }
}

/// Format an amount rounded to two decimal places (e.g., "$40.00").
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Parse user or catalog text as an exact decimal.
///
/// # Errors
///
/// Returns [`PriceError::Invalid`] if the trimmed text is not a decimal
/// number.
pub fn parse_decimal(text: &str) -> Result<Decimal, PriceError> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| PriceError::Invalid(text.to_owned()))
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Price {
    fn from(amount: &str) -> Self {
        Self(amount.to_owned())
    }
}

impl From<String> for Price {
    fn from(amount: String) -> Self {
        Self(amount)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPrice {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawPrice::deserialize(deserializer)? {
            RawPrice::Text(text) => Self(text),
            RawPrice::Number(number) => Self(number.to_string()),
        })
    }
}
