//! Quantity change direction for cart line items.

use serde::{Deserialize, Serialize};

/// Direction of a cart quantity update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityChange {
    /// Add one unit.
    Increase,
    /// Remove one unit; a line at quantity 1 is removed entirely.
    Decrease,
}

impl std::fmt::Display for QuantityChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Increase => write!(f, "increase"),
            Self::Decrease => write!(f, "decrease"),
        }
    }
}

impl std::str::FromStr for QuantityChange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(Self::Increase),
            "decrease" => Ok(Self::Decrease),
            _ => Err(format!("invalid quantity change: {s}")),
        }
    }
}
