//! Core types for E-Market.
//!
//! This module provides type-safe wrappers for catalog and cart concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod quantity;

pub use id::*;
pub use price::{Price, PriceError, format_amount, parse_decimal};
pub use product::{CartLineItem, Product};
pub use quantity::QuantityChange;
