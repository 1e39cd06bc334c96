//! E-Market Core - Shared types library.
//!
//! This crate provides the types shared by every E-Market component:
//! - `storefront` - Cart, favorites and catalog state over key-value storage
//! - `cli` - Command-line client driving the storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product records, cart line items, prices and IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
