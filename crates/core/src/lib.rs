//! Valroux Core - Shared types library.
//!
//! This crate provides common types used across all Valroux components:
//! - `storefront` - Public JSON API (catalog, cart, checkout)
//! - `admin` - Back-office JSON API (orders, products, labels)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere. All order arithmetic (subtotal, shipping, VAT, totals)
//! lives here so both binaries and the tests agree on the numbers.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails,
//!   countries, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
