//! Core types for Dessert Cart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::*;
pub use price::{CurrencyCode, Price, format_currency};
pub use product::{Product, ProductImages};
