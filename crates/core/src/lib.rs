//! Dessert Cart Core - catalog and cart state.
//!
//! This crate provides the domain model used by the storefront:
//! - [`types`] - Newtype ids, products, prices and currency formatting
//! - [`catalog`] - The ordered, read-only product catalog
//! - [`cart`] - The cart and the [`CartStore`] that owns it
//!
//! # Architecture
//!
//! The core crate contains only types and state transitions - no I/O, no
//! HTTP, no rendering. Views subscribe to a [`CartStore`] and re-read the
//! cart whenever it changes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod types;

pub use cart::{
    Cart, CartAction, CartChange, CartEntry, CartError, CartLine, CartStore, Observer,
    UnknownAction,
};
pub use catalog::Catalog;
pub use types::*;
