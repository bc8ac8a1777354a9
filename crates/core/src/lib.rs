//! BoboParty Core - Shared cart domain types.
//!
//! This crate provides the cart model shared between the BoboParty
//! components:
//! - `storefront` - the server that proxies cart operations to Shopify
//! - `cart-client` - the client-side cart store used by UI widgets
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Every type
//! serializes camelCase, matching both the proxy's JSON contract and the
//! upstream Storefront API shapes, so a cart travels from Shopify to a
//! widget without field renaming on the way.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;

pub use cart::*;
