//! ShopEase Core - Shared domain types.
//!
//! This crate provides the types exchanged with the remote commerce API and
//! shared by every ShopEase component:
//! - `client` - API adapter, session/cart synchronisation and view state
//! - `cli` - Terminal front end
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. Products, carts and wishlists are owned by the remote service;
//! these types are read-only snapshots of what it returned.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, contact fields, products, carts, wishlists

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
