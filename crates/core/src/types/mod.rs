//! Core types for ShopEase.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod contact;
pub mod id;
pub mod price;
pub mod product;
pub mod wishlist;

pub use cart::{Cart, CartItem, ProductRef};
pub use contact::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use product::Product;
pub use wishlist::Wishlist;
