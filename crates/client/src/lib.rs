//! ShopEase storefront client library.
//!
//! Headless client for the ShopEase commerce API. It owns no rendering: each
//! view exposes its state and reports notifications and navigation through
//! the [`ui`] seams, so a terminal, TUI or web front end can draw it.
//!
//! # Modules
//!
//! - [`api`] - HTTP adapter with typed, validated responses
//! - [`state`] - [`Storefront`] context shared by every view
//! - [`session`] - Session probe
//! - [`cart`] - Shared cart store
//! - [`wishlist`] - Wishlist toggle
//! - [`catalog`] - Product list, product detail and featured products
//! - [`auth`] - Login and registration forms
//! - [`header`] - Navigation links and logout
//! - [`content`] - Static home, about and footer copy
//! - [`scope`] - View lifecycle cancellation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod content;
pub mod error;
pub mod header;
pub mod scope;
pub mod session;
pub mod state;
pub mod ui;
pub mod wishlist;

pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use state::Storefront;
