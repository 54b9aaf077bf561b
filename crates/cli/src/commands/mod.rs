//! Subcommand implementations.

pub mod account;
pub mod catalog;
pub mod pages;
pub mod terminal;

use thiserror::Error;

/// Failures reported by commands after the storefront already notified the
/// user.
#[derive(Debug, Error)]
pub enum CommandError {
    /// `login` and `register` need `--email` and `--password`.
    #[error("--email and --password (or SHOPEASE_PASSWORD) are required")]
    MissingCredentials,

    /// A form submission did not succeed.
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Api(#[from] shopease_client::ApiError),
}
