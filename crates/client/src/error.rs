//! Error taxonomy for calls against the commerce API.
//!
//! Every API method returns `Result<T, ApiError>`. Views never propagate
//! these further: they turn them into inline text or a notification using
//! [`ApiError::user_message`].

use thiserror::Error;

/// Errors that can occur when calling the commerce API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered 401: no valid session cookie.
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("not signed in"))]
    Unauthorized { message: Option<String> },

    /// Any other non-success status.
    #[error("API error: {status}{}", .message.as_ref().map(|m| format!(" - {m}")).unwrap_or_default())]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// The body did not match the expected schema.
    #[error("Malformed response from {endpoint}: {reason}")]
    Malformed {
        endpoint: &'static str,
        reason: String,
    },

    /// The owning view was torn down before the request completed.
    #[error("Request cancelled")]
    Cancelled,

    /// A request path could not be resolved against the base address.
    #[error("Invalid request path: {0}")]
    InvalidPath(#[from] url::ParseError),
}

impl ApiError {
    /// The human-readable `message` the service attached, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message } | Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Server message when present, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// HTTP status when the service responded.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;
