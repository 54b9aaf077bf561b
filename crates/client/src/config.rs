//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `SHOPEASE_API_BASE_URL` - Commerce API base address
//!   (default: `https://shopease-server-709b.onrender.com/api/v1/`)
//! - `SHOPEASE_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `SHOPEASE_REDIRECT_DELAY_MS` - Delay before post-login and
//!   login-required redirects (default: 1500)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Production API address.
pub const DEFAULT_API_BASE_URL: &str = "https://shopease-server-709b.onrender.com/api/v1/";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REDIRECT_DELAY_MS: u64 = 1500;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base address every endpoint path is joined onto (always ends in `/`)
    pub api_base_url: Url,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Delay applied to navigation after login and on login-required redirects
    pub redirect_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ClientConfig {
    /// Defaults for everything except the API address.
    fn for_base_url(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url =
            parse_base_url(&get_env_or_default("SHOPEASE_API_BASE_URL", DEFAULT_API_BASE_URL))
                .map_err(|e| ConfigError::InvalidEnvVar("SHOPEASE_API_BASE_URL".to_string(), e))?;

        let request_timeout = Duration::from_secs(parse_u64(
            "SHOPEASE_TIMEOUT_SECS",
            &get_env_or_default("SHOPEASE_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string()),
        )?);

        let redirect_delay = Duration::from_millis(parse_u64(
            "SHOPEASE_REDIRECT_DELAY_MS",
            &get_env_or_default(
                "SHOPEASE_REDIRECT_DELAY_MS",
                &DEFAULT_REDIRECT_DELAY_MS.to_string(),
            ),
        )?);

        Ok(Self {
            api_base_url,
            request_timeout,
            redirect_delay,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration pointing at a different API address, other values default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not an http(s) URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let api_base_url = parse_base_url(base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPEASE_API_BASE_URL".to_string(), e))?;
        Ok(Self::for_base_url(api_base_url))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an API base address, forcing a trailing slash so that relative
/// endpoint paths (`user/profile`) resolve beneath it instead of replacing
/// its last segment.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };

    let url = Url::parse(&with_slash).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{other}'")),
    }
    if url.host_str().is_none() {
        return Err("URL must have a host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("URL must not carry a query or fragment".to_string());
    }
    Ok(url)
}
