//! Current route and the `refer` round trip through the login page.

use std::fmt;

use url::form_urlencoded;

/// Path views fall back to when no `refer` target is given.
pub const DEFAULT_REFER: &str = "/";

/// Login page path.
pub const LOGIN_PATH: &str = "/login";

/// The route a view is rendered at: path plus raw query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    /// Query string including the leading `?`, or empty.
    search: String,
}

impl Location {
    /// Build a location from a path and a query string. A missing leading
    /// `?` on a non-empty query is added.
    #[must_use]
    pub fn new(path: impl Into<String>, search: impl Into<String>) -> Self {
        let search = search.into();
        let search = if search.is_empty() || search.starts_with('?') {
            search
        } else {
            format!("?{search}")
        };
        Self {
            path: path.into(),
            search,
        }
    }

    /// Split `"/products?page=2"` into path and query.
    #[must_use]
    pub fn parse(target: &str) -> Self {
        match target.split_once('?') {
            Some((path, query)) => Self::new(path, format!("?{query}")),
            None => Self::new(target, ""),
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Value of a query parameter, form-decoded. Keys are decoded before
    /// matching and invalid UTF-8 becomes U+FFFD.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        form_urlencoded::parse(self.search.trim_start_matches('?').as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.path, self.search)
    }
}

/// Where the login page should send the user once they sign in:
/// the `refer` parameter when present and non-empty, otherwise `/`.
#[must_use]
pub fn refer_target(location: &Location) -> String {
    location
        .query_param("refer")
        .filter(|target| !target.is_empty())
        .unwrap_or_else(|| DEFAULT_REFER.to_string())
}

/// `/login?refer=<path+search, percent-encoded>` for the given location.
#[must_use]
pub fn login_redirect(location: &Location) -> String {
    format!(
        "{LOGIN_PATH}?refer={}",
        urlencoding::encode(&location.to_string())
    )
}
