//! Login and registration forms.
//!
//! Each form is a small state machine:
//!
//! ```text
//! Idle --submit--> Submitting --ok--> Succeeded
//!   ^                   |
//!   +----- Failed <-----+  (Failed is idle with an error shown)
//! ```
//!
//! Required-field and email checks run before any request is sent;
//! invalid input goes straight to `Failed` without a network call.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use shopease_core::{Email, EmailError};

use crate::error::ApiError;
use crate::scope::ScopeGuard;
use crate::session::SessionStatus;
use crate::state::Storefront;
use crate::ui::location::LOGIN_PATH;
use crate::ui::{Location, NavigationRequest, Notification, refer_target};

pub const LOGIN_FALLBACK_MESSAGE: &str = "Error logging in";
pub const REGISTER_FALLBACK_MESSAGE: &str = "Error registering user";

/// External "register as a seller" flow linked from the register page.
pub const SELLER_REGISTER_PATH: &str = "/register-seller";
/// Register page path, linked from the login page.
pub const REGISTER_PATH: &str = "/register";

// =============================================================================
// Validation
// =============================================================================

/// Client-side validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

fn require(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(())
}

/// Login form fields.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl LoginForm {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Check required fields and email shape.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<Email, FormError> {
        require(&self.email, "Email")?;
        require(self.password.expose_secret(), "Password")?;
        Ok(Email::parse(&self.email)?)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.email.is_empty() && self.password.expose_secret().is_empty()
    }
}

/// Registration form fields.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub phone: String,
}

/// Validated registration fields.
#[derive(Debug)]
pub struct ValidRegistration<'a> {
    pub name: &'a str,
    pub email: Email,
    pub phone: &'a str,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self::new("", "", "", "")
    }
}

impl RegisterForm {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: SecretString::from(password.into()),
            phone: phone.into(),
        }
    }

    /// Check required fields and email shape. The phone is free text.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in field order.
    pub fn validate(&self) -> Result<ValidRegistration<'_>, FormError> {
        require(&self.name, "Name")?;
        require(&self.email, "Email")?;
        require(self.password.expose_secret(), "Password")?;
        require(&self.phone, "Phone")?;
        Ok(ValidRegistration {
            name: self.name.trim(),
            email: Email::parse(&self.email)?,
            phone: self.phone.trim(),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.email.is_empty()
            && self.password.expose_secret().is_empty()
            && self.phone.is_empty()
    }
}

// =============================================================================
// Form State
// =============================================================================

/// Submission state of a form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Submitting,
    /// Server confirmation text.
    Succeeded(String),
    /// Editable again, with this error shown.
    Failed(String),
}

impl FormState {
    /// Whether the form accepts input (idle, with or without an error).
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed(_))
    }

    /// Message to display under the form, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Succeeded(message) | Self::Failed(message) => Some(message),
            Self::Idle | Self::Submitting => None,
        }
    }
}

// =============================================================================
// Login View
// =============================================================================

/// The `/login` page.
#[derive(Debug)]
pub struct LoginView {
    storefront: Storefront,
    guard: ScopeGuard,
    location: Location,
    pub form: LoginForm,
    state: FormState,
}

impl LoginView {
    /// `location` is the login page's own route; its `refer` parameter is
    /// where a successful login leads.
    #[must_use]
    pub fn new(storefront: &Storefront, location: Location) -> Self {
        Self {
            storefront: storefront.clone(),
            guard: storefront.view_scope(),
            location,
            form: LoginForm::default(),
            state: FormState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &FormState {
        &self.state
    }

    /// Where a successful login navigates to.
    #[must_use]
    pub fn refer(&self) -> String {
        refer_target(&self.location)
    }

    /// Link to the register page.
    #[must_use]
    pub const fn register_link() -> &'static str {
        REGISTER_PATH
    }

    /// Submit the form.
    ///
    /// On success the form is cleared, the session is marked signed in, the
    /// cart is re-fetched for the new session and a replacing navigation to
    /// the `refer` target is requested after the redirect delay.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> &FormState {
        let email = match self.form.validate() {
            Ok(email) => email,
            Err(err) => {
                debug!(error = %err, "Login form rejected");
                self.state = FormState::Failed(err.to_string());
                return &self.state;
            }
        };

        self.state = FormState::Submitting;
        let api = self.storefront.api();
        let result = self
            .guard
            .scope()
            .run(api.login(email.as_str(), self.form.password.expose_secret()))
            .await;

        self.state = match result {
            Ok(message) => {
                self.storefront.notify(Notification::success(message.clone()));
                self.form.clear();
                self.storefront.session().set(SessionStatus::Authenticated);
                // The cached cart belongs to the previous credentials.
                self.storefront.cart().sync(self.guard.scope()).await;
                self.storefront.navigate_to(
                    NavigationRequest::push(self.refer())
                        .replacing()
                        .after(self.storefront.config().redirect_delay),
                );
                FormState::Succeeded(message)
            }
            Err(ApiError::Cancelled) => FormState::Idle,
            Err(err) => {
                warn!(error = %err, "Login failed");
                let message = err.user_message(LOGIN_FALLBACK_MESSAGE);
                self.storefront.notify(Notification::error(message.clone()));
                FormState::Failed(message)
            }
        };
        &self.state
    }
}

// =============================================================================
// Register View
// =============================================================================

/// The `/register` page.
#[derive(Debug)]
pub struct RegisterView {
    storefront: Storefront,
    guard: ScopeGuard,
    pub form: RegisterForm,
    state: FormState,
}

impl RegisterView {
    #[must_use]
    pub fn new(storefront: &Storefront) -> Self {
        Self {
            storefront: storefront.clone(),
            guard: storefront.view_scope(),
            form: RegisterForm::default(),
            state: FormState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &FormState {
        &self.state
    }

    /// Links offered below the form: sign in, and register as a seller.
    #[must_use]
    pub const fn links() -> [(&'static str, &'static str); 2] {
        [
            ("Login", LOGIN_PATH),
            ("Register as Seller", SELLER_REGISTER_PATH),
        ]
    }

    /// Submit the form. On success the form is cleared; no navigation.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> &FormState {
        let valid = match self.form.validate() {
            Ok(valid) => valid,
            Err(err) => {
                debug!(error = %err, "Registration form rejected");
                self.state = FormState::Failed(err.to_string());
                return &self.state;
            }
        };

        self.state = FormState::Submitting;
        let api = self.storefront.api();
        let request = api.register(
            valid.name,
            valid.email.as_str(),
            self.form.password.expose_secret(),
            valid.phone,
        );
        let result = self.guard.scope().run(request).await;

        self.state = match result {
            Ok(message) => {
                self.storefront.notify(Notification::success(message.clone()));
                self.form.clear();
                FormState::Succeeded(message)
            }
            Err(ApiError::Cancelled) => FormState::Idle,
            Err(err) => {
                warn!(error = %err, "Registration failed");
                let message = err.user_message(REGISTER_FALLBACK_MESSAGE);
                self.storefront.notify(Notification::error(message.clone()));
                FormState::Failed(message)
            }
        };
        &self.state
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::ui::Recorder;

    fn storefront(recorder: &Recorder) -> Storefront {
        let config = ClientConfig::with_base_url("http://127.0.0.1:9/api/v1/").unwrap();
        Storefront::with_recorder(config, recorder).unwrap()
    }

    #[test]
    fn test_login_form_requires_fields() {
        let form = LoginForm::new("", "secret");
        assert_eq!(
            form.validate().unwrap_err(),
            FormError::MissingField("Email")
        );

        let form = LoginForm::new("a@b.com", "");
        assert_eq!(
            form.validate().unwrap_err(),
            FormError::MissingField("Password")
        );

        let form = LoginForm::new("not-an-email", "secret");
        assert!(matches!(
            form.validate().unwrap_err(),
            FormError::InvalidEmail(_)
        ));
    }

    #[test]
    fn test_password_redacted_in_debug() {
        let form = LoginForm::new("a@b.com", "hunter2");
        let debug = format!("{form:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("a@b.com"));
    }

    #[test]
    fn test_register_form_phone_is_free_text() {
        for phone in ["12345", "555-1234 ext 2", "+1 (555) 010-9999"] {
            let form = RegisterForm::new("Ada", "ada@example.com", "pw", format!(" {phone} "));
            let valid = form.validate().unwrap();
            assert_eq!(valid.phone, phone);
        }

        let form = RegisterForm::new("Ada", "ada@example.com", "pw", "   ");
        assert_eq!(
            form.validate().unwrap_err(),
            FormError::MissingField("Phone")
        );
    }

    #[test]
    fn test_clear_resets_fields() {
        let mut form = RegisterForm::new("Ada", "ada@example.com", "pw", "5550109999");
        form.clear();
        assert!(form.is_blank());
    }

    #[test]
    fn test_form_state_idle_includes_failed() {
        assert!(FormState::Idle.is_idle());
        assert!(FormState::Failed("x".to_string()).is_idle());
        assert!(!FormState::Submitting.is_idle());
        assert!(!FormState::Succeeded("ok".to_string()).is_idle());
        assert_eq!(FormState::Failed("x".to_string()).message(), Some("x"));
    }

    #[test]
    fn test_login_refer_defaults_to_root() {
        let recorder = Recorder::new();
        let view = LoginView::new(&storefront(&recorder), Location::parse("/login"));
        assert_eq!(view.refer(), "/");

        let view = LoginView::new(
            &storefront(&recorder),
            Location::parse("/login?refer=%2Fproducts%3Fpage%3D2"),
        );
        assert_eq!(view.refer(), "/products?page=2");
    }

    #[tokio::test]
    async fn test_invalid_login_sends_nothing() {
        let recorder = Recorder::new();
        let mut view = LoginView::new(&storefront(&recorder), Location::parse("/login"));
        view.form = LoginForm::new("", "pw");
        let state = view.submit().await.clone();
        assert_eq!(state, FormState::Failed("Email is required".to_string()));
        assert!(recorder.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_login_transport_failure_uses_fallback() {
        let recorder = Recorder::new();
        let mut view = LoginView::new(&storefront(&recorder), Location::parse("/login"));
        view.form = LoginForm::new("a@b.com", "pw");
        let state = view.submit().await.clone();
        assert_eq!(state, FormState::Failed(LOGIN_FALLBACK_MESSAGE.to_string()));
        assert!(recorder.navigations().is_empty());
        assert!(!view.form.is_blank());
    }

    #[test]
    fn test_register_links() {
        let links = RegisterView::links();
        assert_eq!(links[0].1, "/login");
        assert_eq!(links[1].1, "/register-seller");
    }
}
