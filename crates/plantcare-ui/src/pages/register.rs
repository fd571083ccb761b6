//! Registration form (`/auth/register`).

use plantcare_api::{ApiClient, ApiError, SignUpRequest};
use plantcare_session::SessionStore;

use crate::effect::Effects;
use crate::lifecycle::{Lifecycle, Ticket, ViewState, report_failure};
use crate::pages::first_missing_field;
use crate::route::Route;

const REGISTER_FALLBACK: &str = "Registration failed.";
const REGISTER_SUCCESS: &str = "Registration successfully!";

/// Registration form fields.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    /// Desired display name.
    pub username: String,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl std::fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl RegisterForm {
    /// Checks required fields.
    ///
    /// # Errors
    /// Returns the user-visible message naming the first blank field.
    pub fn validate(&self) -> Result<(), String> {
        match first_missing_field(&[
            ("Username", self.username.as_str()),
            ("Email Address", self.email.as_str()),
            ("Password", self.password.as_str()),
        ]) {
            Some(message) => Err(message),
            None => Ok(()),
        }
    }

    fn to_request(&self) -> SignUpRequest {
        SignUpRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// Controller for the registration form.
#[derive(Debug, Clone)]
pub struct RegisterPage {
    form: RegisterForm,
    state: ViewState<()>,
    lifecycle: Lifecycle,
}

impl RegisterPage {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self {
            form: RegisterForm::default(),
            state: ViewState::Idle,
            lifecycle: Lifecycle::default(),
        }
    }

    /// Form fields.
    pub fn form(&self) -> &RegisterForm {
        &self.form
    }

    /// Mutable form fields.
    pub fn form_mut(&mut self) -> &mut RegisterForm {
        &mut self.form
    }

    /// Submit state.
    pub fn state(&self) -> &ViewState<()> {
        &self.state
    }

    /// Returns `true` while the submit control is disabled.
    pub fn is_submitting(&self) -> bool {
        self.lifecycle.in_flight()
    }

    /// Validates and submits the form. Signup does not issue a token; success
    /// moves to the login form.
    pub fn submit(&mut self, api: &ApiClient) -> Effects {
        if self.lifecycle.in_flight() {
            return Effects::new();
        }

        let mut effects = Effects::new();
        if let Err(message) = self.form.validate() {
            effects.error(message.clone());
            self.state = ViewState::Error(message);
            return effects;
        }

        let ticket = self.lifecycle.begin();
        self.state = ViewState::Loading;
        let result = api.sign_up(&self.form.to_request());
        self.finish_submit(ticket, result, api.session().as_ref())
    }

    /// Applies the signup outcome.
    pub fn finish_submit(
        &mut self,
        ticket: Ticket,
        result: Result<(), ApiError>,
        session: &dyn SessionStore,
    ) -> Effects {
        let mut effects = Effects::new();
        if !self.lifecycle.accept(ticket) {
            return effects;
        }

        match result {
            Ok(()) => {
                tracing::info!(stage = "auth", action = "register_success");
                self.form.password.clear();
                self.state = ViewState::Ready(());
                effects.success(REGISTER_SUCCESS);
                effects.navigate(Route::Login);
            }
            Err(error) => {
                let message =
                    report_failure(&error, session, false, REGISTER_FALLBACK, &mut effects);
                self.state = ViewState::Error(message);
            }
        }

        effects
    }
}

impl Default for RegisterPage {
    fn default() -> Self {
        Self::new()
    }
}
