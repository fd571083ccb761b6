//! Login form (`/auth/login`).

use plantcare_api::{ApiClient, ApiError, SignInRequest};
use plantcare_core::TokenData;
use plantcare_session::SessionStore;

use crate::effect::Effects;
use crate::lifecycle::{Lifecycle, Ticket, ViewState, report_failure};
use crate::pages::first_missing_field;
use crate::route::Route;

const LOGIN_FALLBACK: &str = "Login failed.";
const LOGIN_SUCCESS: &str = "Login successfully!";

/// Login form fields.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl LoginForm {
    /// Checks required fields.
    ///
    /// # Errors
    /// Returns the user-visible message naming the first blank field.
    pub fn validate(&self) -> Result<(), String> {
        match first_missing_field(&[
            ("Email Address", self.email.as_str()),
            ("Password", self.password.as_str()),
        ]) {
            Some(message) => Err(message),
            None => Ok(()),
        }
    }

    fn to_request(&self) -> SignInRequest {
        SignInRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// Controller for the login form.
#[derive(Debug, Clone)]
pub struct LoginPage {
    form: LoginForm,
    state: ViewState<()>,
    lifecycle: Lifecycle,
}

impl LoginPage {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self {
            form: LoginForm::default(),
            state: ViewState::Idle,
            lifecycle: Lifecycle::default(),
        }
    }

    /// Form fields.
    pub fn form(&self) -> &LoginForm {
        &self.form
    }

    /// Mutable form fields.
    pub fn form_mut(&mut self) -> &mut LoginForm {
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

    /// Validates and submits the form.
    pub fn submit(&mut self, api: &ApiClient) -> Effects {
        match self.begin_submit() {
            Ok((ticket, request)) => {
                let result = api.sign_in(&request);
                self.finish_submit(ticket, result, api.session().as_ref())
            }
            Err(effects) => effects,
        }
    }

    /// Local validation and in-flight guard; returns the request to send.
    ///
    /// # Errors
    /// Returns the effects to apply when no request must be sent.
    pub fn begin_submit(&mut self) -> Result<(Ticket, SignInRequest), Effects> {
        if self.lifecycle.in_flight() {
            return Err(Effects::new());
        }

        if let Err(message) = self.form.validate() {
            let mut effects = Effects::new();
            effects.error(message.clone());
            self.state = ViewState::Error(message);
            return Err(effects);
        }

        self.state = ViewState::Loading;
        Ok((self.lifecycle.begin(), self.form.to_request()))
    }

    /// Stores the issued token and moves to the dashboard.
    pub fn finish_submit(
        &mut self,
        ticket: Ticket,
        result: Result<TokenData, ApiError>,
        session: &dyn SessionStore,
    ) -> Effects {
        let mut effects = Effects::new();
        if !self.lifecycle.accept(ticket) {
            return effects;
        }

        match result.map(|data| session.set(&data.token)) {
            Ok(Ok(())) => {
                tracing::info!(stage = "auth", action = "login_success", "session established");
                self.form.password.clear();
                self.state = ViewState::Ready(());
                effects.success(LOGIN_SUCCESS);
                effects.navigate(Route::Home);
            }
            Ok(Err(session_error)) => {
                tracing::error!(stage = "auth", action = "store_token_failed", error = %session_error);
                let message = session_error.to_string();
                effects.error(message.clone());
                self.state = ViewState::Error(message);
            }
            Err(error) => {
                tracing::warn!(stage = "auth", action = "login_failed", class = ?error.class());
                let message = report_failure(&error, session, false, LOGIN_FALLBACK, &mut effects);
                self.state = ViewState::Error(message);
            }
        }

        effects
    }
}

impl Default for LoginPage {
    fn default() -> Self {
        Self::new()
    }
}
