//! Fetch lifecycle shared by every page: auth gate, load, settle.

use plantcare_api::{ApiError, MISSING_TOKEN_MESSAGE};
use plantcare_session::SessionStore;

use crate::effect::Effects;
use crate::route::Route;

/// Render state of one page.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    /// Nothing triggered yet.
    Idle,
    /// Request in flight.
    Loading,
    /// Data available.
    Ready(T),
    /// Request succeeded with nothing to show.
    Empty,
    /// Request failed with this user-visible message.
    Error(String),
}

impl<T> ViewState<T> {
    /// Returns `true` while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// Returns the ready value, if any.
    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the error message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Identifies one started load; only the newest ticket may settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Hands out tickets and remembers which one is still current.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    generation: u64,
    active: Option<u64>,
}

impl Lifecycle {
    /// Starts a new load, superseding any earlier ticket.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.active = Some(self.generation);
        Ticket(self.generation)
    }

    /// Consumes `ticket` if it is current. A ticket is accepted at most once.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if self.active == Some(ticket.0) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Invalidates the outstanding ticket, if any.
    pub fn invalidate(&mut self) {
        self.active = None;
    }

    /// Returns `true` while a ticket is outstanding.
    pub fn in_flight(&self) -> bool {
        self.active.is_some()
    }
}

/// Turns an API failure into a notification and, for authenticated calls
/// denied by the server, clears the session and redirects to login.
///
/// Returns the message shown to the user.
pub fn report_failure(
    error: &ApiError,
    session: &dyn SessionStore,
    authenticated: bool,
    fallback: &str,
    effects: &mut Effects,
) -> String {
    let reauth = authenticated && error.requires_reauth();
    let message = if authenticated || !error.requires_reauth() {
        error.user_message(fallback)
    } else {
        // Unauthenticated calls (login, signup) answer bad credentials with 401.
        error.server_message().unwrap_or(fallback).to_string()
    };

    effects.error(message.clone());

    if reauth {
        if let Err(clear_error) = session.clear() {
            tracing::error!(stage = "session", action = "clear_failed", error = %clear_error);
        }
        tracing::warn!(stage = "session", action = "invalidated", class = ?error.class(), "redirecting to login");
        effects.navigate(Route::Login);
    }

    message
}

/// Effects for a protected page mounted without a token.
pub fn missing_session_effects() -> Effects {
    let mut effects = Effects::new();
    effects.error(MISSING_TOKEN_MESSAGE);
    effects.navigate(Route::Login);
    effects
}

/// Generic fetch-on-mount controller state.
#[derive(Debug, Clone)]
pub struct FetchPage<T> {
    state: ViewState<T>,
    lifecycle: Lifecycle,
    requires_auth: bool,
    fallback: &'static str,
}

impl<T> FetchPage<T> {
    /// Creates an idle page. `fallback` is shown for client failures without
    /// a server message.
    pub fn new(requires_auth: bool, fallback: &'static str) -> Self {
        Self {
            state: ViewState::Idle,
            lifecycle: Lifecycle::default(),
            requires_auth,
            fallback,
        }
    }

    /// Current render state.
    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// Starts a load. Without a token on a protected page, returns the
    /// redirect effects instead and performs no request.
    ///
    /// # Errors
    /// Returns the effects to apply when the load must not start.
    pub fn begin(&mut self, session: &dyn SessionStore) -> Result<Ticket, Effects> {
        if self.requires_auth && !session.has_token() {
            self.lifecycle.invalidate();
            self.state = ViewState::Error(MISSING_TOKEN_MESSAGE.to_string());
            tracing::info!(stage = "page", action = "auth_gate", "no token; redirecting without request");
            return Err(missing_session_effects());
        }

        self.state = ViewState::Loading;
        Ok(self.lifecycle.begin())
    }

    /// Applies the outcome of the load started with `ticket`.
    ///
    /// Outcomes for superseded or unmounted loads are discarded silently.
    pub fn settle(
        &mut self,
        ticket: Ticket,
        result: Result<T, ApiError>,
        session: &dyn SessionStore,
        is_empty: impl FnOnce(&T) -> bool,
    ) -> Effects {
        if !self.lifecycle.accept(ticket) {
            tracing::debug!(stage = "page", action = "discard", "stale result dropped");
            return Effects::new();
        }

        let mut effects = Effects::new();
        self.state = match result {
            Ok(value) => {
                if is_empty(&value) {
                    ViewState::Empty
                } else {
                    ViewState::Ready(value)
                }
            }
            Err(error) => ViewState::Error(report_failure(
                &error,
                session,
                self.requires_auth,
                self.fallback,
                &mut effects,
            )),
        };
        effects
    }

    /// Runs a complete load: gate, fetch, settle.
    pub fn load(
        &mut self,
        session: &dyn SessionStore,
        fetch: impl FnOnce() -> Result<T, ApiError>,
        is_empty: impl FnOnce(&T) -> bool,
    ) -> Effects {
        match self.begin(session) {
            Ok(ticket) => {
                let result = fetch();
                self.settle(ticket, result, session, is_empty)
            }
            Err(effects) => effects,
        }
    }

    /// Settles without a request: there is nothing to show.
    pub fn mark_empty(&mut self) {
        self.lifecycle.invalidate();
        self.state = ViewState::Empty;
    }

    /// Leaves the page; any in-flight result will be discarded.
    pub fn unmount(&mut self) {
        self.lifecycle.invalidate();
        self.state = ViewState::Idle;
    }
}
