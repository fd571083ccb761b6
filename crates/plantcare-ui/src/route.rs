//! Client routes and the navigator that tracks the active one.

use std::fmt;

use thiserror::Error;

use crate::effect::{Effect, Effects, Notification};

/// One client-side route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Dashboard with upload area and recent predictions (`/`).
    Home,
    /// Registration form (`/auth/register`).
    Register,
    /// Login form (`/auth/login`).
    Login,
    /// Prediction history list (`/history`).
    History,
    /// One prediction (`/history/:id`).
    HistoryDetail(String),
}

impl Route {
    /// Parses a client path such as `/history/42`.
    ///
    /// Trailing slashes are ignored; query strings and fragments are not part
    /// of the route.
    ///
    /// # Errors
    /// Returns [`RouteError::Unknown`] for paths outside the route table.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let segments: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();

        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["auth", "register"] => Ok(Route::Register),
            ["auth", "login"] => Ok(Route::Login),
            ["history"] => Ok(Route::History),
            ["history", id] => Ok(Route::HistoryDetail((*id).to_string())),
            _ => Err(RouteError::Unknown(path.to_string())),
        }
    }

    /// Returns the canonical path of this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Register => "/auth/register".to_string(),
            Route::Login => "/auth/login".to_string(),
            Route::History => "/history".to_string(),
            Route::HistoryDetail(id) => format!("/history/{id}"),
        }
    }

    /// Returns `true` when rendering this route needs a session token.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Register | Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Tracks the active route and every navigation applied so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: Route,
    visited: Vec<Route>,
}

impl Navigator {
    /// Starts navigation at `initial`.
    pub fn new(initial: Route) -> Self {
        Self {
            current: initial.clone(),
            visited: vec![initial],
        }
    }

    /// Returns the active route.
    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Returns every route visited, oldest first.
    pub fn visited(&self) -> &[Route] {
        &self.visited
    }

    /// Moves to `route`.
    pub fn navigate(&mut self, route: Route) {
        tracing::info!(stage = "navigation", action = "navigate", from = %self.current, to = %route);
        self.visited.push(route.clone());
        self.current = route;
    }

    /// Applies controller effects in order and returns the notifications to
    /// display.
    pub fn apply(&mut self, effects: Effects) -> Vec<Notification> {
        let mut notifications = Vec::new();
        for effect in effects {
            match effect {
                Effect::Navigate(route) => self.navigate(route),
                Effect::Notify(notification) => notifications.push(notification),
            }
        }
        notifications
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

/// Route parsing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// Path matches no route.
    #[error("unknown route: {0}")]
    Unknown(String),
}
