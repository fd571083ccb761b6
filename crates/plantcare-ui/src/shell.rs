//! Navigation shell: header profile, nav links, logout.

use plantcare_api::ApiClient;
use plantcare_core::UserProfile;
use plantcare_session::SessionStore;

use crate::effect::Effects;
use crate::lifecycle::{FetchPage, ViewState};
use crate::route::Route;

const PROFILE_FALLBACK: &str = "Failed to fetch user.";

/// Header navigation links, in display order.
pub static NAV_LINKS: [(&str, Route); 2] = [("Dashboard", Route::Home), ("History", Route::History)];

/// Chrome around every protected page.
#[derive(Debug, Clone)]
pub struct NavShell {
    profile: FetchPage<UserProfile>,
}

impl NavShell {
    /// Creates a shell with no profile loaded.
    pub fn new() -> Self {
        Self {
            profile: FetchPage::new(true, PROFILE_FALLBACK),
        }
    }

    /// Fetches the signed-in user's profile, independently of the page.
    pub fn mount(&mut self, api: &ApiClient) -> Effects {
        self.profile
            .load(api.session().as_ref(), || api.me(), |_| false)
    }

    /// Render state of the profile badge.
    pub fn profile(&self) -> &ViewState<UserProfile> {
        self.profile.state()
    }

    /// Clears the session and returns to login. No server call is made.
    pub fn logout(&mut self, session: &dyn SessionStore) -> Effects {
        self.profile.unmount();
        if let Err(error) = session.clear() {
            tracing::error!(stage = "session", action = "clear_failed", %error);
        }
        tracing::info!(stage = "session", action = "logout");

        let mut effects = Effects::new();
        effects.navigate(Route::Login);
        effects
    }

    /// Leaves the shell; an in-flight profile result is discarded.
    pub fn unmount(&mut self) {
        self.profile.unmount();
    }
}

impl Default for NavShell {
    fn default() -> Self {
        Self::new()
    }
}
