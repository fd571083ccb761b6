//! Drives the screen, the navigation shell, and the navigator together.

use plantcare_api::ApiClient;

use crate::effect::{Effects, Notification};
use crate::route::{Navigator, Route};
use crate::screen::Screen;
use crate::shell::NavShell;

/// Upper bound on chained redirects triggered by one user action.
pub const MAX_REDIRECTS: usize = 4;

/// Owns the active page and applies the effects its controllers return.
pub struct Router {
    api: ApiClient,
    navigator: Navigator,
    shell: NavShell,
    screen: Screen,
}

impl Router {
    /// Creates a router sitting on the login form; nothing is fetched until
    /// [`Router::open`] is called.
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            navigator: Navigator::new(Route::Login),
            shell: NavShell::new(),
            screen: Screen::Login(Default::default()),
        }
    }

    /// API client shared by every page.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Navigation log.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Header chrome.
    pub fn shell(&self) -> &NavShell {
        &self.shell
    }

    /// Active page.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Navigates to `route`, mounting its page and following redirects.
    /// Returns the notifications to display.
    pub fn open(&mut self, route: Route) -> Vec<Notification> {
        let mut effects = Effects::new();
        effects.navigate(route);
        self.follow(effects)
    }

    /// Re-mounts the active page.
    pub fn reload(&mut self) -> Vec<Notification> {
        let route = self.screen.route();
        self.open(route)
    }

    /// Runs a controller action against the active page and applies its
    /// effects.
    pub fn dispatch(
        &mut self,
        action: impl FnOnce(&mut Screen, &ApiClient) -> Effects,
    ) -> Vec<Notification> {
        let effects = action(&mut self.screen, &self.api);
        self.follow(effects)
    }

    /// Fetches the header profile without mounting a page. A denied
    /// request still clears the session and redirects to login.
    pub fn load_profile(&mut self) -> Vec<Notification> {
        let effects = self.shell.mount(&self.api);
        self.follow(effects)
    }

    /// Logs out through the shell.
    pub fn logout(&mut self) -> Vec<Notification> {
        let effects = self.shell.logout(self.api.session().as_ref());
        self.follow(effects)
    }

    fn follow(&mut self, mut pending: Effects) -> Vec<Notification> {
        let mut notifications = Vec::new();
        for _ in 0..=MAX_REDIRECTS {
            let target = pending.navigations().last().map(|route| (*route).clone());
            notifications.extend(self.navigator.apply(pending));
            let Some(target) = target else {
                return notifications;
            };
            pending = self.enter(target);
        }

        tracing::warn!(stage = "navigation", action = "redirect_limit", current = %self.navigator.current());
        notifications
    }

    fn enter(&mut self, route: Route) -> Effects {
        self.screen.unmount();
        self.shell.unmount();
        self.screen = Screen::for_route(&route);

        let mut effects = self.screen.mount(&self.api);
        // The shell is skipped when the page already redirected away.
        if route.requires_auth() && effects.navigations().is_empty() {
            effects.extend(self.shell.mount(&self.api));
        }
        effects
    }
}
