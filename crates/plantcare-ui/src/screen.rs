//! One page controller per route.

use plantcare_api::ApiClient;

use crate::effect::Effects;
use crate::pages::{DetailPage, HistoryPage, HomePage, LoginPage, RegisterPage};
use crate::route::Route;

/// The page currently on screen.
#[derive(Debug, Clone)]
pub enum Screen {
    /// Dashboard.
    Home(HomePage),
    /// Registration form.
    Register(RegisterPage),
    /// Login form.
    Login(LoginPage),
    /// History list.
    History(HistoryPage),
    /// One prediction.
    Detail(DetailPage),
}

impl Screen {
    /// Builds a fresh, unmounted controller for `route`.
    pub fn for_route(route: &Route) -> Self {
        match route {
            Route::Home => Screen::Home(HomePage::new()),
            Route::Register => Screen::Register(RegisterPage::new()),
            Route::Login => Screen::Login(LoginPage::new()),
            Route::History => Screen::History(HistoryPage::new()),
            Route::HistoryDetail(id) => Screen::Detail(DetailPage::new(id.clone())),
        }
    }

    /// Route this screen renders.
    pub fn route(&self) -> Route {
        match self {
            Screen::Home(_) => Route::Home,
            Screen::Register(_) => Route::Register,
            Screen::Login(_) => Route::Login,
            Screen::History(_) => Route::History,
            Screen::Detail(page) => Route::HistoryDetail(page.id().to_string()),
        }
    }

    /// Runs the page's mount fetch. Forms fetch nothing.
    pub fn mount(&mut self, api: &ApiClient) -> Effects {
        match self {
            Screen::Home(page) => page.mount(api),
            Screen::History(page) => page.mount(api),
            Screen::Detail(page) => page.mount(api),
            Screen::Register(_) | Screen::Login(_) => Effects::new(),
        }
    }

    /// Abandons any in-flight work of the page.
    pub fn unmount(&mut self) {
        match self {
            Screen::Home(page) => page.unmount(),
            Screen::History(page) => page.unmount(),
            Screen::Detail(page) => page.unmount(),
            Screen::Register(_) | Screen::Login(_) => {}
        }
    }
}
