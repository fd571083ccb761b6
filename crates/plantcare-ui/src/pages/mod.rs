//! Page controllers, one per route.

mod detail;
mod history;
mod home;
mod login;
mod register;

pub use detail::DetailPage;
pub use history::{HISTORY_FALLBACK, HistoryPage};
pub use home::HomePage;
pub use login::{LoginForm, LoginPage};
pub use register::{RegisterForm, RegisterPage};

/// Returns the message for the first blank field, if any.
pub(crate) fn first_missing_field(fields: &[(&str, &str)]) -> Option<String> {
    fields
        .iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| format!("{label} is required."))
}
