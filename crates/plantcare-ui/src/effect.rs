//! Side effects requested by controllers and applied by the shell.

use crate::route::Route;

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
}

/// Transient user-visible message (toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Message text.
    pub message: String,
}

/// One requested side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Move to another route.
    Navigate(Route),
    /// Show a notification.
    Notify(Notification),
}

/// Ordered list of effects produced by one controller step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects(Vec<Effect>);

impl Effects {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a navigation.
    pub fn navigate(&mut self, route: Route) {
        self.0.push(Effect::Navigate(route));
    }

    /// Appends a success notification.
    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Success, message);
    }

    /// Appends an error notification.
    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Error, message);
    }

    fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.0.push(Effect::Notify(Notification {
            level,
            message: message.into(),
        }));
    }

    /// Returns `true` when nothing was requested.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns every requested navigation target, in order.
    pub fn navigations(&self) -> Vec<&Route> {
        self.0
            .iter()
            .filter_map(|effect| match effect {
                Effect::Navigate(route) => Some(route),
                Effect::Notify(_) => None,
            })
            .collect()
    }

    /// Returns every requested notification, in order.
    pub fn notifications(&self) -> Vec<&Notification> {
        self.0
            .iter()
            .filter_map(|effect| match effect {
                Effect::Notify(notification) => Some(notification),
                Effect::Navigate(_) => None,
            })
            .collect()
    }

    /// Appends all effects of `other`.
    pub fn extend(&mut self, other: Effects) {
        self.0.extend(other.0);
    }
}

impl IntoIterator for Effects {
    type Item = Effect;
    type IntoIter = std::vec::IntoIter<Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
