#![warn(missing_docs)]
//! # plantcare-ui
//!
//! ## Purpose
//! Headless page controllers for the plant-care client: routing, the shared
//! fetch lifecycle, forms, the upload area, and the navigation shell.
//!
//! ## Responsibilities
//! - Gate protected pages on the session token before any request.
//! - Track Idle, Loading, Ready, Empty, and Error per page.
//! - Discard results that settle after their page was left or reloaded.
//! - Turn API failures into notifications; on auth denial clear the session
//!   and redirect to login exactly once.
//! - Validate forms and uploads locally before touching the network.
//!
//! ## Data flow
//! [`Router::open`] -> [`Screen::mount`] -> [`FetchPage`] gate -> API call ->
//! settle -> [`Effects`] -> [`Navigator::apply`] -> notifications for display.
//!
//! ## Ownership and lifetimes
//! Controllers own their state and borrow the [`plantcare_api::ApiClient`]
//! per call. Effects are plain values returned to the caller; no controller
//! navigates or renders on its own.
//!
//! ## Error model
//! Failures never escape a controller. They surface as [`ViewState::Error`]
//! plus an error notification. Route parsing is the only fallible public
//! entry point ([`RouteError`]).
//!
//! ## Security and privacy notes
//! Form `Debug` output redacts passwords. Upload logs carry the media type,
//! size, and SHA-256 digest, never the image bytes.

mod effect;
mod lifecycle;
mod pages;
mod route;
mod router;
mod screen;
mod shell;
mod upload;

pub use effect::{Effect, Effects, Notification, NotificationLevel};
pub use lifecycle::{
    FetchPage, Lifecycle, Ticket, ViewState, missing_session_effects, report_failure,
};
pub use pages::{
    DetailPage, HISTORY_FALLBACK, HistoryPage, HomePage, LoginForm, LoginPage, RegisterForm,
    RegisterPage,
};
pub use route::{Navigator, Route, RouteError};
pub use router::{MAX_REDIRECTS, Router};
pub use screen::Screen;
pub use shell::{NAV_LINKS, NavShell};
pub use upload::UploadFlow;
