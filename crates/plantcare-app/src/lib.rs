#![warn(missing_docs)]
//! # plantcare-app
//!
//! ## Purpose
//! Terminal shell for the plant-care client: configuration, logging, wiring,
//! and text rendering around the `plantcare-ui` controllers.
//!
//! ## Responsibilities
//! - Resolve [`Config`] from environment, config file, and defaults.
//! - Initialise `tracing` output on stderr.
//! - Build the API client over the file-backed session store.
//! - Render page state and notifications as plain text.
//!
//! ## Data flow
//! CLI command -> [`Config::load`] -> [`build_router`] -> `Router::open` or
//! `Router::dispatch` -> [`render::render_screen`] -> stdout.
//!
//! ## Ownership and lifetimes
//! The binary owns one [`plantcare_ui::Router`] per invocation; nothing is
//! shared across runs except the session file.
//!
//! ## Error model
//! Setup failures are [`AppError`] values reported once by the binary. Page
//! failures are notifications and set a non-zero exit status.
//!
//! ## Security and privacy notes
//! - The session token lives only in the session file.
//! - [`redact_sensitive`] scrubs credentials from free-form text before it is
//!   logged or printed.

pub mod config;
pub mod render;

use std::path::PathBuf;
use std::sync::Arc;

use plantcare_api::{ApiClient, ApiError, ReqwestTransport, TransportError};
use plantcare_core::CoreError;
use plantcare_session::FileSessionStore;
use plantcare_ui::{RouteError, Router};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub use config::{Config, FileConfig};

/// Build-time application version loaded from the root `VERSION` file.
pub const APP_VERSION: &str = env!("PLANTCARE_VERSION");

const REDACTED: &str = "<redacted>";
const SENSITIVE_KEYS: [&str; 4] = ["password", "token", "authorization", "bearer"];

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Builds the default tracing filter for `log_level`: the level applies to
/// the client crates, everything else logs warnings only.
pub fn default_log_filter(log_level: &str) -> String {
    let level = log_level.trim();
    [
        "warn".to_string(),
        format!("plantcare_app={level}"),
        format!("plantcare_api={level}"),
        format!("plantcare_session={level}"),
        format!("plantcare_ui={level}"),
    ]
    .join(",")
}

/// Initialises the global `tracing` subscriber on stderr.
///
/// Precedence: `RUST_LOG` over `config.log_level`.
///
/// # Errors
/// Returns [`AppError::Logging`] for an invalid filter or when a subscriber
/// is already installed.
pub fn init_logging(config: &Config) -> Result<(), AppError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_log_filter(&config.log_level))
            .map_err(|error| AppError::Logging(error.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| AppError::Logging(error.to_string()))
}

/// Builds a router over the production transport and the session file named
/// by `config`.
///
/// # Errors
/// Returns [`AppError::Transport`] when the HTTP client cannot be built and
/// [`AppError::Api`] for an unusable base URL.
pub fn build_router(config: &Config) -> Result<Router, AppError> {
    let transport = Arc::new(ReqwestTransport::new(config.request_timeout())?);
    let session = Arc::new(FileSessionStore::new(config.session_path.clone()));
    let client = ApiClient::new(&config.api_base_url, transport, session)?;
    tracing::debug!(stage = "app", action = "wired", base_url = client.base_url());
    Ok(Router::new(client))
}

/// Redacts credential values in log-safe output.
///
/// Recognises `key=value`, `key: value`, and JSON `"key":"value"` forms for
/// password, token, and authorization keys, plus bare `Bearer <credential>`.
/// Only the value is replaced; surrounding text is kept.
pub fn redact_sensitive(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some((start, end)) = next_secret(rest) {
        output.push_str(&rest[..start]);
        output.push_str(REDACTED);
        rest = &rest[end..];
    }
    output.push_str(rest);
    output
}

fn next_secret(input: &str) -> Option<(usize, usize)> {
    let lower = input.to_ascii_lowercase();
    let mut from = 0;
    loop {
        let (key_start, key) = SENSITIVE_KEYS
            .iter()
            .filter_map(|key| lower[from..].find(key).map(|at| (from + at, *key)))
            .min_by_key(|(at, _)| *at)?;
        let after_key = key_start + key.len();

        if let Some(offset) = value_offset(&input[after_key..], key == "bearer") {
            let start = after_key + offset;
            let len = input[start..].find(is_value_end).unwrap_or(input.len() - start);
            if len > 0 {
                return Some((start, start + len));
            }
        }
        from = after_key;
    }
}

/// Offset of the secret value following a key, or `None` when the key is not
/// followed by a separator.
fn value_offset(rest: &str, bearer: bool) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut index = 0;

    if bearer {
        while bytes.get(index) == Some(&b' ') {
            index += 1;
        }
        return (index > 0).then_some(index);
    }

    if bytes.get(index) == Some(&b'"') {
        index += 1;
    }
    while bytes.get(index) == Some(&b' ') {
        index += 1;
    }
    if !matches!(bytes.get(index), Some(b'=' | b':')) {
        return None;
    }
    index += 1;
    while matches!(bytes.get(index), Some(b' ' | b'"')) {
        index += 1;
    }

    // Keep the auth scheme, redact the credential after it.
    if rest[index..].to_ascii_lowercase().starts_with("bearer ") {
        index += "bearer ".len();
        while bytes.get(index) == Some(&b' ') {
            index += 1;
        }
    }
    Some(index)
}

fn is_value_end(c: char) -> bool {
    c.is_whitespace() || matches!(c, '"' | '\'' | ',' | '&' | ';' | '}')
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),
    /// Config file exists but cannot be read.
    #[error("unable to read config file {path}: {source}")]
    ConfigRead {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Config file exists but is not valid TOML for [`FileConfig`].
    #[error("invalid config file {path}: {source}")]
    ConfigParse {
        /// Config file path.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },
    /// Logging could not be initialised.
    #[error("logging setup failed: {0}")]
    Logging(String),
    /// HTTP client could not be built.
    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),
    /// API client setup error.
    #[error("api error: {0}")]
    Api(#[from] ApiError),
    /// Route argument did not parse.
    #[error("{0}")]
    Route(#[from] RouteError),
    /// Record payload could not be decoded.
    #[error("record error: {0}")]
    Core(#[from] CoreError),
    /// Output file could not be written.
    #[error("unable to write {path}: {source}")]
    Write {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
