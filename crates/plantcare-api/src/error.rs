//! Failure taxonomy shared by every API call.

use plantcare_core::CoreError;
use plantcare_session::SessionError;
use thiserror::Error;

use crate::transport::TransportError;

/// Message shown when no response was received.
pub const TRANSPORT_MESSAGE: &str =
    "No response from server. Please check your internet connection.";
/// Message shown when a protected call is attempted without a token.
pub const MISSING_TOKEN_MESSAGE: &str = "No token available, please login!";
/// Message shown for HTTP 401.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: Please log in again.";
/// Message shown for HTTP 403.
pub const FORBIDDEN_MESSAGE: &str = "Token invalid, please login!";
/// Message shown for any 5xx status.
pub const SERVER_MESSAGE: &str = "Server error. Please try again later.";

/// Coarse failure class driving controller reactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// No response received (network, DNS, timeout).
    Transport,
    /// Credential missing, invalid, or insufficient; session must be cleared.
    Auth,
    /// Request rejected by the server, or response shape was unexpected.
    Client,
    /// Server failed to handle a valid request.
    Server,
    /// Caught locally before any network call.
    Local,
}

/// Errors produced by [`crate::ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Configured base URL is unusable.
    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(String),
    /// Request path could not be built from caller input.
    #[error("invalid request path: {0}")]
    InvalidPath(String),
    /// No response was received.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
    /// Protected call attempted without a stored token.
    #[error("no session token available")]
    MissingToken,
    /// Server denied the credential (401/403).
    #[error("authorization denied with status {status}")]
    Unauthorized {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, if any.
        message: Option<String>,
    },
    /// Server rejected the request with a 4xx status.
    #[error("request rejected with status {status}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, if any.
        message: Option<String>,
    },
    /// Server failed with a 5xx status.
    #[error("server failure with status {status}")]
    Server {
        /// HTTP status code.
        status: u16,
    },
    /// Status outside the classified ranges (1xx/3xx).
    #[error("unexpected status {status}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
    },
    /// 2xx body did not match the typed envelope.
    #[error(transparent)]
    Contract(#[from] CoreError),
    /// Session storage could not be read.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Returns the failure class of this error.
    pub fn class(&self) -> FailureClass {
        classify_api_error(self)
    }

    /// Returns `true` when the caller must clear the session and redirect.
    pub fn requires_reauth(&self) -> bool {
        self.class() == FailureClass::Auth
    }

    /// Returns the message the server attached to a rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message, .. } | ApiError::Rejected { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// Builds the user-visible message, using `fallback` for client failures
    /// that carry no server message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Transport(_) => TRANSPORT_MESSAGE.to_string(),
            ApiError::MissingToken => MISSING_TOKEN_MESSAGE.to_string(),
            ApiError::Unauthorized { status: 401, .. } => UNAUTHORIZED_MESSAGE.to_string(),
            ApiError::Unauthorized { .. } => FORBIDDEN_MESSAGE.to_string(),
            ApiError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Rejected { message: None, .. } | ApiError::Contract(_) => {
                fallback.to_string()
            }
            ApiError::Server { .. } => SERVER_MESSAGE.to_string(),
            ApiError::UnexpectedStatus { status } => format!("Error {status}: {fallback}"),
            ApiError::InvalidBaseUrl(_) | ApiError::InvalidPath(_) | ApiError::Session(_) => {
                self.to_string()
            }
        }
    }
}

/// Classifies an HTTP status code; `None` for success statuses.
pub fn classify_status(status: u16) -> Option<FailureClass> {
    match status {
        200..=299 => None,
        401 | 403 => Some(FailureClass::Auth),
        400..=499 => Some(FailureClass::Client),
        500..=599 => Some(FailureClass::Server),
        _ => Some(FailureClass::Client),
    }
}

/// Maps an [`ApiError`] to its [`FailureClass`].
pub fn classify_api_error(error: &ApiError) -> FailureClass {
    match error {
        ApiError::Transport(_) => FailureClass::Transport,
        ApiError::MissingToken | ApiError::Unauthorized { .. } => FailureClass::Auth,
        ApiError::Rejected { .. } | ApiError::UnexpectedStatus { .. } | ApiError::Contract(_) => {
            FailureClass::Client
        }
        ApiError::Server { .. } => FailureClass::Server,
        ApiError::InvalidBaseUrl(_) | ApiError::InvalidPath(_) | ApiError::Session(_) => {
            FailureClass::Local
        }
    }
}
