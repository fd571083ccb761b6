#![warn(missing_docs)]
//! # plantcare-api
//!
//! ## Purpose
//! Typed client for the plant-disease-detection HTTP API.
//!
//! ## Responsibilities
//! - Resolve endpoint URLs against a validated base URL.
//! - Attach the session's bearer token to protected calls, short-circuiting
//!   when no token is stored.
//! - Classify failures into transport, auth, client, and server classes.
//! - Decode `{ "data": ... }` envelopes into typed records, failing closed.
//!
//! ## Data flow
//! Page controller -> [`ApiClient`] operation -> [`HttpTransport::send`] ->
//! status classification -> envelope decode -> typed record or [`ApiError`].
//!
//! ## Ownership and lifetimes
//! The client is cheap to clone: transport and session are shared `Arc`s and
//! every request is built from owned values.
//!
//! ## Error model
//! Every failure is an [`ApiError`]; [`ApiError::class`] yields the
//! [`FailureClass`] controllers react to. The client never clears the session
//! itself; callers own that reaction so it happens exactly once per call.
//!
//! ## Security and privacy notes
//! Tokens, passwords, and file bytes are never logged; request logs carry the
//! method and path only.

mod error;
mod http;
mod transport;

use std::sync::Arc;

use plantcare_core::{
    PredictionDetail, PredictionSummary, SubmissionData, TokenData, UserProfile, Validate,
    decode_envelope, decode_error_body, decode_renderable_list,
};
use plantcare_session::SessionStore;
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

pub use error::{
    ApiError, FORBIDDEN_MESSAGE, FailureClass, MISSING_TOKEN_MESSAGE, SERVER_MESSAGE,
    TRANSPORT_MESSAGE, UNAUTHORIZED_MESSAGE, classify_api_error, classify_status,
};
pub use http::{DEFAULT_TIMEOUT, ReqwestTransport};
pub use transport::{
    FilePart, HttpRequest, HttpResponse, HttpTransport, Method, RequestBody, TransportError,
};

/// Production API origin.
pub const DEFAULT_BASE_URL: &str = "https://plantcare.up.railway.app";

/// Registration endpoint.
pub const SIGN_UP_PATH: &str = "/api/auth/signup";
/// Login endpoint.
pub const SIGN_IN_PATH: &str = "/api/auth/signin";
/// Current profile endpoint.
pub const ME_PATH: &str = "/api/auth/me";
/// Prediction collection endpoint (list and submit).
pub const PREDICT_PATH: &str = "/api/predict";

/// Registration form payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    /// Desired display name.
    pub username: String,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Login form payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Client for the prediction service.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Creates a client for `base_url`.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidBaseUrl`] when the URL does not parse or does
    /// not use `http`/`https`.
    pub fn new(
        base_url: &str,
        transport: Arc<dyn HttpTransport>,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, ApiError> {
        let base_url = validate_base_url(base_url)?;
        Ok(Self {
            base_url,
            transport,
            session,
        })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Returns the injected session store.
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Sends one request and returns the raw success body.
    ///
    /// # Errors
    /// Returns [`ApiError::MissingToken`] without touching the network when
    /// `requires_auth` is set and no token is stored; otherwise the classified
    /// transport or status failure.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        requires_auth: bool,
    ) -> Result<Vec<u8>, ApiError> {
        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if requires_auth {
            let Some(token) = self.session.get()? else {
                tracing::warn!(stage = "api", action = "short_circuit", %method, path, "no session token");
                return Err(ApiError::MissingToken);
            };
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let url = self.endpoint_url(path)?;
        tracing::info!(stage = "api", action = "request", %method, path, "sending request");

        let response = self
            .transport
            .send(HttpRequest {
                method,
                url,
                headers,
                body,
            })
            .inspect_err(|error| {
                tracing::warn!(stage = "api", action = "transport_failure", %method, path, %error);
            })?;

        match classify_status(response.status) {
            None => {
                tracing::info!(stage = "api", action = "response", %method, path, status = response.status);
                Ok(response.body)
            }
            Some(class) => {
                tracing::warn!(
                    stage = "api",
                    action = "failure",
                    %method,
                    path,
                    status = response.status,
                    ?class
                );
                Err(error_for_status(response.status, class, &response.body))
            }
        }
    }

    /// Sends one request and decodes the `data` envelope of the reply.
    ///
    /// # Errors
    /// Same as [`ApiClient::request`], plus [`ApiError::Contract`] when the
    /// body does not match `T`.
    pub fn request_data<T>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        requires_auth: bool,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Validate,
    {
        let raw = self.request(method, path, body, requires_auth)?;
        decode_envelope(&raw).map_err(|error| {
            tracing::warn!(stage = "api", action = "decode_failure", path, %error);
            ApiError::Contract(error)
        })
    }

    /// Registers a new account. The reply body is not inspected.
    ///
    /// # Errors
    /// Classified [`ApiError`].
    pub fn sign_up(&self, request: &SignUpRequest) -> Result<(), ApiError> {
        let body = json!({
            "username": request.username,
            "email": request.email,
            "password": request.password,
        });
        self.request(Method::Post, SIGN_UP_PATH, RequestBody::Json(body), false)
            .map(|_| ())
    }

    /// Exchanges credentials for a bearer token.
    ///
    /// # Errors
    /// Classified [`ApiError`].
    pub fn sign_in(&self, request: &SignInRequest) -> Result<TokenData, ApiError> {
        let body = json!({
            "email": request.email,
            "password": request.password,
        });
        self.request_data(Method::Post, SIGN_IN_PATH, RequestBody::Json(body), false)
    }

    /// Fetches the current user's profile.
    ///
    /// # Errors
    /// Classified [`ApiError`].
    pub fn me(&self) -> Result<UserProfile, ApiError> {
        self.request_data(Method::Get, ME_PATH, RequestBody::Empty, true)
    }

    /// Lists the user's prediction history. Entries without an image are
    /// skipped before they are decoded.
    ///
    /// # Errors
    /// Classified [`ApiError`].
    pub fn list_predictions(&self) -> Result<Vec<PredictionSummary>, ApiError> {
        let raw = self.request(Method::Get, PREDICT_PATH, RequestBody::Empty, true)?;
        let list = decode_renderable_list::<PredictionSummary>(&raw).map_err(|error| {
            tracing::warn!(stage = "api", action = "decode_failure", path = PREDICT_PATH, %error);
            ApiError::Contract(error)
        })?;
        if list.skipped > 0 {
            tracing::debug!(
                stage = "api",
                action = "filter",
                skipped = list.skipped,
                "history entries without image skipped"
            );
        }
        Ok(list.records)
    }

    /// Fetches one prediction by id.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidPath`] for blank ids, `.`/`..`, and ids
    /// containing `/`; otherwise a classified [`ApiError`].
    pub fn get_prediction(&self, id: &str) -> Result<PredictionDetail, ApiError> {
        let id = id.trim();
        if id.is_empty() || id.contains('/') || matches!(id, "." | "..") {
            return Err(ApiError::InvalidPath(format!("invalid prediction id {id:?}")));
        }
        let path = format!("{PREDICT_PATH}/{id}");
        self.request_data(Method::Get, &path, RequestBody::Empty, true)
    }

    /// Submits an image for classification.
    ///
    /// # Errors
    /// Classified [`ApiError`].
    pub fn submit_prediction(&self, image: FilePart) -> Result<SubmissionData, ApiError> {
        self.request_data(
            Method::Post,
            PREDICT_PATH,
            RequestBody::Multipart(vec![image]),
            true,
        )
    }

    fn endpoint_url(&self, path: &str) -> Result<String, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url.into())
    }
}

/// Validates an API base URL.
///
/// # Errors
/// Returns [`ApiError::InvalidBaseUrl`] for unparseable URLs or schemes other
/// than `http`/`https`.
pub fn validate_base_url(base_url: &str) -> Result<Url, ApiError> {
    let parsed = Url::parse(base_url.trim())
        .map_err(|error| ApiError::InvalidBaseUrl(format!("{base_url}: {error}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::InvalidBaseUrl(format!(
            "{base_url}: scheme must be http or https"
        )));
    }

    Ok(parsed)
}

fn error_for_status(status: u16, class: FailureClass, body: &[u8]) -> ApiError {
    let message = || decode_error_body(body).server_message().map(str::to_string);
    match class {
        FailureClass::Auth => ApiError::Unauthorized {
            status,
            message: message(),
        },
        FailureClass::Server => ApiError::Server { status },
        _ if (400..500).contains(&status) => ApiError::Rejected {
            status,
            message: message(),
        },
        _ => ApiError::UnexpectedStatus { status },
    }
}
