//! Transport abstraction between the API client and the network.

use std::fmt;

use thiserror::Error;

/// HTTP methods used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

impl Method {
    /// Returns the method token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file field of a multipart form.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// Original file name.
    pub file_name: String,
    /// Declared media type.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// JSON document.
    Json(serde_json::Value),
    /// `multipart/form-data` with file fields.
    Multipart(Vec<FilePart>),
}

/// Fully resolved outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Extra headers (name, value).
    pub headers: Vec<(String, String)>,
    /// Body.
    pub body: RequestBody,
}

impl HttpRequest {
    /// Returns the first header value matching `name` case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response received from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response with a JSON body.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string().into_bytes(),
        }
    }
}

/// Abstract transport used by the API client.
pub trait HttpTransport: Send + Sync {
    /// Sends one request and returns whatever response the server produced.
    ///
    /// # Errors
    /// Returns [`TransportError`] only when no response was received.
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Failure to obtain any response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,
    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),
    /// Request could not be built or sent.
    #[error("request failed: {0}")]
    Request(String),
}
