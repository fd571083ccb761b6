//! Shared fixtures for API client integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use plantcare_api::{ApiClient, HttpRequest, HttpResponse, HttpTransport, TransportError};
use plantcare_session::MemorySessionStore;

/// Transport that replays scripted replies and records every request.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    /// Creates a transport replying with `replies` in order.
    pub fn new(replies: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Creates a transport replying once with `status` and a JSON body.
    pub fn replying(status: u16, body: serde_json::Value) -> Arc<Self> {
        Self::new(vec![Ok(HttpResponse::json(status, &body))])
    }

    /// Returns all requests sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("request log lock").clone()
    }
}

impl HttpTransport for ScriptedTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().expect("request log lock").push(request);
        self.replies
            .lock()
            .expect("reply lock")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connect("no scripted reply".to_string())))
    }
}

/// Builds a client against a fake origin with an optional stored token.
#[allow(dead_code)]
pub fn client_with(
    transport: Arc<ScriptedTransport>,
    token: Option<&str>,
) -> (ApiClient, Arc<MemorySessionStore>) {
    let session = Arc::new(match token {
        Some(token) => MemorySessionStore::with_token(token),
        None => MemorySessionStore::new(),
    });
    let client = ApiClient::new("https://api.plantcare.test", transport, session.clone())
        .expect("fixture base url should be valid");
    (client, session)
}
