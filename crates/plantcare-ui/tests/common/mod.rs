//! Shared fixtures for controller integration tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use plantcare_api::{
    ApiClient, HttpRequest, HttpResponse, HttpTransport, Method, TransportError,
};
use plantcare_session::MemorySessionStore;
use serde_json::{Value, json};

/// Fake origin used by every fixture client.
pub const ORIGIN: &str = "https://api.plantcare.test";

/// Transport answering per `METHOD path` and recording every request.
///
/// Each route replays its replies in order; the last reply repeats.
#[derive(Debug, Default)]
pub struct RoutedTransport {
    routes: Mutex<HashMap<String, VecDeque<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

#[allow(dead_code)]
impl RoutedTransport {
    /// Creates a transport with no routes; every request fails to connect.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues a JSON reply for `method` on `path`.
    pub fn on(self: &Arc<Self>, method: Method, path: &str, status: u16, body: Value) -> Arc<Self> {
        self.routes
            .lock()
            .expect("route table lock")
            .entry(format!("{} {path}", method.as_str()))
            .or_default()
            .push_back(HttpResponse::json(status, &body));
        Arc::clone(self)
    }

    /// Returns all requests sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("request log lock").clone()
    }

    /// Returns the request paths sent so far, relative to [`ORIGIN`].
    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| request.url.trim_start_matches(ORIGIN).to_string())
            .collect()
    }
}

impl HttpTransport for RoutedTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = format!(
            "{} {}",
            request.method.as_str(),
            request.url.trim_start_matches(ORIGIN)
        );
        self.requests.lock().expect("request log lock").push(request);

        let mut routes = self.routes.lock().expect("route table lock");
        let Some(queue) = routes.get_mut(&key) else {
            return Err(TransportError::Connect(format!("no route for {key}")));
        };
        match queue.len() {
            0 => Err(TransportError::Connect(format!("no reply for {key}"))),
            1 => queue
                .front()
                .cloned()
                .ok_or_else(|| TransportError::Connect(key.clone())),
            _ => queue
                .pop_front()
                .ok_or_else(|| TransportError::Connect(key.clone())),
        }
    }
}

/// Builds a client against [`ORIGIN`] with an optional stored token.
#[allow(dead_code)]
pub fn client_with(
    transport: Arc<RoutedTransport>,
    token: Option<&str>,
) -> (ApiClient, Arc<MemorySessionStore>) {
    let session = Arc::new(match token {
        Some(token) => MemorySessionStore::with_token(token),
        None => MemorySessionStore::new(),
    });
    let client = ApiClient::new(ORIGIN, transport, session.clone())
        .expect("fixture base url should be valid");
    (client, session)
}

/// Profile envelope for `/api/auth/me`.
#[allow(dead_code)]
pub fn profile_body() -> Value {
    json!({"data": {"email": "ana@example.test", "username": "ana"}})
}

/// History envelope with one renderable record and two without images.
#[allow(dead_code)]
pub fn history_body() -> Value {
    json!({"data": [
        {
            "id": 1,
            "disease_name": "Tomato___Late_blight",
            "description": "Dark lesions",
            "confidence": 97.5,
            "date_predict": "2025-05-01T10:00:00Z",
            "image": "aGVsbG8="
        },
        {
            "id": "2",
            "disease_name": "Apple___healthy",
            "confidence": 88.0,
            "date_predict": "2025-05-02T10:00:00Z",
            "image": ""
        },
        {
            "id": 3,
            "disease_name": "Corn___rust",
            "confidence": 55.0,
            "date_predict": "2025-05-03T10:00:00Z"
        }
    ]})
}

/// Detail envelope for one prediction.
#[allow(dead_code)]
pub fn detail_body() -> Value {
    json!({"data": {
        "id": 42,
        "class_name": "Tomato___Late_blight",
        "confidence": 97.5,
        "prediction_time": "2025-05-01T10:00:00Z",
        "image": "aGVsbG8=",
        "next_info": {
            "name": "Late blight",
            "meaning": "Fungal-like disease",
            "suggestion": ["Remove infected leaves"]
        }
    }})
}
