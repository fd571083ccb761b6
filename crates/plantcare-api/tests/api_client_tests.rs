//! Integration tests for request building, auth gating, and classification.

mod common;

use common::{ScriptedTransport, client_with};
use plantcare_api::{
    ApiClient, ApiError, FailureClass, FilePart, Method, RequestBody, SignInRequest,
    TRANSPORT_MESSAGE, TransportError,
};
use plantcare_session::SessionStore;
use serde_json::json;

#[test]
fn api_client_tests_missing_token_short_circuits_without_network() {
    let transport = ScriptedTransport::new(vec![]);
    let (client, _) = client_with(transport.clone(), None);

    let error = client.list_predictions().expect_err("no token must fail");
    assert!(matches!(error, ApiError::MissingToken));
    assert_eq!(error.class(), FailureClass::Auth);
    assert!(transport.requests().is_empty());
}

#[test]
fn api_client_tests_attaches_bearer_token() {
    let transport = ScriptedTransport::replying(
        200,
        json!({"data": {"email": "a@b.c", "username": "ana"}}),
    );
    let (client, _) = client_with(transport.clone(), Some("tok-1"));

    let profile = client.me().expect("profile should decode");
    assert_eq!(profile.username, "ana");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Get);
    assert_eq!(requests[0].url, "https://api.plantcare.test/api/auth/me");
    assert_eq!(requests[0].header("authorization"), Some("Bearer tok-1"));
}

#[test]
fn api_client_tests_sign_in_is_unauthenticated_and_returns_token() {
    let transport = ScriptedTransport::replying(200, json!({"data": {"token": "fresh"}}));
    let (client, _) = client_with(transport.clone(), None);

    let token = client
        .sign_in(&SignInRequest {
            email: "a@b.c".to_string(),
            password: "secret".to_string(),
        })
        .expect("sign in should succeed");
    assert_eq!(token.token, "fresh");

    let request = &transport.requests()[0];
    assert!(request.header("authorization").is_none());
    assert_eq!(
        request.body,
        RequestBody::Json(json!({"email": "a@b.c", "password": "secret"}))
    );
}

#[test]
fn api_client_tests_forbidden_is_auth_failure_and_leaves_session_to_caller() {
    let transport = ScriptedTransport::replying(403, json!({"message": "jwt expired"}));
    let (client, session) = client_with(transport, Some("stale"));

    let error = client.me().expect_err("403 must fail");
    assert!(matches!(error, ApiError::Unauthorized { status: 403, .. }));
    assert_eq!(error.server_message(), Some("jwt expired"));
    assert!(error.requires_reauth());
    assert!(session.has_token());
}

#[test]
fn api_client_tests_client_failure_surfaces_server_message() {
    let transport =
        ScriptedTransport::replying(400, json!({"error": "Email or password is wrong"}));
    let (client, _) = client_with(transport, None);

    let error = client
        .sign_in(&SignInRequest {
            email: "a@b.c".to_string(),
            password: "nope".to_string(),
        })
        .expect_err("400 must fail");
    assert_eq!(error.class(), FailureClass::Client);
    assert_eq!(error.user_message("Login failed."), "Email or password is wrong");
}

#[test]
fn api_client_tests_server_and_transport_failures_use_generic_messages() {
    let transport = ScriptedTransport::new(vec![
        Ok(plantcare_api::HttpResponse {
            status: 502,
            body: b"<html>bad gateway</html>".to_vec(),
        }),
        Err(TransportError::Timeout),
    ]);
    let (client, _) = client_with(transport, Some("tok"));

    let server = client.list_predictions().expect_err("502 must fail");
    assert_eq!(server.class(), FailureClass::Server);

    let transport_error = client.list_predictions().expect_err("timeout must fail");
    assert_eq!(transport_error.class(), FailureClass::Transport);
    assert_eq!(transport_error.user_message("ignored"), TRANSPORT_MESSAGE);
}

#[test]
fn api_client_tests_shape_mismatch_fails_closed() {
    let transport = ScriptedTransport::replying(200, json!({"token": "not-wrapped"}));
    let (client, _) = client_with(transport, None);

    let error = client
        .sign_in(&SignInRequest {
            email: "a@b.c".to_string(),
            password: "secret".to_string(),
        })
        .expect_err("unwrapped body must fail");
    assert!(matches!(error, ApiError::Contract(_)));
    assert_eq!(error.class(), FailureClass::Client);
}

#[test]
fn api_client_tests_submit_sends_multipart_and_encodes_detail_ids() {
    let transport = ScriptedTransport::new(vec![
        Ok(plantcare_api::HttpResponse::json(200, &json!({"data": {"id": 42}}))),
        Ok(plantcare_api::HttpResponse::json(
            200,
            &json!({"data": {
                "class_name": "Tomato_healthy",
                "confidence": 99.1,
                "prediction_time": "2025-05-01T10:00:00Z",
                "image": "aGk=",
                "next_info": {"name": "Healthy", "meaning": "ok", "suggestion": []}
            }}),
        )),
    ]);
    let (client, _) = client_with(transport.clone(), Some("tok"));

    let submitted = client
        .submit_prediction(FilePart {
            field: "image".to_string(),
            file_name: "leaf.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        })
        .expect("submit should succeed");
    assert_eq!(submitted.id, "42");

    client
        .get_prediction("a b")
        .expect("detail should decode");

    let requests = transport.requests();
    assert!(matches!(&requests[0].body, RequestBody::Multipart(parts) if parts[0].field == "image"));
    assert_eq!(requests[1].url, "https://api.plantcare.test/api/predict/a%20b");
}

#[test]
fn api_client_tests_rejects_unusable_base_urls_and_ids() {
    let transport = ScriptedTransport::new(vec![]);
    let session = std::sync::Arc::new(plantcare_session::MemorySessionStore::with_token("t"));
    assert!(matches!(
        ApiClient::new("ftp://example.test", transport.clone(), session.clone()),
        Err(ApiError::InvalidBaseUrl(_))
    ));

    let client = ApiClient::new("https://example.test/", transport.clone(), session)
        .expect("https base should be valid");
    for id in ["../etc", "..", ".", " .. "] {
        assert!(
            matches!(client.get_prediction(id), Err(ApiError::InvalidPath(_))),
            "{id:?} must not reach the network"
        );
    }
    assert!(transport.requests().is_empty());
}

#[test]
fn api_client_tests_history_skips_imageless_entries_before_decoding() {
    let transport = ScriptedTransport::replying(
        200,
        json!({"data": [
            {"id": 1, "disease_name": "Tomato_healthy", "confidence": 90.0,
             "date_predict": "2025-05-01T10:00:00Z", "image": "aGk="},
            {"id": 2, "disease_name": null, "image": ""},
            {"id": 3}
        ]}),
    );
    let (client, _) = client_with(transport, Some("tok"));

    let records = client.list_predictions().expect("imageless entries are skipped");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "1");
}

#[test]
fn api_client_tests_history_fails_closed_on_malformed_renderable_entry() {
    let transport = ScriptedTransport::replying(
        200,
        json!({"data": [{"id": 1, "disease_name": null, "image": "aGk="}]}),
    );
    let (client, _) = client_with(transport, Some("tok"));

    assert!(matches!(
        client.list_predictions(),
        Err(ApiError::Contract(_))
    ));
}
