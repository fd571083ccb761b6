//! Integration tests for the shared fetch lifecycle of protected pages.

mod common;

use common::{RoutedTransport, client_with, detail_body, history_body, profile_body};
use plantcare_api::{ApiError, MISSING_TOKEN_MESSAGE, Method, TransportError};
use plantcare_session::SessionStore;
use plantcare_ui::{
    DetailPage, FetchPage, HistoryPage, HomePage, NotificationLevel, Route, Router, Screen,
    ViewState,
};
use serde_json::json;

#[test]
fn page_lifecycle_tests_protected_pages_redirect_without_network_when_signed_out() {
    let transport = RoutedTransport::new();
    let (client, _) = client_with(transport.clone(), None);

    for effects in [
        HomePage::new().mount(&client),
        HistoryPage::new().mount(&client),
        DetailPage::new("42").mount(&client),
    ] {
        assert_eq!(effects.navigations(), vec![&Route::Login]);
        assert_eq!(effects.notifications()[0].message, MISSING_TOKEN_MESSAGE);
    }
    assert!(transport.requests().is_empty());
}

#[test]
fn page_lifecycle_tests_history_never_keeps_records_without_image() {
    let transport = RoutedTransport::new().on(Method::Get, "/api/predict", 200, history_body());
    let (client, _) = client_with(transport, Some("tok"));

    let mut page = HistoryPage::new();
    let effects = page.mount(&client);

    assert!(effects.is_empty());
    let records = page.state().ready().expect("history should be ready");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "1");
}

#[test]
fn page_lifecycle_tests_fully_filtered_history_is_empty() {
    let transport = RoutedTransport::new().on(
        Method::Get,
        "/api/predict",
        200,
        json!({"data": [{
            "id": 9,
            "disease_name": "Grape___Esca",
            "confidence": 40.0,
            "date_predict": "2025-05-01T10:00:00Z",
            "image": null
        }]}),
    );
    let (client, _) = client_with(transport, Some("tok"));

    let mut page = HistoryPage::new();
    page.mount(&client);
    assert_eq!(page.state(), &ViewState::Empty);
}

#[test]
fn page_lifecycle_tests_forbidden_clears_session_and_redirects_exactly_once() {
    let transport = RoutedTransport::new()
        .on(Method::Get, "/api/predict", 403, json!({"message": "jwt expired"}))
        .on(Method::Get, "/api/auth/me", 200, profile_body());
    let (client, session) = client_with(transport.clone(), Some("stale"));

    let mut router = Router::new(client);
    let notifications = router.open(Route::History);

    assert!(!session.has_token());
    assert_eq!(router.navigator().current(), &Route::Login);
    let redirects = router
        .navigator()
        .visited()
        .iter()
        .filter(|route| **route == Route::Login)
        .count();
    // The router starts on the login form, so one redirect makes two entries.
    assert_eq!(redirects, 2);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert_eq!(transport.paths(), vec!["/api/predict".to_string()]);
}

#[test]
fn page_lifecycle_tests_shell_auth_failure_also_redirects() {
    let transport = RoutedTransport::new()
        .on(Method::Get, "/api/predict", 200, history_body())
        .on(Method::Get, "/api/auth/me", 401, json!({}));
    let (client, session) = client_with(transport, Some("stale"));

    let mut router = Router::new(client);
    let notifications = router.open(Route::Home);

    assert!(!session.has_token());
    assert!(matches!(router.screen(), Screen::Login(_)));
    assert_eq!(notifications.len(), 1);
}

#[test]
fn page_lifecycle_tests_non_auth_failures_keep_session() {
    let transport =
        RoutedTransport::new().on(Method::Get, "/api/predict", 500, json!({"message": "boom"}));
    let (client, session) = client_with(transport, Some("tok"));

    let mut page = HistoryPage::new();
    let effects = page.mount(&client);

    assert!(session.has_token());
    assert!(effects.navigations().is_empty());
    assert_eq!(
        page.state().error(),
        Some("Server error. Please try again later.")
    );
}

#[test]
fn page_lifecycle_tests_detail_reload_refetches_identical_content() {
    let transport = RoutedTransport::new()
        .on(Method::Get, "/api/predict/42", 200, detail_body())
        .on(Method::Get, "/api/auth/me", 200, profile_body());
    let (client, _) = client_with(transport.clone(), Some("tok"));

    let mut router = Router::new(client);
    router.open(Route::HistoryDetail("42".to_string()));
    let Screen::Detail(first) = router.screen().clone() else {
        panic!("detail route should mount the detail page");
    };
    assert!(first.state().ready().is_some());

    let notifications = router.reload();
    let Screen::Detail(second) = router.screen() else {
        panic!("reload should stay on the detail page");
    };

    assert!(notifications.is_empty());
    assert_eq!(second.state(), first.state());
    assert_eq!(router.navigator().current(), &Route::HistoryDetail("42".to_string()));
    assert_eq!(
        transport.paths(),
        vec!["/api/predict/42", "/api/auth/me", "/api/predict/42", "/api/auth/me"]
    );
}

#[test]
fn page_lifecycle_tests_history_skips_imageless_record_with_bad_fields() {
    let transport = RoutedTransport::new().on(
        Method::Get,
        "/api/predict",
        200,
        json!({"data": [
            {
                "id": 1,
                "disease_name": "Tomato___Late_blight",
                "confidence": 97.5,
                "date_predict": "2025-05-01T10:00:00Z",
                "image": "aGk="
            },
            {"id": 2, "disease_name": null, "image": ""}
        ]}),
    );
    let (client, _) = client_with(transport, Some("tok"));

    let mut page = HistoryPage::new();
    let effects = page.mount(&client);

    assert!(effects.is_empty());
    let records = page.state().ready().expect("history should be ready");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "1");
}

#[test]
fn page_lifecycle_tests_dot_segment_detail_id_never_reaches_list_endpoint() {
    let transport = RoutedTransport::new().on(Method::Get, "/api/predict", 200, history_body());
    let (client, session) = client_with(transport.clone(), Some("tok"));

    for id in ["..", "."] {
        let mut page = DetailPage::new(id);
        let effects = page.mount(&client);

        assert!(effects.navigations().is_empty());
        assert!(page.state().error().is_some());
    }
    assert!(transport.requests().is_empty());
    assert!(session.has_token());
}

#[test]
fn page_lifecycle_tests_blank_detail_id_is_empty_without_request() {
    let transport = RoutedTransport::new();
    let (client, _) = client_with(transport.clone(), Some("tok"));

    let mut page = DetailPage::new("  ");
    let effects = page.mount(&client);

    assert!(effects.is_empty());
    assert_eq!(page.state(), &ViewState::Empty);
    assert!(transport.requests().is_empty());
}

#[test]
fn page_lifecycle_tests_stale_results_are_discarded_silently() {
    let transport = RoutedTransport::new();
    let (_, session) = client_with(transport, Some("tok"));

    let mut page: FetchPage<Vec<u32>> = FetchPage::new(true, "failed");
    let first = page.begin(session.as_ref()).expect("token present");
    let second = page.begin(session.as_ref()).expect("token present");

    let effects = page.settle(
        first,
        Err(ApiError::Transport(TransportError::Timeout)),
        session.as_ref(),
        Vec::is_empty,
    );
    assert!(effects.is_empty());
    assert!(page.state().is_loading());

    page.settle(second, Ok(vec![7]), session.as_ref(), Vec::is_empty);
    assert_eq!(page.state(), &ViewState::Ready(vec![7]));

    let third = page.begin(session.as_ref()).expect("token present");
    page.unmount();
    let effects = page.settle(
        third,
        Err(ApiError::Unauthorized {
            status: 403,
            message: None,
        }),
        session.as_ref(),
        Vec::is_empty,
    );
    assert!(effects.is_empty());
    assert!(session.has_token());
    assert_eq!(page.state(), &ViewState::Idle);
}
