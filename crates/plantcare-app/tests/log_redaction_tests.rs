//! Integration tests for log redaction.

use plantcare_app::redact_sensitive;

#[test]
fn log_redaction_tests_hides_bearer_credentials_but_keeps_scheme() {
    let redacted = redact_sensitive("authorization=Bearer abc123 path=/api/auth/me");

    assert_eq!(redacted, "authorization=Bearer <redacted> path=/api/auth/me");
}

#[test]
fn log_redaction_tests_scrubs_json_password_and_token_fields() {
    let raw = r#"{"email":"ana@example.test","password":"hunter2","token":"eyJhbGci"}"#;
    let redacted = redact_sensitive(raw);

    assert!(!redacted.contains("hunter2"));
    assert!(!redacted.contains("eyJhbGci"));
    assert!(redacted.contains("ana@example.test"));
    assert_eq!(redacted.matches("<redacted>").count(), 2);
}

#[test]
fn log_redaction_tests_scrubs_bare_bearer_and_header_style_values() {
    assert_eq!(
        redact_sensitive("sent Authorization: Bearer xyz to server"),
        "sent Authorization: Bearer <redacted> to server"
    );
    assert_eq!(redact_sensitive("Bearer   xyz"), "Bearer   <redacted>");
    assert_eq!(
        redact_sensitive("access_token=abc&next=1"),
        "access_token=<redacted>&next=1"
    );
}
