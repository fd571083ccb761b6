//! Integration tests for list filtering and display helpers.

use plantcare_core::{
    CoreError, PredictionSummary, decode_envelope, decode_renderable_list, format_confidence,
    humanize_label, retain_renderable,
};

fn summary(id: &str, image: Option<&str>) -> PredictionSummary {
    PredictionSummary {
        id: id.to_string(),
        disease_name: "Corn_(maize)___Common_rust_".to_string(),
        description: None,
        confidence: 75.0,
        date_predict: "2025-05-01T10:00:00Z".to_string(),
        image: image.map(str::to_string),
    }
}

#[test]
fn record_filter_tests_drops_absent_and_blank_images_keeping_order() {
    let kept = retain_renderable(vec![
        summary("1", Some("aGk=")),
        summary("2", None),
        summary("3", Some("   ")),
        summary("4", Some("b2s=")),
    ]);

    let ids: Vec<&str> = kept.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "4"]);
}

#[test]
fn record_filter_tests_list_with_invalid_record_fails_closed() {
    let raw = br#"{"data": [
        {"id": 1, "disease_name": "a", "confidence": 10.0, "date_predict": "x", "image": "aGk="},
        {"id": "", "disease_name": "b", "confidence": 10.0, "date_predict": "x", "image": "aGk="}
    ]}"#;

    let result: Result<Vec<PredictionSummary>, CoreError> = decode_envelope(raw);
    assert!(matches!(result, Err(CoreError::InvalidContract(_))));
}

#[test]
fn record_filter_tests_display_helpers() {
    assert_eq!(humanize_label("Tomato_Leaf_Mold"), "Tomato Leaf Mold");
    assert_eq!(format_confidence(99.999), "100.00%");
    assert_eq!(format_confidence(0.0), "0.00%");
}

#[test]
fn record_filter_tests_list_skips_imageless_entries_before_typed_decode() {
    let raw = br#"{"data": [
        {"id": 1, "disease_name": "Tomato___Late_blight", "confidence": 97.5,
         "date_predict": "2025-05-01T10:00:00Z", "image": "aGk="},
        {"id": 2, "disease_name": null, "image": ""},
        {"id": 3}
    ]}"#;

    let list = decode_renderable_list::<PredictionSummary>(raw).expect("list should decode");

    assert_eq!(list.skipped, 2);
    assert_eq!(list.records.len(), 1);
    assert_eq!(list.records[0].id, "1");
}

#[test]
fn record_filter_tests_list_rejects_kept_entry_with_bad_fields() {
    let raw = br#"{"data": [{"id": 9, "disease_name": null, "image": "aGk="}]}"#;

    assert!(matches!(
        decode_renderable_list::<PredictionSummary>(raw),
        Err(CoreError::Decode(_))
    ));
}
