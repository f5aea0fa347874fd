use postman_runner_core::{normalize, FailedRequest, FailureRecord, TestSummary};
use postman_runner_test_support::{raw_failure, raw_summary};
use proptest::prelude::*;
use serde_json::{json, Value as JsonValue};

#[test]
fn extracts_complete_failure() {
    let raw = json!({
        "stats": {"tests": {"total": 5, "failed": 1}},
        "failures": [{
            "error": {"test": "T1", "message": "Expected 200 but got 404"},
            "source": {"request": {"method": "GET", "url": "https://api.example.com/test"}}
        }]
    });

    let normalized = normalize(&raw);
    assert_eq!(
        normalized.summary,
        TestSummary {
            total: 5,
            failed: 1,
            passed: 4
        }
    );
    assert_eq!(
        normalized.failures,
        vec![FailureRecord {
            name: "T1".to_string(),
            error: "Expected 200 but got 404".to_string(),
            request: FailedRequest {
                method: "GET".to_string(),
                url: "https://api.example.com/test".to_string(),
            },
        }]
    );
    assert!(!normalized.success());
}

#[test]
fn entry_without_required_fields_is_dropped_but_still_fails_run() {
    let raw = raw_summary(1, 1, vec![json!({"error": {}, "source": {}})]);

    let normalized = normalize(&raw);
    assert!(normalized.failures.is_empty());
    assert_eq!(normalized.raw_failure_count, 1);
    assert!(!normalized.success());
}

#[test]
fn entry_missing_request_url_is_dropped_without_touching_counts() {
    let mut missing_url = raw_failure("status", "boom", "GET", "https://example.test/a");
    missing_url["source"]["request"]
        .as_object_mut()
        .expect("request object")
        .remove("url");
    let failures = vec![
        raw_failure("first", "bad", "GET", "https://example.test/1"),
        missing_url,
        raw_failure("third", "worse", "DELETE", "https://example.test/3"),
    ];
    let raw = raw_summary(10, 3, failures.clone());

    let normalized = normalize(&raw);
    assert_eq!(normalized.failures.len(), failures.len() - 1);
    assert_eq!(normalized.summary.total, 10);
    assert_eq!(normalized.summary.failed, 3);
    let names: Vec<&str> = normalized
        .failures
        .iter()
        .map(|failure| failure.name.as_str())
        .collect();
    assert_eq!(names, vec!["first", "third"]);
}

#[test]
fn postman_url_objects_are_rendered() {
    let raw = raw_summary(
        1,
        1,
        vec![json!({
            "error": {"test": "status", "message": "expected 201"},
            "source": {"request": {
                "method": "POST",
                "url": {"protocol": "http", "host": ["localhost"], "port": "3000", "path": ["items"]}
            }}
        })],
    );

    let normalized = normalize(&raw);
    assert_eq!(normalized.failures[0].request.url, "http://localhost:3000/items");
}

#[test]
fn missing_or_non_numeric_counts_default_to_zero() {
    let normalized = normalize(&json!({"stats": {"tests": {"total": "many"}}}));
    assert_eq!(normalized.summary, TestSummary::default());
    assert!(normalized.success());

    let normalized = normalize(&JsonValue::Null);
    assert_eq!(normalized.summary, TestSummary::default());
    assert!(normalized.failures.is_empty());
}

#[test]
fn inconsistent_counts_produce_negative_passed() {
    let normalized = normalize(&raw_summary(1, 4, Vec::new()));
    assert_eq!(normalized.summary.passed, -3);
}

#[test]
fn non_array_failures_count_as_none() {
    let normalized = normalize(&json!({
        "stats": {"tests": {"total": 2, "failed": 0}},
        "failures": {"not": "an array"}
    }));
    assert_eq!(normalized.raw_failure_count, 0);
    assert!(normalized.success());
}

fn arbitrary_json() -> impl Strategy<Value = JsonValue> {
    let leaf = prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::Bool),
        any::<i64>().prop_map(|value| json!(value)),
        any::<f64>().prop_map(|value| json!(value)),
        "[a-z]{0,8}".prop_map(JsonValue::String),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(JsonValue::Array),
            prop::collection::btree_map(
                prop_oneof![
                    Just("stats".to_string()),
                    Just("tests".to_string()),
                    Just("total".to_string()),
                    Just("failed".to_string()),
                    Just("failures".to_string()),
                    Just("error".to_string()),
                    Just("source".to_string()),
                    Just("request".to_string()),
                    Just("test".to_string()),
                    Just("message".to_string()),
                    Just("method".to_string()),
                    Just("url".to_string()),
                    "[a-z]{1,6}",
                ],
                inner,
                0..6,
            )
            .prop_map(|map| JsonValue::Object(map.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn normalize_is_total_and_idempotent(raw in arbitrary_json()) {
        let first = normalize(&raw);
        let second = normalize(&raw);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.failures.len() <= first.raw_failure_count);
        prop_assert_eq!(first.summary.passed, first.summary.total.saturating_sub(first.summary.failed));
    }

    #[test]
    fn failure_order_is_preserved(names in prop::collection::vec("[a-z]{1,8}", 0..8)) {
        let failures = names
            .iter()
            .map(|name| raw_failure(name, "failed", "GET", "https://example.test"))
            .collect();
        let normalized = normalize(&raw_summary(names.len() as i64, names.len() as i64, failures));
        let extracted: Vec<String> = normalized.failures.into_iter().map(|failure| failure.name).collect();
        prop_assert_eq!(extracted, names);
    }
}
