//! Text envelopes returned from `run-collection` calls.
//!
//! Each response carries exactly one text element holding compact JSON:
//! either the serialized [`TestResult`] or `{"error": ..., "success": false}`.

use postman_runner_core::TestResult;
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::json;

pub(super) fn success(result: &TestResult) -> CallToolResult {
    success_inner(result, serialize_compact)
}

pub(super) fn success_inner<T: Serialize>(
    value: &T,
    serialize: fn(&T) -> Result<String, String>,
) -> CallToolResult {
    match serialize(value) {
        Ok(text) => {
            let mut result = CallToolResult::success(vec![Content::text(text)]);
            result.is_error = None;
            result
        }
        Err(error) => failure(&format!("failed to serialize test result: {error}")),
    }
}

pub(super) fn failure(message: &str) -> CallToolResult {
    let payload = json!({"error": message, "success": false});
    CallToolResult::error(vec![Content::text(payload.to_string())])
}

pub(super) fn serialize_compact<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|error| error.to_string())
}
