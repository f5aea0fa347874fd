//! Normalization of raw, partially-trusted run summaries.
//!
//! Nothing here fails: missing counts default to zero and failure entries
//! without every required detail are dropped rather than reported with
//! blank fields.

use serde_json::Value as JsonValue;

use crate::{FailedRequest, FailureRecord, TestSummary};

/// Counts and failures extracted from one raw run summary.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NormalizedSummary {
    /// Assertion counts as reported by the engine.
    pub summary: TestSummary,
    /// Complete failure records, in engine order.
    pub failures: Vec<FailureRecord>,
    /// Number of raw failure entries, including dropped ones.
    pub raw_failure_count: usize,
}

impl NormalizedSummary {
    /// True when the engine reported no failure entries at all.
    pub fn success(&self) -> bool {
        self.raw_failure_count == 0
    }

    /// Number of raw failure entries that lacked required details.
    pub fn dropped_failures(&self) -> usize {
        self.raw_failure_count - self.failures.len()
    }
}

/// Normalizes a raw run summary (`{ stats: { tests }, failures: [...] }`).
pub fn normalize(raw: &JsonValue) -> NormalizedSummary {
    let total = count_at(raw, "/stats/tests/total");
    let failed = count_at(raw, "/stats/tests/failed");
    let raw_failures = raw
        .get("failures")
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let failures: Vec<FailureRecord> = raw_failures
        .iter()
        .filter_map(FailureRecord::from_raw)
        .collect();
    NormalizedSummary {
        summary: TestSummary::new(total, failed),
        failures,
        raw_failure_count: raw_failures.len(),
    }
}

impl FailureRecord {
    /// Extracts a failure record, or `None` when any required detail is
    /// missing or has the wrong shape.
    pub fn from_raw(raw: &JsonValue) -> Option<Self> {
        let error = raw.get("error")?;
        let request = raw.get("source")?.get("request")?;
        let name = non_empty_str(error.get("test")?)?;
        let message = non_empty_str(error.get("message")?)?;
        let method = non_empty_str(request.get("method")?)?;
        let url = url_to_string(request.get("url")?)?;
        Some(Self {
            name: name.to_string(),
            error: message.to_string(),
            request: FailedRequest {
                method: method.to_string(),
                url,
            },
        })
    }
}

/// Renders a request URL given either as a string or as a Postman URL object.
pub fn url_to_string(url: &JsonValue) -> Option<String> {
    match url {
        JsonValue::String(url) => (!url.is_empty()).then(|| url.clone()),
        JsonValue::Object(parts) => {
            if let Some(raw) = parts.get("raw").and_then(JsonValue::as_str) {
                if !raw.is_empty() {
                    return Some(raw.to_string());
                }
            }
            url_from_parts(url)
        }
        _ => None,
    }
}

fn url_from_parts(url: &JsonValue) -> Option<String> {
    let host = joined_segments(url.get("host")?, ".")?;
    if host.is_empty() {
        return None;
    }
    let mut rendered = String::new();
    if let Some(protocol) = url.get("protocol").and_then(JsonValue::as_str) {
        rendered.push_str(protocol.trim_end_matches(':'));
        rendered.push_str("://");
    }
    if let Some(auth) = user_info(url.get("auth")) {
        rendered.push_str(&auth);
        rendered.push('@');
    }
    rendered.push_str(&host);
    match url.get("port") {
        Some(JsonValue::String(port)) if !port.is_empty() => {
            rendered.push(':');
            rendered.push_str(port);
        }
        Some(JsonValue::Number(port)) => {
            rendered.push(':');
            rendered.push_str(&port.to_string());
        }
        _ => {}
    }
    if let Some(path) = url.get("path").and_then(|path| joined_segments(path, "/")) {
        if !path.is_empty() {
            if !path.starts_with('/') {
                rendered.push('/');
            }
            rendered.push_str(&path);
        }
    }
    let query = query_string(url.get("query"));
    if !query.is_empty() {
        rendered.push('?');
        rendered.push_str(&query);
    }
    if let Some(hash) = url.get("hash").and_then(JsonValue::as_str) {
        if !hash.is_empty() {
            rendered.push('#');
            rendered.push_str(hash);
        }
    }
    Some(rendered)
}

/// `user` or `user:password`, as Postman renders credentials in a URL.
fn user_info(auth: Option<&JsonValue>) -> Option<String> {
    let auth = auth?;
    let user = auth.get("user").and_then(non_empty_str)?;
    match auth.get("password").and_then(non_empty_str) {
        Some(password) => Some(format!("{user}:{password}")),
        None => Some(user.to_string()),
    }
}

fn joined_segments(value: &JsonValue, separator: &str) -> Option<String> {
    match value {
        JsonValue::String(value) => Some(value.clone()),
        JsonValue::Array(segments) => {
            let segments: Option<Vec<&str>> = segments.iter().map(JsonValue::as_str).collect();
            Some(segments?.join(separator))
        }
        _ => None,
    }
}

fn query_string(query: Option<&JsonValue>) -> String {
    let Some(params) = query.and_then(JsonValue::as_array) else {
        return String::new();
    };
    params
        .iter()
        .filter(|param| param.get("disabled").and_then(JsonValue::as_bool) != Some(true))
        .filter_map(|param| {
            let key = param.get("key").and_then(JsonValue::as_str)?;
            match param.get("value").and_then(JsonValue::as_str) {
                Some(value) => Some(format!("{key}={value}")),
                None => Some(key.to_string()),
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn non_empty_str(value: &JsonValue) -> Option<&str> {
    value.as_str().filter(|value| !value.is_empty())
}

fn count_at(raw: &JsonValue, pointer: &str) -> i64 {
    raw.pointer(pointer).and_then(count_value).unwrap_or(0)
}

fn count_value(value: &JsonValue) -> Option<i64> {
    if let Some(count) = value.as_i64() {
        return Some(count);
    }
    if value.is_u64() {
        return Some(i64::MAX);
    }
    value
        .as_f64()
        .filter(|count| count.is_finite())
        .map(|count| count.trunc() as i64)
}
