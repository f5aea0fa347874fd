//! `run-collection` tool arguments and their validation.

use jsonschema::error::ValidationErrorKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::ValidationError;
use crate::schema::{run_request_schema, run_request_validator};

/// A JSON object, as carried in MCP tool arguments.
pub type JsonObject = Map<String, JsonValue>;

/// Arguments accepted by the `run-collection` tool.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    /// Path or URL to the Postman collection
    #[schemars(length(min = 1))]
    pub collection: String,
    /// Optional path or URL to environment file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Optional path or URL to globals file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub globals: Option<String>,
    /// Optional number of iterations to run
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 4294967295u32))]
    pub iteration_count: Option<u32>,
}

impl RunRequest {
    /// Creates a request for a collection with no optional arguments.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            ..Self::default()
        }
    }

    /// Validates MCP tool arguments; missing arguments count as an empty object.
    pub fn from_arguments(arguments: Option<JsonObject>) -> Result<Self, ValidationError> {
        Self::from_value(arguments.map(JsonValue::Object).unwrap_or(JsonValue::Null))
    }

    /// Validates an arbitrary untrusted value into a request.
    ///
    /// Unknown fields are ignored.
    pub fn from_value(value: JsonValue) -> Result<Self, ValidationError> {
        let mut arguments = match value {
            JsonValue::Object(arguments) => arguments,
            JsonValue::Null => JsonObject::new(),
            _ => return Err(ValidationError::new("arguments must be an object")),
        };
        validate_arguments(&arguments)?;
        integral_floats_as_integers(&run_request_schema(), &mut arguments);
        serde_json::from_value(JsonValue::Object(arguments)).map_err(|error| {
            ValidationError::new(format!("invalid run-collection arguments: {error}"))
        })
    }
}

/// Runs the compiled schema over `arguments` and reports the first failing
/// field in schema property order.
fn validate_arguments(arguments: &JsonObject) -> Result<(), ValidationError> {
    let validator = run_request_validator().map_err(ValidationError::new)?;
    let schema = run_request_schema();
    let instance = JsonValue::Object(arguments.clone());
    let first = validator
        .iter_errors(&instance)
        .map(|error| describe(&schema, &error))
        .min_by_key(|error| property_position(&schema, error.field.as_deref()));
    match first {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn describe(schema: &JsonObject, error: &jsonschema::ValidationError<'_>) -> ValidationError {
    let path = error.instance_path.to_string();
    let name = path.trim_start_matches('/');
    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let property = property.as_str().unwrap_or_default();
            ValidationError::for_field(property, format!("{property} parameter is required"))
        }
        ValidationErrorKind::Type { .. } => {
            let expected = declared_type(schema, name).unwrap_or("valid value");
            let article = if expected.starts_with(['a', 'e', 'i', 'o', 'u']) {
                "an"
            } else {
                "a"
            };
            ValidationError::for_field(name, format!("{name} must be {article} {expected}"))
        }
        ValidationErrorKind::MinLength { .. } => {
            ValidationError::for_field(name, format!("{name} must not be empty"))
        }
        ValidationErrorKind::Minimum { limit } => {
            let bound = match limit.as_i64() {
                Some(limit) => (limit - 1).to_string(),
                None => (limit.as_f64().unwrap_or_default() - 1.0).to_string(),
            };
            ValidationError::for_field(name, format!("{name} must be greater than {bound}"))
        }
        ValidationErrorKind::Maximum { limit } => {
            ValidationError::for_field(name, format!("{name} must be at most {limit}"))
        }
        _ => ValidationError::for_field(name, format!("{name} is invalid: {error}")),
    }
}

fn property_schema<'a>(schema: &'a JsonObject, name: &str) -> Option<&'a JsonValue> {
    schema
        .get("properties")
        .and_then(JsonValue::as_object)
        .and_then(|properties| properties.get(name))
}

/// The first non-null `type` a property declares.
fn declared_type<'a>(schema: &'a JsonObject, name: &str) -> Option<&'a str> {
    match property_schema(schema, name)?.get("type")? {
        JsonValue::String(ty) => Some(ty.as_str()),
        JsonValue::Array(types) => types
            .iter()
            .filter_map(JsonValue::as_str)
            .find(|ty| *ty != "null"),
        _ => None,
    }
}

fn property_position(schema: &JsonObject, field: Option<&str>) -> usize {
    schema
        .get("properties")
        .and_then(JsonValue::as_object)
        .and_then(|properties| {
            let field = field?;
            properties.keys().position(|name| name == field)
        })
        .unwrap_or(usize::MAX)
}

/// JSON Schema `integer` admits `2.0`; serde's `u32` does not.
fn integral_floats_as_integers(schema: &JsonObject, arguments: &mut JsonObject) {
    for (name, value) in arguments.iter_mut() {
        if declared_type(schema, name) != Some("integer") {
            continue;
        }
        let integral = value
            .as_f64()
            .filter(|number| value.is_f64() && number.fract() == 0.0 && *number >= 0.0);
        if let Some(number) = integral {
            *value = JsonValue::from(number as u64);
        }
    }
}
