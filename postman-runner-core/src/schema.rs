//! The `run-collection` input schema.
//!
//! One schema is generated from [`RunRequest`]. It is advertised to MCP
//! clients as-is and compiled into the validator that checks tool arguments.

use std::sync::{Arc, OnceLock};

use jsonschema::{draft202012, Validator};
use schemars::{generate::SchemaSettings, Schema};
use serde_json::Value as JsonValue;

use crate::input::{JsonObject, RunRequest};

/// Returns the cached input schema for the `run-collection` tool.
pub fn run_request_schema() -> Arc<JsonObject> {
    static SCHEMA: OnceLock<Arc<JsonObject>> = OnceLock::new();
    SCHEMA
        .get_or_init(|| {
            let mut settings = SchemaSettings::draft2020_12();
            settings.inline_subschemas = true;
            let schema = settings.into_generator().into_root_schema_for::<RunRequest>();
            Arc::new(root_object(schema))
        })
        .clone()
}

/// The compiled validator for [`run_request_schema`].
pub(crate) fn run_request_validator() -> Result<&'static Validator, String> {
    static VALIDATOR: OnceLock<Validator> = OnceLock::new();
    if let Some(validator) = VALIDATOR.get() {
        return Ok(validator);
    }
    let schema = JsonValue::Object(run_request_schema().as_ref().clone());
    let validator = draft202012::new(&schema)
        .map_err(|error| format!("run-collection schema does not compile: {error}"))?;
    Ok(VALIDATOR.get_or_init(|| validator))
}

/// Tool descriptors need an object schema; a boolean root becomes an
/// unconstrained object.
fn root_object(schema: Schema) -> JsonObject {
    match schema.to_value() {
        JsonValue::Object(object) => object,
        other => {
            log::warn!("run-collection schema root is not an object: {other}");
            let mut object = JsonObject::new();
            object.insert("type".to_string(), JsonValue::String("object".to_string()));
            object
        }
    }
}
