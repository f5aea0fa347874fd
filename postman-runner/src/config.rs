use std::time::Duration;

use postman_runner_core::{JsonObject, NewmanCliConfig, RunRequest, RunnerOptions};
use serde_json::Value as JsonValue;

use crate::cli::Cli;

pub(super) fn newman_config(cli: &Cli) -> NewmanCliConfig {
    let mut config = NewmanCliConfig::new(cli.newman_command.clone());
    config.args = cli.newman_args.clone();
    config
}

pub(super) fn runner_options(cli: &Cli) -> Result<RunnerOptions, String> {
    let options = RunnerOptions::default();
    match cli.timeout_secs {
        None => Ok(options),
        Some(0) => Err("timeout-secs must be greater than 0".to_string()),
        Some(secs) => Ok(options.with_timeout(Duration::from_secs(secs))),
    }
}

/// Builds a run request from command-line values, checked by the same
/// validator as `run-collection` tool calls.
pub(super) fn run_request(
    collection: &str,
    environment: Option<&str>,
    globals: Option<&str>,
    iteration_count: Option<i64>,
) -> Result<RunRequest, String> {
    let mut arguments = JsonObject::new();
    arguments.insert(
        "collection".to_string(),
        JsonValue::String(collection.to_string()),
    );
    if let Some(environment) = environment {
        arguments.insert(
            "environment".to_string(),
            JsonValue::String(environment.to_string()),
        );
    }
    if let Some(globals) = globals {
        arguments.insert("globals".to_string(), JsonValue::String(globals.to_string()));
    }
    if let Some(iteration_count) = iteration_count {
        arguments.insert("iterationCount".to_string(), iteration_count.into());
    }
    RunRequest::from_arguments(Some(arguments)).map_err(|error| error.to_string())
}
