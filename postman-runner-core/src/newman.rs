//! [`CollectionEngine`] backed by the `newman` command-line runner.
//!
//! Each run spawns `newman run` with the JSON reporter exporting to a
//! temporary file. Output streams are captured rather than inherited so a
//! run never writes into an MCP stdio stream.

use std::path::Path;
use std::process::{Output, Stdio};

use serde_json::Value as JsonValue;
use tokio::process::Command;

use crate::runner::{CollectionEngine, EngineRunOptions, RunCompletion, DEFAULT_REPORTER};
use crate::EngineError;

/// How to launch newman.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewmanCliConfig {
    /// Program to execute, e.g. `newman` or `npx`.
    pub command: String,
    /// Arguments placed before `run`, e.g. `["newman"]` for `npx`.
    pub args: Vec<String>,
}

impl NewmanCliConfig {
    /// Creates a configuration that runs `command` with no leading args.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
        }
    }
}

impl Default for NewmanCliConfig {
    fn default() -> Self {
        Self::new("newman")
    }
}

/// Runs collections by spawning newman.
#[derive(Clone, Debug, Default)]
pub struct NewmanCliEngine {
    config: NewmanCliConfig,
}

impl NewmanCliEngine {
    /// Creates an engine for the given launch configuration.
    pub fn new(config: NewmanCliConfig) -> Self {
        Self { config }
    }

    /// The launch configuration.
    pub fn config(&self) -> &NewmanCliConfig {
        &self.config
    }
}

impl CollectionEngine for NewmanCliEngine {
    fn run(&self, options: EngineRunOptions, completion: RunCompletion) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            completion.complete(Err(EngineError::new(
                "newman runs require a tokio runtime",
            )));
            return;
        };
        let config = self.config.clone();
        handle.spawn(drive_newman(config, options, completion));
    }
}

async fn drive_newman(
    config: NewmanCliConfig,
    options: EngineRunOptions,
    mut completion: RunCompletion,
) {
    let report = match tempfile::Builder::new()
        .prefix("postman-runner-")
        .suffix(".json")
        .tempfile()
    {
        Ok(report) => report,
        Err(error) => {
            completion.complete(Err(EngineError::new(format!(
                "failed to create newman report file: {error}"
            ))));
            return;
        }
    };

    let mut command = newman_command(&config, &options, report.path());
    log::debug!("spawning newman: {:?}", command.as_std());
    let child = match command.spawn() {
        Ok(child) => child,
        Err(error) => {
            completion.complete(Err(EngineError::new(format!(
                "failed to start newman: {error}"
            ))));
            return;
        }
    };

    let output = tokio::select! {
        output = child.wait_with_output() => Some(output),
        () = completion.abandoned() => None,
    };
    let Some(output) = output else {
        log::warn!(
            "stopped newman run for '{}' after the caller stopped waiting",
            options.collection
        );
        return;
    };
    let outcome = match output {
        Ok(output) => read_outcome(report.path(), &output).await,
        Err(error) => Err(EngineError::new(format!("failed to wait for newman: {error}"))),
    };
    completion.complete(outcome);
}

pub(crate) fn newman_command(
    config: &NewmanCliConfig,
    options: &EngineRunOptions,
    report_path: &Path,
) -> Command {
    let mut command = Command::new(&config.command);
    command.args(&config.args).arg("run").arg(&options.collection);
    if let Some(environment) = &options.environment {
        command.arg("--environment").arg(environment);
    }
    if let Some(globals) = &options.globals {
        command.arg("--globals").arg(globals);
    }
    if let Some(iteration_count) = options.iteration_count {
        command
            .arg("--iteration-count")
            .arg(iteration_count.to_string());
    }
    command
        .arg("--reporters")
        .arg(reporter_list(&options.reporters))
        .arg("--reporter-json-export")
        .arg(report_path)
        .arg("--color")
        .arg("off");
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    command
}

/// The JSON reporter is always enabled because the report file is the
/// machine-readable summary.
fn reporter_list(reporters: &[String]) -> String {
    let mut reporters: Vec<&str> = reporters
        .iter()
        .map(String::as_str)
        .filter(|reporter| !reporter.is_empty())
        .collect();
    if !reporters.contains(&DEFAULT_REPORTER) {
        reporters.push(DEFAULT_REPORTER);
    }
    reporters.join(",")
}

async fn read_outcome(report_path: &Path, output: &Output) -> Result<JsonValue, EngineError> {
    // newman exits non-zero when assertions fail, so a readable report wins
    // over the exit status.
    if let Some(report) = read_report(report_path).await {
        return Ok(run_section(report));
    }
    Err(failure_message(output))
}

async fn read_report(report_path: &Path) -> Option<JsonValue> {
    let contents = tokio::fs::read(report_path).await.ok()?;
    if contents.is_empty() {
        return None;
    }
    match serde_json::from_slice(&contents) {
        Ok(report) => Some(report),
        Err(error) => {
            log::warn!("ignoring unreadable newman report: {error}");
            None
        }
    }
}

fn run_section(mut report: JsonValue) -> JsonValue {
    match report.get_mut("run") {
        Some(run) => run.take(),
        None => report,
    }
}

fn failure_message(output: &Output) -> EngineError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return EngineError::new(stderr);
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if let Some(line) = stdout.lines().map(str::trim).find(|line| line.starts_with("error:")) {
        return EngineError::new(line);
    }
    EngineError::new(format!("newman exited with {}", output.status))
}
