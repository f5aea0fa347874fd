//! Public API types for running Postman collections and reporting results.

#![cfg_attr(not(test), deny(clippy::expect_used, clippy::unwrap_used))]

use serde::{Deserialize, Serialize};

pub mod error;
pub mod input;
pub mod newman;
pub mod normalize;
pub mod runner;
pub mod schema;

pub use error::{CallError, EngineError, ValidationError};
pub use input::{JsonObject, RunRequest};
pub use newman::{NewmanCliConfig, NewmanCliEngine};
pub use normalize::{normalize, NormalizedSummary};
pub use runner::{
    CollectionEngine, CollectionRunner, EngineRunOptions, RunCompletion, RunnerOptions,
};

/// Name of the MCP tool that runs a collection.
pub const RUN_COLLECTION_TOOL_NAME: &str = "run-collection";

/// Human-readable description advertised with the tool.
pub const RUN_COLLECTION_TOOL_DESCRIPTION: &str = "Run a Postman Collection using Newman";

/// Test counts for a collection run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    /// Number of assertions executed.
    pub total: i64,
    /// Number of failed assertions.
    pub failed: i64,
    /// `total - failed`; negative when the engine reports inconsistent counts.
    pub passed: i64,
}

impl TestSummary {
    /// Builds a summary, deriving `passed` from the two reported counts.
    pub fn new(total: i64, failed: i64) -> Self {
        Self {
            total,
            failed,
            passed: total.saturating_sub(failed),
        }
    }
}

/// The request that produced a failed assertion.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FailedRequest {
    /// HTTP method, as reported by the engine.
    pub method: String,
    /// Request URL rendered as a string.
    pub url: String,
}

/// One failed assertion extracted from the engine's run summary.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Name of the failing test.
    pub name: String,
    /// Assertion error message.
    pub error: String,
    /// The request under test.
    pub request: FailedRequest,
}

/// Wall-clock timings measured around the engine call.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TestTimings {
    /// ISO-8601 UTC timestamp taken before the engine was invoked.
    pub started: String,
    /// ISO-8601 UTC timestamp taken after the engine reported a summary.
    pub completed: String,
    /// `completed - started` in milliseconds.
    pub duration: i64,
}

/// Normalized result of one collection run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// True when the engine reported no failures.
    pub success: bool,
    /// Assertion counts.
    pub summary: TestSummary,
    /// Failures with complete details, in engine order.
    pub failures: Vec<FailureRecord>,
    /// Timings measured by the runner.
    pub timings: TestTimings,
}
