//! Collection run adapter: drives a [`CollectionEngine`] and assembles a
//! [`TestResult`].

use std::sync::Arc;
use std::time::Duration;

use crate::normalize::normalize;
use crate::{EngineError, RunRequest, TestResult};

mod engine;
mod result;

pub use engine::{CollectionEngine, EngineRunOptions, RunCompletion, DEFAULT_REPORTER};

/// Runner-level options shared by every call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunnerOptions {
    /// Fails a run that has not completed after this long; `None` waits forever.
    pub timeout: Option<Duration>,
    /// Reporters requested from the engine.
    pub reporters: Vec<String>,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            reporters: vec![DEFAULT_REPORTER.to_string()],
        }
    }
}

impl RunnerOptions {
    /// Sets the run timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Runs collections through an engine, one independent run per call.
#[derive(Clone)]
pub struct CollectionRunner {
    engine: Arc<dyn CollectionEngine>,
    options: RunnerOptions,
}

impl std::fmt::Debug for CollectionRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionRunner")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl CollectionRunner {
    /// Creates a runner with default options.
    pub fn new(engine: Arc<dyn CollectionEngine>) -> Self {
        Self {
            engine,
            options: RunnerOptions::default(),
        }
    }

    /// Replaces the runner options.
    pub fn with_options(mut self, options: RunnerOptions) -> Self {
        self.options = options;
        self
    }

    /// The configured runner options.
    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    /// Runs one collection and normalizes the engine's summary.
    ///
    /// Only engine-level failures are returned as errors; malformed summaries
    /// degrade to default counts and fewer failure records.
    pub async fn run_collection(&self, request: &RunRequest) -> Result<TestResult, EngineError> {
        let options = EngineRunOptions::from_request(request, self.options.reporters.clone());
        let (completion, receiver) = RunCompletion::channel();

        let started = result::now_millis();
        log::debug!("starting collection run for '{}'", request.collection);
        self.engine.run(options, completion);

        let outcome = match self.options.timeout {
            Some(timeout) => tokio::time::timeout(timeout, receiver)
                .await
                .map_err(|_| {
                    EngineError::new(format!(
                        "collection run timed out after {}ms",
                        timeout.as_millis()
                    ))
                })?,
            None => receiver.await,
        };
        let summary = outcome.map_err(|_| {
            EngineError::new("collection engine finished without reporting a result")
        })??;
        let completed = result::now_millis();

        let normalized = normalize(&summary);
        if normalized.dropped_failures() > 0 {
            log::debug!(
                "dropped {} incomplete failure entries from '{}'",
                normalized.dropped_failures(),
                request.collection
            );
        }
        let result = result::test_result(normalized, result::timings(started, completed));
        log::info!(
            "collection '{}' finished: {} total, {} failed",
            request.collection,
            result.summary.total,
            result.summary.failed
        );
        Ok(result)
    }
}
