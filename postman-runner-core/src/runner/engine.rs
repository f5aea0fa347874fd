use serde_json::Value as JsonValue;
use tokio::sync::oneshot;

use crate::{EngineError, RunRequest};

/// Reporter requested from the engine when none is configured.
pub const DEFAULT_REPORTER: &str = "json";

/// Options handed to a [`CollectionEngine`] for a single run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineRunOptions {
    /// Path or URL to the collection.
    pub collection: String,
    /// Optional path or URL to an environment file.
    pub environment: Option<String>,
    /// Optional path or URL to a globals file.
    pub globals: Option<String>,
    /// Optional iteration count; the engine default applies when unset.
    pub iteration_count: Option<u32>,
    /// Reporters the engine should enable.
    pub reporters: Vec<String>,
}

impl EngineRunOptions {
    /// Builds engine options from a validated request, passing fields through unchanged.
    pub fn from_request(request: &RunRequest, reporters: Vec<String>) -> Self {
        Self {
            collection: request.collection.clone(),
            environment: request.environment.clone(),
            globals: request.globals.clone(),
            iteration_count: request.iteration_count,
            reporters,
        }
    }
}

pub(crate) type RunOutcome = Result<JsonValue, EngineError>;

/// Completion callback for one engine run.
///
/// `complete` consumes the handle, so a run settles at most once. Dropping
/// the handle without completing it fails the run.
#[derive(Debug)]
pub struct RunCompletion {
    sender: oneshot::Sender<RunOutcome>,
}

impl RunCompletion {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<RunOutcome>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }

    /// Reports the raw run summary, or the error that prevented the run.
    pub fn complete(self, outcome: Result<JsonValue, EngineError>) {
        if self.sender.send(outcome).is_err() {
            log::debug!("collection run result arrived after the caller stopped waiting");
        }
    }

    /// Returns true once the caller has stopped waiting for this run.
    pub fn is_abandoned(&self) -> bool {
        self.sender.is_closed()
    }

    /// Resolves when the caller stops waiting, e.g. after a timeout.
    pub async fn abandoned(&mut self) {
        self.sender.closed().await;
    }
}

/// A collection-execution engine driven through a completion callback.
pub trait CollectionEngine: Send + Sync {
    /// Starts a run. Implementations must eventually call
    /// [`RunCompletion::complete`] or drop the handle.
    fn run(&self, options: EngineRunOptions, completion: RunCompletion);
}
