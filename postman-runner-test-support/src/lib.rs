use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ctor::ctor;
use postman_runner_core::{
    CollectionEngine, EngineError, EngineRunOptions, NewmanCliConfig, RunCompletion,
};
use serde_json::{json, Value as JsonValue};

#[ctor]
fn init_test_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default())
        .is_test(true)
        .try_init();
}

/// Engine that completes every run with the same outcome and records the
/// options it was given.
#[derive(Clone)]
pub struct StaticEngine {
    outcome: Result<JsonValue, EngineError>,
    calls: Arc<Mutex<Vec<EngineRunOptions>>>,
}

impl StaticEngine {
    pub fn summary(summary: JsonValue) -> Self {
        Self {
            outcome: Ok(summary),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            outcome: Err(EngineError::new(message)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<EngineRunOptions> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl CollectionEngine for StaticEngine {
    fn run(&self, options: EngineRunOptions, completion: RunCompletion) {
        self.calls.lock().expect("calls lock").push(options);
        completion.complete(self.outcome.clone());
    }
}

/// Engine that completes from a spawned task after yielding, like a real
/// asynchronous engine.
#[derive(Clone)]
pub struct DeferredEngine {
    summary: JsonValue,
}

impl DeferredEngine {
    pub fn new(summary: JsonValue) -> Self {
        Self { summary }
    }
}

impl CollectionEngine for DeferredEngine {
    fn run(&self, _options: EngineRunOptions, completion: RunCompletion) {
        let summary = self.summary.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            completion.complete(Ok(summary));
        });
    }
}

/// Engine that drops the completion handle without reporting anything.
#[derive(Clone, Copy, Default)]
pub struct SilentEngine;

impl CollectionEngine for SilentEngine {
    fn run(&self, _options: EngineRunOptions, completion: RunCompletion) {
        drop(completion);
    }
}

/// Engine that never completes; handles are kept alive until the engine is
/// dropped.
#[derive(Clone, Default)]
pub struct HangingEngine {
    pending: Arc<Mutex<Vec<RunCompletion>>>,
}

impl HangingEngine {
    /// Whether every pending run has been abandoned by its caller.
    pub fn all_abandoned(&self) -> bool {
        self.pending
            .lock()
            .expect("pending lock")
            .iter()
            .all(RunCompletion::is_abandoned)
    }
}

impl CollectionEngine for HangingEngine {
    fn run(&self, _options: EngineRunOptions, completion: RunCompletion) {
        self.pending.lock().expect("pending lock").push(completion);
    }
}

/// A raw failure entry in the shape newman reports.
pub fn raw_failure(test: &str, message: &str, method: &str, url: &str) -> JsonValue {
    json!({
        "error": {"name": "AssertionError", "test": test, "message": message},
        "source": {"name": test, "request": {"method": method, "url": url}}
    })
}

/// A raw run summary with the given counts and failure entries.
pub fn raw_summary(total: i64, failed: i64, failures: Vec<JsonValue>) -> JsonValue {
    json!({
        "stats": {"tests": {"total": total, "failed": failed}},
        "failures": failures
    })
}

/// Sets an environment variable for the guard's lifetime.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl EnvVarGuard {
    pub fn set(key: &'static str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value);
        Self { key, previous }
    }

    pub fn remove(key: &'static str) -> Self {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        Self { key, previous }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        match &self.previous {
            Some(value) => std::env::set_var(self.key, value),
            None => std::env::remove_var(self.key),
        }
    }
}

/// Writes a shell script standing in for the newman binary. Run it as
/// `sh <script>` so the freshly written file is never exec'd directly.
pub fn write_fake_newman(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("{body}\n")).expect("write fake newman");
    path
}

/// Launch configuration that runs `script` through `sh`.
pub fn fake_newman_config(script: &Path) -> NewmanCliConfig {
    let mut config = NewmanCliConfig::new("sh");
    config.args = vec![script.to_string_lossy().into_owned()];
    config
}

/// Script body that writes `report` to the `--reporter-json-export` path and
/// exits with `exit_code`.
pub fn fake_newman_report_body(report: &JsonValue, exit_code: i32) -> String {
    format!(
        r#"out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "--reporter-json-export" ]; then
    shift
    out="$1"
  fi
  shift
done
cat > "$out" <<'REPORT'
{report}
REPORT
exit {exit_code}"#
    )
}

/// A fresh temporary directory for fake binaries and fixtures.
pub fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("temp dir")
}
