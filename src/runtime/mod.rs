// The runtime adapter contract: a narrow, language-agnostic interface the
// runner uses to dispatch a single test expression to a persistent
// subordinate interpreter process. Concurrency is not a concern here — the
// runner serializes every call onto the one document-owning task.

pub mod echo;
pub mod process;

use std::collections::HashMap;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::extract::Test;

/// Result of handing one test's expression to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutput {
    /// `0` on successful evaluation, `1` when the runtime raised/exited
    /// abnormally — `output` still carries the conventional error text the
    /// document is expected to compare against.
    pub code: u8,
    pub output: String,
    /// Abbreviated form of `output` (first line + last line), used by
    /// reporters that want a one-line summary of a runtime exception.
    pub short_error: Option<String>,
}

impl TestOutput {
    pub fn ok(output: impl Into<String>) -> Self {
        Self { code: 0, output: output.into(), short_error: None }
    }

    pub fn error(output: impl Into<String>) -> Self {
        let output = output.into();
        let short_error = Some(abbreviate(&output));
        Self { code: 1, output, short_error }
    }
}

/// First line + last line of a traceback-shaped string, joined by an
/// ellipsis when there's more in between.
fn abbreviate(text: &str) -> String {
    let mut lines = text.lines();
    let Some(first) = lines.next() else { return String::new() };
    match lines.next_back() {
        Some(last) if last != first => format!("{first} ... {last}"),
        _ => first.to_string(),
    }
}

/// A language runtime's adapter: owns a subordinate interpreter process,
/// exposes start/stop/exec/bind. The core never talks to the process
/// directly — every call is serialized through this trait by the runner.
pub trait RuntimeAdapter: Send {
    /// Spawn the underlying interpreter process. The runtime is usable
    /// until `stop()`.
    fn start(&mut self) -> Result<()>;

    /// True after a successful `start()`, false after `stop()` or a failed
    /// spawn.
    fn is_available(&self) -> bool;

    /// Apply runtime-specific initialization (a preamble script, injected
    /// globals). Called once after `start()` and before any test.
    fn init_for_tests(&mut self, config: &Map<String, Value>) -> Result<()>;

    /// Dispatch one test's expression and block for its complete output.
    fn exec_test_expr(&mut self, test: &Test, options: &Map<String, Value>) -> Result<TestOutput>;

    /// Bind a successful parse-match's named captures into the runtime's
    /// variable scope, so later tests in the same document can reference
    /// them.
    fn handle_test_match(&mut self, vars: &HashMap<String, Value>) -> Result<()>;

    /// Idempotent: release the interpreter process. Must be reachable on
    /// every termination path.
    fn stop(&mut self) -> Result<()>;
}

/// Resolve a `TestSpec::runtime_key` to a fresh, unstarted adapter.
pub fn create(runtime_key: &str) -> Box<dyn RuntimeAdapter> {
    match runtime_key {
        "shell" => Box::new(process::ProcessRuntime::shell()),
        _ => Box::new(process::ProcessRuntime::python()),
    }
}
