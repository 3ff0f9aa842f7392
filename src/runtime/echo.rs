// An in-memory `RuntimeAdapter` test double: no subprocess, no I/O. Used by
// the runner's own unit tests and anywhere else exercising the state machine
// without needing a real interpreter on PATH.

use std::collections::HashMap;

use anyhow::Result;
use serde_json::{Map, Value};

use super::{RuntimeAdapter, TestOutput};
use crate::extract::Test;

/// Echoes back a scripted response per expression, falling back to echoing
/// the expression itself (trimmed) when nothing was scripted for it.
#[derive(Debug, Default)]
pub struct EchoRuntime {
    started: bool,
    responses: HashMap<String, TestOutput>,
    pub init_calls: Vec<Map<String, Value>>,
    pub bound_vars: Vec<HashMap<String, Value>>,
    pub stopped: bool,
}

impl EchoRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a specific response for an expression, overriding the default
    /// echo-back behavior.
    pub fn on(mut self, expr: impl Into<String>, output: TestOutput) -> Self {
        self.responses.insert(expr.into(), output);
        self
    }
}

impl RuntimeAdapter for EchoRuntime {
    fn start(&mut self) -> Result<()> {
        self.started = true;
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.started
    }

    fn init_for_tests(&mut self, config: &Map<String, Value>) -> Result<()> {
        self.init_calls.push(config.clone());
        Ok(())
    }

    fn exec_test_expr(&mut self, test: &Test, _options: &Map<String, Value>) -> Result<TestOutput> {
        Ok(self
            .responses
            .get(&test.expr)
            .cloned()
            .unwrap_or_else(|| TestOutput::ok(test.expr.trim().to_string())))
    }

    fn handle_test_match(&mut self, vars: &HashMap<String, Value>) -> Result<()> {
        self.bound_vars.push(vars.clone());
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.started = false;
        self.stopped = true;
        Ok(())
    }
}
