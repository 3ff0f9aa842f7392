// JSON reporter: accumulates every test into a `state::TestResults` as
// documents run, writes the aggregate as one JSON object on `finish()`.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};

use crate::extract::Test;
use crate::runner::{DocumentSummary, Reporter, TestOutcome};
use crate::state::{TestResult, TestResults};

pub struct JsonReporter {
    output_path: PathBuf,
    results: Mutex<TestResults>,
}

impl JsonReporter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path, results: Mutex::new(TestResults::new()) }
    }

    pub fn finish(&self) -> Result<()> {
        let file = File::create(&self.output_path)
            .with_context(|| format!("creating JSON report file {}", self.output_path.display()))?;
        let results = self.results.lock().unwrap();
        serde_json::to_writer_pretty(file, &*results).context("serializing test results to JSON")?;
        Ok(())
    }
}

impl Reporter for JsonReporter {
    fn on_test_start(&self, _test: &Test) {}

    fn on_test_end(&self, test: &Test, outcome: &TestOutcome) {
        let location = format!("{}:{}", test.filename, test.line);
        let result = if outcome.skipped {
            TestResult::skip(location)
        } else if outcome.passed {
            TestResult::pass(location)
        } else {
            TestResult::fail(location, outcome.message.clone().unwrap_or_else(|| "mismatch".to_string()))
        };
        self.results.lock().unwrap().add(result);
    }

    fn on_document_end(&self, _summary: &DocumentSummary) -> Result<()> {
        Ok(())
    }
}
