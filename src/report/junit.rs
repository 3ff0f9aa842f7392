// JUnit reporter: hand-built XML, one `<testsuite>` per document and one
// `<testcase>` per extracted test, written once via `finish()`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};

use crate::extract::Test;
use crate::runner::{DocumentSummary, Reporter, TestOutcome};
use crate::state::{TestResult, TestResults, TestStatus};

pub struct JunitReporter {
    output_path: PathBuf,
    results: Mutex<TestResults>,
}

impl JunitReporter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path, results: Mutex::new(TestResults::new()) }
    }

    pub fn finish(&self) -> Result<()> {
        let results = self.results.lock().unwrap();
        let metrics = results.metrics();

        let mut by_document: BTreeMap<&str, Vec<&TestResult>> = BTreeMap::new();
        for result in results.all() {
            let document = result.name.rsplit_once(':').map(|(file, _)| file).unwrap_or(&result.name);
            by_document.entry(document).or_default().push(result);
        }

        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!(
            "<testsuites name=\"groktest\" time=\"{:.3}\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\">\n",
            metrics.total_duration_ms as f64 / 1000.0,
            results.total(),
            results.failed(),
            results.skipped()
        ));

        for (document, cases) in &by_document {
            let failures = cases.iter().filter(|c| c.status == TestStatus::Fail).count();
            let skipped = cases.iter().filter(|c| c.status == TestStatus::Skip).count();

            xml.push_str(&format!(
                "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\">\n",
                escape(document),
                cases.len(),
                failures,
                skipped
            ));

            for case in cases {
                let line = case.name.rsplit_once(':').map(|(_, line)| line).unwrap_or("?");
                xml.push_str(&format!(
                    "    <testcase name=\"line {}\" classname=\"{}\">\n",
                    line,
                    escape(document)
                ));

                match case.status {
                    TestStatus::Fail => {
                        let msg = case.error_message.as_deref().unwrap_or("test failed");
                        xml.push_str(&format!(
                            "      <failure message=\"{}\" type=\"MismatchError\">{}</failure>\n",
                            escape(msg),
                            escape(msg)
                        ));
                    }
                    TestStatus::Skip => {
                        xml.push_str("      <skipped/>\n");
                    }
                    TestStatus::Pass => {}
                }

                xml.push_str("    </testcase>\n");
            }

            xml.push_str("  </testsuite>\n");
        }

        xml.push_str("</testsuites>\n");

        let mut file = File::create(&self.output_path)
            .with_context(|| format!("creating JUnit report file {}", self.output_path.display()))?;
        file.write_all(xml.as_bytes()).context("writing JUnit XML content")?;
        Ok(())
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

impl Reporter for JunitReporter {
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
