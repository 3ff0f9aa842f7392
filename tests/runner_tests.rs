// End-to-end coverage for `run_document` through the public API: a real
// `/bin/sh` runtime backs every case here (rather than a mocked adapter, not
// reachable from outside the crate) so these exercise the full front
// matter -> extract -> runtime -> matching pipeline, not just the runner's
// internal state machine already covered by its own unit tests.

use std::sync::Mutex;

use groktest::config::Config;
use groktest::extract::Test;
use groktest::runner::{run_document, DocumentSummary, Reporter, TestOutcome};
use serde_json::json;

#[derive(Default)]
struct RecordingReporter {
    events: Mutex<Vec<(String, bool, bool)>>,
}

impl Reporter for RecordingReporter {
    fn on_test_start(&self, _test: &Test) {}

    fn on_test_end(&self, test: &Test, outcome: &TestOutcome) {
        self.events.lock().unwrap().push((test.expr.clone(), outcome.passed, outcome.skipped));
    }

    fn on_document_end(&self, _summary: &DocumentSummary) -> anyhow::Result<()> {
        Ok(())
    }
}

fn shell_front_matter() -> &'static str {
    "---\ntest-type = \"shell\"\n---\n"
}

#[test]
fn a_passing_shell_example_reports_zero_failures() {
    let reporter = RecordingReporter::default();
    let content = format!("{}$ echo hi\nhi\n", shell_front_matter());
    let summary = run_document("doc.md", &content, &Config::default(), &json!({}), &json!({}), &reporter).unwrap();
    assert_eq!(summary.tested, 1);
    assert_eq!(summary.failed, 0);
}

#[test]
fn a_mismatched_shell_example_is_reported_as_failed() {
    let reporter = RecordingReporter::default();
    let content = format!("{}$ echo hi\nbye\n", shell_front_matter());
    let summary = run_document("doc.md", &content, &Config::default(), &json!({}), &json!({}), &reporter).unwrap();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failed_locations, vec![("doc.md".to_string(), 4)]);
}

#[test]
fn skip_option_prevents_the_test_from_running() {
    let reporter = RecordingReporter::default();
    let content = format!("{}$ echo hi  # +skip\nbye\n", shell_front_matter());
    let summary = run_document("doc.md", &content, &Config::default(), &json!({}), &json!({}), &reporter).unwrap();
    assert_eq!(summary.tested, 0);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 0);
}

#[test]
fn fails_option_passes_when_the_raw_match_would_otherwise_fail() {
    let reporter = RecordingReporter::default();
    let content = format!("{}$ echo hi  # +fails\nbye\n", shell_front_matter());
    let summary = run_document("doc.md", &content, &Config::default(), &json!({}), &json!({}), &reporter).unwrap();
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.tested, 1);
}

#[test]
fn fail_fast_option_skips_remaining_tests_after_a_failure() {
    let reporter = RecordingReporter::default();
    let content = format!(
        "{}$ echo hi  # +fail-fast\nbye\n\n$ echo second\nsecond\n",
        shell_front_matter()
    );
    let summary = run_document("doc.md", &content, &Config::default(), &json!({}), &json!({}), &reporter).unwrap();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 1);
}

#[test]
fn cli_level_options_override_document_defaults_via_three_tier_resolve() {
    let reporter = RecordingReporter::default();
    let content = format!("{}$ echo hi\nbye\n", shell_front_matter());
    let cli_config = json!({"options": "+fails"});
    let summary = run_document("doc.md", &content, &Config::default(), &json!({}), &cli_config, &reporter).unwrap();
    assert_eq!(summary.failed, 0);
}

#[test]
fn a_document_with_no_examples_reports_zero_tested_and_calls_on_document_end() {
    let reporter = RecordingReporter::default();
    let summary =
        run_document("doc.md", "Just prose, no examples.\n", &Config::default(), &json!({}), &json!({}), &reporter)
            .unwrap();
    assert_eq!(summary.tested, 0);
    assert_eq!(summary.failed, 0);
}
