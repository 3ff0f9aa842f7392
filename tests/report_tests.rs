// Integration coverage for the three `Reporter` implementations through
// their public accumulator + `finish()` contract: write to a temp file, then
// read the rendered output back and check its shape.

use groktest::cli::ProgressMode;
use groktest::extract::Test;
use groktest::report::{ConsoleReporter, JsonReporter, JunitReporter};
use groktest::runner::{DocumentSummary, Reporter, TestOutcome};
use serde_json::Map;

fn test_at(filename: &str, line: usize) -> Test {
    Test { filename: filename.to_string(), line, expr: String::new(), expected: String::new(), options: Map::new() }
}

fn outcome(passed: bool, skipped: bool, message: Option<&str>) -> TestOutcome {
    TestOutcome { passed, skipped, actual: None, message: message.map(str::to_string), diff: false }
}

#[test]
fn json_reporter_writes_an_aggregate_object_with_counts() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.json");
    let reporter = JsonReporter::new(output.clone());

    reporter.on_test_end(&test_at("doc.md", 1), &outcome(true, false, None));
    reporter.on_test_end(&test_at("doc.md", 3), &outcome(false, false, Some("boom")));
    reporter.on_test_end(&test_at("doc.md", 5), &outcome(true, true, None));
    reporter.on_document_end(&DocumentSummary::default()).unwrap();
    reporter.finish().unwrap();

    let content = std::fs::read_to_string(&output).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["total"], serde_json::json!(3));
    assert_eq!(parsed["passed"], serde_json::json!(1));
    assert_eq!(parsed["failed"], serde_json::json!(1));
    assert_eq!(parsed["skipped"], serde_json::json!(1));
}

#[test]
fn junit_reporter_groups_testcases_under_one_testsuite_per_document() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.xml");
    let reporter = JunitReporter::new(output.clone());

    reporter.on_test_end(&test_at("a.md", 1), &outcome(true, false, None));
    reporter.on_test_end(&test_at("b.md", 4), &outcome(false, false, Some("boom")));
    reporter.finish().unwrap();

    let xml = std::fs::read_to_string(&output).unwrap();
    assert!(xml.contains("<testsuite name=\"a.md\""));
    assert!(xml.contains("<testsuite name=\"b.md\""));
    assert!(xml.contains("<failure message=\"boom\""));
}

#[test]
fn console_reporter_finish_does_not_error_with_no_tests_run() {
    let reporter = ConsoleReporter::new(ProgressMode::None, false, 0);
    reporter.finish().unwrap();
}

#[test]
fn console_reporter_counts_survive_multiple_documents_worth_of_events() {
    let reporter = ConsoleReporter::new(ProgressMode::None, true, 4);
    reporter.on_test_end(&test_at("a.md", 1), &outcome(true, false, None));
    reporter.on_test_end(&test_at("a.md", 3), &outcome(true, false, None));
    reporter.on_test_end(&test_at("b.md", 1), &outcome(false, false, Some("mismatch")));
    reporter.on_test_end(&test_at("b.md", 2), &outcome(true, true, None));
    reporter.finish().unwrap();
}
