// Console reporter: dots/bar/verbose progress during the run, a final
// box-drawn summary once every document has been processed.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::ProgressMode;
use crate::extract::Test;
use crate::matching::diff;
use crate::runner::{DocumentSummary, Reporter, TestOutcome};
use crate::state::{TestResult, TestResults};

/// Indent every line of `text` by `width` spaces, one blank indented line
/// for empty input.
fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    let mut out = String::new();
    for line in text.lines() {
        out.push_str(&pad);
        out.push_str(line);
        out.push('\n');
    }
    if out.is_empty() {
        out.push_str(&pad);
        out.push('\n');
    }
    out
}

pub struct ConsoleReporter {
    mode: ProgressMode,
    show_skipped: bool,
    progress_bar: ProgressBar,
    dots_lock: Mutex<()>,
    dots_count: AtomicUsize,
    results: Mutex<TestResults>,
}

impl ConsoleReporter {
    pub fn new(mode: ProgressMode, show_skipped: bool, total_tests: u64) -> Self {
        let progress_bar = if matches!(mode, ProgressMode::Bar) {
            let pb = ProgressBar::new(total_tests);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{bar:40} {pos}/{len} {msg}")
                    .unwrap(),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        Self {
            mode,
            show_skipped,
            progress_bar,
            dots_lock: Mutex::new(()),
            dots_count: AtomicUsize::new(0),
            results: Mutex::new(TestResults::new()),
        }
    }

    fn location(test: &Test) -> String {
        format!("{}:{}", test.filename, test.line)
    }

    /// Render the `File "..", line N` / `Failed example:` / `Expected:` /
    /// `Got:` block for one failed test (or a unified diff in its place
    /// under `+diff`).
    fn render_failure(test: &Test, outcome: &TestOutcome) -> String {
        let mut block = String::new();
        block.push_str(&format!("File \"{}\", line {}\n", test.filename, test.line));
        block.push_str("Failed example:\n");
        block.push_str(&indent(&test.expr, 4));

        if outcome.diff {
            let actual = outcome.actual.as_deref().unwrap_or("");
            block.push_str(&indent(&diff::render(&test.expected, actual), 2));
        } else {
            block.push_str("Expected:\n");
            if test.expected.is_empty() {
                block.push_str("    Expected nothing\n");
            } else {
                block.push_str(&indent(&test.expected, 4));
            }
            block.push_str("Got:\n");
            match outcome.actual.as_deref() {
                Some(actual) if !actual.is_empty() => block.push_str(&indent(actual, 4)),
                _ => block.push_str("    Got nothing\n"),
            }
        }
        block
    }

    /// Render the final box-drawn summary. Called once by the command
    /// layer after every document has finished.
    pub fn finish(&self) -> Result<()> {
        if matches!(self.mode, ProgressMode::Bar) {
            self.progress_bar.finish_and_clear();
        }
        if matches!(self.mode, ProgressMode::Dots) && self.dots_count.load(Ordering::Relaxed) > 0 {
            println!();
        }

        let results = self.results.lock().unwrap();
        let metrics = results.metrics();

        println!();
        if results.total() == 0 {
            println!("Nothing tested");
            return Ok(());
        }

        let headline = if results.failed() > 0 {
            format!("{} test(s) failed", results.failed())
        } else {
            "All tests passed".to_string()
        };

        println!("════════════════════════════════════════");
        println!("{headline}");
        println!("────────────────────────────────────────");
        println!("  tested:  {}", results.total());
        println!("  failed:  {}", results.failed());
        println!("  skipped: {}", results.skipped());
        println!("  duration: {}ms", metrics.total_duration_ms);
        println!("════════════════════════════════════════");
        Ok(())
    }
}

impl Reporter for ConsoleReporter {
    fn on_test_start(&self, test: &Test) {
        if matches!(self.mode, ProgressMode::Verbose) {
            print!("Testing {} ... ", Self::location(test));
            use std::io::Write;
            std::io::stdout().flush().ok();
        }
    }

    fn on_test_end(&self, test: &Test, outcome: &TestOutcome) {
        let location = Self::location(test);
        let result = if outcome.skipped {
            TestResult::skip(location)
        } else if outcome.passed {
            TestResult::pass(location)
        } else {
            TestResult::fail(location, outcome.message.clone().unwrap_or_else(|| "mismatch".to_string()))
        };
        self.results.lock().unwrap().add(result);

        if outcome.skipped && !self.show_skipped && !matches!(self.mode, ProgressMode::Verbose) {
            return;
        }

        let failed = !outcome.skipped && !outcome.passed;

        match self.mode {
            ProgressMode::Dots => {
                let ch = if outcome.skipped {
                    "S"
                } else if outcome.passed {
                    "."
                } else {
                    "F"
                };
                let _guard = self.dots_lock.lock().unwrap();
                print!("{ch}");
                use std::io::Write;
                std::io::stdout().flush().ok();
                let count = self.dots_count.fetch_add(1, Ordering::Relaxed) + 1;
                if count >= 80 || failed {
                    println!();
                    self.dots_count.store(0, Ordering::Relaxed);
                }
                if failed {
                    print!("{}", Self::render_failure(test, outcome));
                }
            }
            ProgressMode::Bar => {
                self.progress_bar.inc(1);
                if failed {
                    self.progress_bar.println(Self::render_failure(test, outcome).trim_end());
                }
            }
            ProgressMode::Verbose => {
                if outcome.skipped {
                    println!("SKIP");
                } else if outcome.passed {
                    println!("PASS");
                } else {
                    println!("FAIL: {}", outcome.message.as_deref().unwrap_or("mismatch"));
                    print!("{}", Self::render_failure(test, outcome));
                }
            }
            ProgressMode::None => {
                if failed {
                    print!("{}", Self::render_failure(test, outcome));
                }
            }
        }
    }

    fn on_document_end(&self, _summary: &DocumentSummary) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn test(filename: &str, line: usize) -> Test {
        Test { filename: filename.to_string(), line, expr: String::new(), expected: String::new(), options: Map::new() }
    }

    #[test]
    fn indent_pads_every_line() {
        assert_eq!(indent("a\nb", 2), "  a\n  b\n");
    }

    #[test]
    fn indent_of_empty_text_is_one_blank_padded_line() {
        assert_eq!(indent("", 4), "    \n");
    }

    #[test]
    fn render_failure_shows_expected_and_got_blocks() {
        let mut t = test("doc.md", 7);
        t.expr = "echo hi\n".to_string();
        t.expected = "hi\n".to_string();
        let outcome =
            TestOutcome { passed: false, skipped: false, actual: Some("bye\n".to_string()), message: None, diff: false };
        let rendered = ConsoleReporter::render_failure(&t, &outcome);
        assert!(rendered.contains("File \"doc.md\", line 7"));
        assert!(rendered.contains("Failed example:"));
        assert!(rendered.contains("    echo hi"));
        assert!(rendered.contains("Expected:"));
        assert!(rendered.contains("    hi"));
        assert!(rendered.contains("Got:"));
        assert!(rendered.contains("    bye"));
    }

    #[test]
    fn render_failure_reports_nothing_placeholders_for_empty_sides() {
        let t = test("doc.md", 2);
        let outcome =
            TestOutcome { passed: false, skipped: false, actual: None, message: None, diff: false };
        let rendered = ConsoleReporter::render_failure(&t, &outcome);
        assert!(rendered.contains("Expected nothing"));
        assert!(rendered.contains("Got nothing"));
    }

    #[test]
    fn render_failure_renders_a_diff_block_when_diff_is_set() {
        let mut t = test("doc.md", 1);
        t.expected = "expected line".to_string();
        let outcome = TestOutcome {
            passed: false,
            skipped: false,
            actual: Some("actual line".to_string()),
            message: None,
            diff: true,
        };
        let rendered = ConsoleReporter::render_failure(&t, &outcome);
        assert!(rendered.contains("Diff (Expected"));
        assert!(!rendered.contains("Expected:"));
    }

    #[test]
    fn dots_mode_accumulates_into_results() {
        let reporter = ConsoleReporter::new(ProgressMode::Dots, false, 2);
        reporter.on_test_end(
            &test("doc.md", 1),
            &TestOutcome { passed: true, skipped: false, actual: None, message: None, diff: false },
        );
        reporter.on_test_end(
            &test("doc.md", 3),
            &TestOutcome { passed: false, skipped: false, actual: None, message: Some("boom".into()), diff: false },
        );
        let results = reporter.results.lock().unwrap();
        assert_eq!(results.total(), 2);
        assert_eq!(results.failed(), 1);
    }

    #[test]
    fn skipped_tests_still_count_toward_the_final_summary() {
        let reporter = ConsoleReporter::new(ProgressMode::Dots, false, 1);
        reporter.on_test_end(
            &test("doc.md", 1),
            &TestOutcome { passed: true, skipped: true, actual: None, message: None, diff: false },
        );
        let results = reporter.results.lock().unwrap();
        assert_eq!(results.total(), 1);
        assert_eq!(results.skipped(), 1);
    }
}
