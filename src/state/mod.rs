// Aggregate accumulator for a whole run: every document's results folded
// into one `TestResults`, shared across the command layer's per-document
// tasks behind a `tokio::sync::Mutex`.

pub mod metrics;
pub mod result;

pub use metrics::ExecutionMetrics;
pub use result::TestResult;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestResults {
    total: usize,
    passed: usize,
    failed: usize,
    skipped: usize,
    results: Vec<TestResult>,
    pub metrics: ExecutionMetrics,
}

impl Default for TestResults {
    fn default() -> Self {
        Self::new()
    }
}

impl TestResults {
    pub fn new() -> Self {
        Self {
            total: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
            results: Vec::new(),
            metrics: ExecutionMetrics::default(),
        }
    }

    pub fn add(&mut self, result: TestResult) {
        self.total += 1;
        match result.status {
            TestStatus::Pass => self.passed += 1,
            TestStatus::Fail => self.failed += 1,
            TestStatus::Skip => self.skipped += 1,
        }
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn all(&self) -> &[TestResult] {
        &self.results
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn metrics(&self) -> &ExecutionMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_updates_totals_per_status() {
        let mut results = TestResults::new();
        results.add(TestResult::pass("doc.md:1"));
        results.add(TestResult::fail("doc.md:2", "boom"));
        results.add(TestResult::skip("doc.md:3"));

        assert_eq!(results.total(), 3);
        assert_eq!(results.passed(), 1);
        assert_eq!(results.failed(), 1);
        assert_eq!(results.skipped(), 1);
        assert!(!results.all_passed());
    }
}
