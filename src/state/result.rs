// A single extracted test's outcome, flattened into the shape the
// aggregate accumulator and the file-based reporters need: no reference
// back into the document it came from.

use serde::Serialize;

use super::TestStatus;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    /// `file:line` of the example this result is for.
    pub name: String,
    pub status: TestStatus,
    pub error_message: Option<String>,
    pub execution_time: i64,
}

impl TestResult {
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Pass,
            error_message: None,
            execution_time: chrono::Utc::now().timestamp(),
        }
    }

    pub fn fail(name: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Fail,
            error_message: Some(error_message.into()),
            execution_time: chrono::Utc::now().timestamp(),
        }
    }

    pub fn skip(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Skip,
            error_message: None,
            execution_time: chrono::Utc::now().timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_the_expected_status() {
        assert_eq!(TestResult::pass("doc.md:1").status, TestStatus::Pass);
        assert_eq!(TestResult::fail("doc.md:2", "mismatch").status, TestStatus::Fail);
        assert_eq!(TestResult::skip("doc.md:3").status, TestStatus::Skip);
    }
}
