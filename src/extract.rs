// Example-block extraction: scans a document body for PS1-prefixed examples,
// joins PS2-prefixed continuation lines, and collects the expected-output
// block that follows. `TestSpec::test_pattern` only recognizes the first line
// of a block — continuation and expected-output lines need per-line
// validation (exact prompt spacing, indentation at least as deep as the
// prompt), which this module walks by hand rather than one greedy regex.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::options;
use crate::testspec::TestSpec;

/// One extracted example: the expression sent to the runtime, the expected
/// output it must match, and any inline options decoded from its comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Test {
    pub filename: String,
    /// 1-based line number of the example's first line, in the full document
    /// (including any stripped front matter, via `line_offset`).
    pub line: usize,
    pub expr: String,
    pub expected: String,
    pub options: Map<String, Value>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("{file}:{line}: space missing after prompt")]
    SpaceMissingAfterPrompt { file: String, line: usize },

    #[error("{file}:{line}: inconsistent leading whitespace")]
    InconsistentLeadingWhitespace { file: String, line: usize },
}

/// Extract every example in `body`. `line_offset` is the number of lines
/// consumed by a stripped front-matter block (0 if there was none), so
/// reported line numbers stay anchored to the original file.
pub fn extract(
    filename: &str,
    body: &str,
    spec: &TestSpec,
    line_offset: usize,
) -> Result<Vec<Test>, ExtractError> {
    let lines: Vec<&str> = body.lines().collect();
    let mut tests = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(caps) = spec.test_pattern.captures(lines[i]) else {
            i += 1;
            continue;
        };

        let indent = caps.name("indent").map(|m| m.as_str()).unwrap_or("").to_string();
        let first_expr = caps.name("expr").map(|m| m.as_str()).unwrap_or("");
        let start_line = i + 1 + line_offset;
        i += 1;

        let mut expr_lines = vec![first_expr.to_string()];
        let ps2_prefix = format!("{indent}{}", spec.ps2);
        while i < lines.len() {
            let candidate = lines[i];
            if candidate == ps2_prefix {
                expr_lines.push(String::new());
                i += 1;
                continue;
            }
            let Some(rest) = candidate.strip_prefix(&ps2_prefix) else {
                break;
            };
            if let Some(cont) = rest.strip_prefix(' ') {
                expr_lines.push(cont.to_string());
                i += 1;
            } else {
                return Err(ExtractError::SpaceMissingAfterPrompt {
                    file: filename.to_string(),
                    line: i + 1 + line_offset,
                });
            }
        }

        let mut expected_lines = Vec::new();
        while i < lines.len() && !lines[i].trim().is_empty() {
            let candidate = lines[i];
            let Some(rest) = candidate.strip_prefix(&indent) else {
                return Err(ExtractError::InconsistentLeadingWhitespace {
                    file: filename.to_string(),
                    line: i + 1 + line_offset,
                });
            };
            expected_lines.push(rest.to_string());
            i += 1;
        }

        let expr = expr_lines.join("\n");
        let expected = expected_lines.join("\n");
        let options = comment_options(filename, start_line, &expr);

        tests.push(Test {
            filename: filename.to_string(),
            line: start_line,
            expr,
            expected,
            options,
        });
    }

    Ok(tests)
}

/// Decode `+name`/`-name` tokens out of the text following the first `#` on
/// the expression's first line. Diagnostics from unbalanced quotes are
/// swallowed here; non-fatal decode problems surface through the matching
/// engine's own diagnostic collection when a test actually runs.
fn comment_options(filename: &str, line: usize, expr: &str) -> Map<String, Value> {
    let first_line = expr.lines().next().unwrap_or("");
    match first_line.find('#') {
        Some(idx) => options::decode(filename, line, &first_line[idx + 1..]).0,
        None => Map::new(),
    }
}
