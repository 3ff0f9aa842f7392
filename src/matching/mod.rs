// The expected-vs-actual matching engine: shared pre-processing, then one of
// two strategies (literal string + wildcard, or placeholder parse) decided
// by the test's effective options.

pub mod diff;
pub mod literal;
pub mod parse;
pub mod preprocess;
pub mod registry;

use std::collections::HashMap;

use serde_json::Value;

use crate::options::Options;
use preprocess::PreprocessOptions;
use registry::TypeRegistry;

/// Outcome of matching expected output against actual output. `vars` is
/// non-empty only for a successful parse-strategy match with named
/// placeholders.
#[derive(Debug, Default)]
pub struct MatchResult {
    pub matched: bool,
    pub vars: HashMap<String, Value>,
}

impl MatchResult {
    pub fn pass(vars: HashMap<String, Value>) -> Self {
        Self { matched: true, vars }
    }

    pub fn fail() -> Self {
        Self { matched: false, vars: HashMap::new() }
    }
}

/// Match `expected` against `actual` under a test's effective options.
/// `default_blankline_marker` comes from the test-type's `TestSpec` and is
/// active unless a test sets `-blankline` or an explicit marker string.
/// Returns `Err` only for a malformed parse
/// pattern (an unknown placeholder type); anything else is a bool verdict.
pub fn match_test(
    expected_raw: &str,
    actual_raw: &str,
    options: &Options,
    types: &TypeRegistry,
    default_blankline_marker: &str,
) -> Result<MatchResult, String> {
    let ignore_case = !options.bool("case", true);
    let collapse_whitespace = !options.bool("space", true);
    let blankline = options.bool_or_string_default_on("blankline", default_blankline_marker);
    let paths = options.bool_or_string("paths", "/");

    let mut expected = expected_raw.to_string();
    if let Some(marker) = &blankline {
        expected = preprocess::substitute_blankline_marker(&expected, marker);
    }

    let pre = PreprocessOptions {
        blankline_marker: blankline.unwrap_or_else(|| default_blankline_marker.to_string()),
        normalize_paths: paths.as_ref().and_then(|d| d.chars().next()),
        collapse_whitespace,
        ignore_case,
    };

    let expected = preprocess::preprocess(&expected, &pre);
    let actual = preprocess::preprocess(actual_raw, &pre);

    if options.bool("parse", false) {
        let compiled = parse::compile(&expected, types, ignore_case)?;
        return Ok(match parse::extract_bindings(&compiled, &actual, types) {
            Some(vars) => MatchResult::pass(vars),
            None => MatchResult::fail(),
        });
    }

    let wildcard = options.bool_or_string("wildcard", "...");
    let matched = match wildcard {
        Some(token) => literal::matches(&expected, &actual, &token),
        None => expected == actual,
    };
    Ok(if matched { MatchResult::pass(HashMap::new()) } else { MatchResult::fail() })
}
