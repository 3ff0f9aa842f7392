// The document runner: the state machine described by the sequence in
// "Runner" component design — front matter, extraction, a persistent
// runtime, per-test skip/solo/fails/retry handling, fail-fast.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use anyhow::Result;
use serde_json::{Map, Value};

use crate::config::{self, Config};
use crate::extract::{self, Test};
use crate::frontmatter;
use crate::matching::{self, registry::TypeRegistry};
use crate::options::{self, Options};
use crate::runtime::{self, RuntimeAdapter, TestOutput};
use crate::testspec::{self, TestSpec};

/// Outcome of one test's run, handed to the reporter after `exec_test_expr`
/// (or synthesized directly for skip/no-op tests, which never reach the
/// runtime).
#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub passed: bool,
    pub skipped: bool,
    /// Set when the test ran and failed: the actual runtime output, for the
    /// reporter's "Got:" block.
    pub actual: Option<String>,
    /// Human-readable reason, set for every failure (mismatch, inverted
    /// `fails`, or an unknown parse-type error).
    pub message: Option<String>,
    pub diff: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentSummary {
    pub tested: usize,
    pub failed: usize,
    pub skipped: usize,
    pub failed_locations: Vec<(String, usize)>,
}

/// RAII guard around a started runtime: guarantees `stop()` runs on every
/// exit path, including an early return via `?`.
struct RuntimeGuard(Box<dyn RuntimeAdapter>);

impl Deref for RuntimeGuard {
    type Target = dyn RuntimeAdapter;
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl DerefMut for RuntimeGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}

impl Drop for RuntimeGuard {
    fn drop(&mut self) {
        let _ = self.0.stop();
    }
}

/// Run every test in `filename`/`content` to completion, retrying the whole
/// document if `retry-on-fail` is set and the first attempt has failures.
pub fn run_document(
    filename: &str,
    content: &str,
    binary_config: &Config,
    project_config: &Value,
    cli_config: &Value,
    reporter: &dyn Reporter,
) -> Result<DocumentSummary> {
    run_document_with(filename, content, binary_config, project_config, cli_config, reporter, &runtime::create)
}

/// Same as [`run_document`], but with the runtime construction seam exposed
/// so callers (and this module's own tests) can substitute an
/// [`crate::runtime::echo::EchoRuntime`] for the real subprocess-backed one.
fn run_document_with(
    filename: &str,
    content: &str,
    binary_config: &Config,
    project_config: &Value,
    cli_config: &Value,
    reporter: &dyn Reporter,
    runtime_factory: &dyn Fn(&str) -> Box<dyn RuntimeAdapter>,
) -> Result<DocumentSummary> {
    let front_matter = frontmatter::parse(filename, content);
    if let Some(diag) = &front_matter.diagnostic {
        tracing::warn!(file = filename, message = %diag.message, "front matter did not parse cleanly");
    }

    let merged = config::resolve(project_config, cli_config, &front_matter.fields);
    let test_type = merged
        .get("test-type")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| binary_config.general.test_type.clone());
    let spec = testspec::lookup(&test_type);

    let line_offset = content[..content.len() - front_matter.body.len()].lines().count();

    let tests = extract::extract(filename, &front_matter.body, spec, line_offset)?;

    if tests.is_empty() {
        let summary = DocumentSummary::default();
        reporter.on_document_end(&summary)?;
        return Ok(summary);
    }

    let doc_defaults = doc_default_options(&merged, filename);
    let types = build_type_registry(&merged);
    let retry_on_fail = Options::new(doc_defaults.clone())
        .int("retry-on-fail")
        .unwrap_or(0)
        .max(0);

    let mut summary = DocumentSummary::default();
    for attempt in 0..=retry_on_fail {
        summary = run_once(filename, spec, &tests, &doc_defaults, &merged, &types, reporter, runtime_factory)?;
        if summary.failed == 0 || attempt == retry_on_fail {
            break;
        }
        tracing::info!(file = filename, attempt, "retrying document after failures");
    }

    reporter.on_document_end(&summary)?;
    Ok(summary)
}

fn run_once(
    filename: &str,
    spec: &'static TestSpec,
    tests: &[Test],
    doc_defaults: &Map<String, Value>,
    merged: &Value,
    types: &TypeRegistry,
    reporter: &dyn Reporter,
    runtime_factory: &dyn Fn(&str) -> Box<dyn RuntimeAdapter>,
) -> Result<DocumentSummary> {
    let mut runtime = RuntimeGuard(runtime_factory(spec.runtime_key));
    runtime.start()?;
    let init_config = merged.as_object().cloned().unwrap_or_default();
    runtime.init_for_tests(&init_config)?;

    let solo_active = tests.iter().any(|t| is_solo(doc_defaults, t));

    let mut summary = DocumentSummary::default();
    let mut skiprest = false;

    for test in tests {
        let effective = options::merge(&[doc_defaults, &test.options]);
        let opts = Options::new(effective.clone());

        if skiprest {
            if opts.get("skiprest") == Some(&Value::Bool(false)) {
                skiprest = false;
            } else {
                emit_skip(test, &mut summary, reporter);
                continue;
            }
        }

        if solo_active && !opts.bool("solo", false) {
            emit_skip(test, &mut summary, reporter);
            continue;
        }

        if should_skip(&opts) {
            emit_skip(test, &mut summary, reporter);
            continue;
        }

        reporter.on_test_start(test);

        let outcome = if expr_is_comment_only(&test.expr) {
            TestOutcome { passed: true, skipped: false, actual: None, message: None, diff: false }
        } else {
            run_test(test, &opts, &effective, types, spec, runtime.deref_mut())?
        };

        summary.tested += 1;
        if !outcome.passed {
            summary.failed += 1;
            summary.failed_locations.push((test.filename.clone(), test.line));
        }
        reporter.on_test_end(test, &outcome);

        if opts.bool("skiprest", false) {
            skiprest = true;
        }

        if !outcome.passed && opts.bool("fail-fast", false) {
            let remaining = &tests[(tests.iter().position(|t| t.line == test.line).unwrap_or(0) + 1)..];
            for rest in remaining {
                emit_skip(rest, &mut summary, reporter);
            }
            break;
        }
    }

    let _ = filename;
    Ok(summary)
}

fn run_test(
    test: &Test,
    opts: &Options,
    effective: &Map<String, Value>,
    types: &TypeRegistry,
    spec: &'static TestSpec,
    runtime: &mut dyn RuntimeAdapter,
) -> Result<TestOutcome> {
    let output: TestOutput = runtime.exec_test_expr(test, effective)?;

    let match_result = matching::match_test(&test.expected, &output.output, opts, types, spec.blankline_marker);
    let diff = opts.bool("diff", false);

    let (raw_match, vars) = match match_result {
        Ok(result) => (result.matched, result.vars),
        Err(reason) => {
            return Ok(TestOutcome {
                passed: false,
                skipped: false,
                actual: Some(output.output),
                message: Some(reason),
                diff,
            });
        }
    };

    let fails = opts.bool("fails", false);
    let passed = fails != raw_match;

    if passed && !vars.is_empty() {
        runtime.handle_test_match(&vars)?;
    }

    let message = if passed {
        None
    } else if fails && raw_match {
        Some("expected test to fail but passed".to_string())
    } else {
        None
    };

    Ok(TestOutcome { passed, skipped: false, actual: Some(output.output), message, diff })
}

fn emit_skip(test: &Test, summary: &mut DocumentSummary, reporter: &dyn Reporter) {
    summary.skipped += 1;
    reporter.on_test_end(
        test,
        &TestOutcome { passed: true, skipped: true, actual: None, message: None, diff: false },
    );
}

fn is_solo(doc_defaults: &Map<String, Value>, test: &Test) -> bool {
    let effective = options::merge(&[doc_defaults, &test.options]);
    Options::new(effective).bool("solo", false)
}

fn expr_is_comment_only(expr: &str) -> bool {
    expr.lines().enumerate().all(|(i, line)| {
        let line = line.trim();
        if i == 0 {
            match line.find('#') {
                Some(idx) => line[..idx].trim().is_empty(),
                None => line.is_empty(),
            }
        } else {
            line.is_empty()
        }
    })
}

/// `skip` is bool or a string of the form `NAME`/`!NAME` naming an
/// environment variable: `NAME` skips when it's set and non-empty, `!NAME`
/// skips when it's unset or empty.
fn should_skip(opts: &Options) -> bool {
    match opts.get("skip") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => {
            if let Some(name) = s.strip_prefix('!') {
                std::env::var(name).map(|v| v.is_empty()).unwrap_or(true)
            } else {
                std::env::var(s).map(|v| !v.is_empty()).unwrap_or(false)
            }
        }
        _ => false,
    }
}

/// Document-level default options: `options` (aliased from `test-options`)
/// may be a decoded string or an already-structured mapping.
fn doc_default_options(merged: &Value, filename: &str) -> Map<String, Value> {
    match merged.get("options") {
        Some(Value::String(s)) => options::decode(filename, 0, s).0,
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

fn build_type_registry(merged: &Value) -> TypeRegistry {
    let Some(Value::Object(types)) = merged.get("parse").and_then(|p| p.get("types")) else {
        return TypeRegistry::new();
    };
    let custom: HashMap<String, String> = types
        .iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect();
    TypeRegistry::from_config_types(&custom)
}

/// The runner's only output seam: every document-level and test-level event
/// funnels through these three calls. `Send + Sync` so a single reporter
/// instance can be shared (via `Arc`) across the concurrent per-document
/// tasks the command layer spawns.
pub trait Reporter: Send + Sync {
    fn on_test_start(&self, test: &Test);
    fn on_test_end(&self, test: &Test, outcome: &TestOutcome);
    fn on_document_end(&self, summary: &DocumentSummary) -> Result<()>;
}
