// The run command: discover documents, resolve config, and run each one
// through the runner, fanning out across documents with a bounded tokio
// task set and folding every reporter event into the selected output
// formats.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::{Cli, LogFormat};
use crate::config::{self, Config};
use crate::report::{ConsoleReporter, JsonReporter, JunitReporter};
use crate::runner::{self, DocumentSummary, Reporter};
use crate::session::LastSession;
use crate::utils::FileUtils;

/// A document passed exit code 2 happens when nothing was discovered or
/// nothing in what was discovered contained a test; 1 means at least one
/// test failed; 3 is reserved for a bug surfacing out of the runner itself.
pub async fn run_cli(cli: &Cli) -> Result<i32> {
    let binary_config = Config::load().unwrap_or_default();

    if let Some(path) = &cli.init_config {
        std::fs::write(path, Config::default().to_toml())?;
        println!("Wrote starter configuration to {}", path.display());
        return Ok(0);
    }

    let (paths, carried_cli_options) = if cli.last {
        match LastSession::load() {
            Some(session) => (session.files, Some(session.cli_options)),
            None => {
                warn!("--last given but no previous session is on record");
                return Ok(2);
            }
        }
    } else {
        (cli.paths.clone(), None)
    };

    if paths.is_empty() {
        warn!("no paths given; pass one or more files or directories to test");
        return Ok(2);
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for path in &paths {
        if !path.exists() {
            warn!(path = %path.display(), "path not found");
            continue;
        }
        files.extend(FileUtils::collect_test_files(path));
    }
    FileUtils::sort_files(&mut files, "name");

    if files.is_empty() {
        warn!("no documents discovered under the given paths");
        return Ok(2);
    }

    info!(count = files.len(), "discovered document(s)");

    let cli_config = carried_cli_options.unwrap_or_else(|| cli.synthesized_config());

    if cli.preview {
        return preview(&files, &binary_config, &cli_config);
    }

    let concurrency = cli.concurrency(binary_config.general.concurrency);

    let console = Arc::new(ConsoleReporter::new(cli.progress_mode(), cli.show_skipped, files.len() as u64));
    let file_reporter = build_file_reporter(cli)?;
    let reporter: Arc<dyn Reporter> = Arc::new(CompositeReporter {
        console: console.clone(),
        file: file_reporter.clone(),
    });

    let mut join_set = tokio::task::JoinSet::new();
    let mut pending = files.clone();
    let mut in_flight = 0usize;
    let mut totals = DocumentSummary::default();
    let mut cancelled = false;

    loop {
        while in_flight < concurrency {
            let Some(file) = pending.pop() else { break };
            let reporter = reporter.clone();
            let binary_config = binary_config.clone();
            let project_config = FileUtils::discover_project_config(&file);
            let cli_config = cli_config.clone();
            let filename = file.to_string_lossy().to_string();

            join_set.spawn_blocking(move || {
                let content = std::fs::read_to_string(&file)
                    .with_context(|| format!("reading {filename}"))?;
                runner::run_document(&filename, &content, &binary_config, &project_config, &cli_config, reporter.as_ref())
            });
            in_flight += 1;
        }

        if in_flight == 0 {
            break;
        }

        tokio::select! {
            result = join_set.join_next() => {
                let Some(result) = result else { break };
                in_flight -= 1;
                match result {
                    Ok(Ok(summary)) => {
                        totals.tested += summary.tested;
                        totals.failed += summary.failed;
                        totals.skipped += summary.skipped;
                        totals.failed_locations.extend(summary.failed_locations);
                    }
                    Ok(Err(err)) => warn!(error = %err, "document failed to run"),
                    Err(join_err) => warn!(error = %join_err, "document task panicked"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("interrupted, stopping in-flight documents");
                cancelled = true;
                join_set.shutdown().await;
                break;
            }
        }
    }

    console.finish()?;
    if let Some(file_reporter) = &file_reporter {
        file_reporter.finish()?;
    }

    if !cli.last {
        let _ = LastSession::new(files, cli_config).save();
    }

    if cancelled {
        return Ok(3);
    }
    if totals.tested == 0 {
        warn!("every discovered document contained zero tests");
        return Ok(2);
    }
    Ok(if totals.failed > 0 { 1 } else { 0 })
}

fn preview(files: &[PathBuf], binary_config: &Config, cli_config: &serde_json::Value) -> Result<i32> {
    let mut total = 0usize;
    for file in files {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("reading {}", file.display()))?;
        let front_matter = crate::frontmatter::parse(&file.to_string_lossy(), &content);
        let merged = config::resolve(&FileUtils::discover_project_config(file), cli_config, &front_matter.fields);
        let test_type = merged
            .get("test-type")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| binary_config.general.test_type.clone());
        let spec = crate::testspec::lookup(&test_type);
        let line_offset = content[..content.len() - front_matter.body.len()].lines().count();
        let tests = crate::extract::extract(&file.to_string_lossy(), &front_matter.body, spec, line_offset)
            .unwrap_or_default();
        for test in &tests {
            println!("{}:{}  {}", test.filename, test.line, first_line(&test.expr));
        }
        total += tests.len();
    }
    println!("{total} test(s) found");
    Ok(0)
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("")
}

fn build_file_reporter(cli: &Cli) -> Result<Option<Arc<FileReporter>>> {
    let Some(format) = cli.log_format_mode() else { return Ok(None) };
    let Some(output) = &cli.log_output else {
        warn!("--log-format given without --log-output; skipping file report");
        return Ok(None);
    };
    let reporter = match format {
        LogFormat::Json => FileReporter::Json(JsonReporter::new(output.clone())),
        LogFormat::JUnit => FileReporter::Junit(JunitReporter::new(output.clone())),
        LogFormat::Console => return Ok(None),
    };
    Ok(Some(Arc::new(reporter)))
}

enum FileReporter {
    Json(JsonReporter),
    Junit(JunitReporter),
}

impl FileReporter {
    fn finish(&self) -> Result<()> {
        match self {
            FileReporter::Json(r) => r.finish(),
            FileReporter::Junit(r) => r.finish(),
        }
    }
}

impl Reporter for FileReporter {
    fn on_test_start(&self, test: &crate::extract::Test) {
        match self {
            FileReporter::Json(r) => r.on_test_start(test),
            FileReporter::Junit(r) => r.on_test_start(test),
        }
    }

    fn on_test_end(&self, test: &crate::extract::Test, outcome: &runner::TestOutcome) {
        match self {
            FileReporter::Json(r) => r.on_test_end(test, outcome),
            FileReporter::Junit(r) => r.on_test_end(test, outcome),
        }
    }

    fn on_document_end(&self, summary: &DocumentSummary) -> Result<()> {
        match self {
            FileReporter::Json(r) => r.on_document_end(summary),
            FileReporter::Junit(r) => r.on_document_end(summary),
        }
    }
}

/// Fans every event out to the console reporter and, if configured, the
/// file reporter — the seam `run_document` calls into for each document
/// task, shared read-only across the bounded task set.
struct CompositeReporter {
    console: Arc<ConsoleReporter>,
    file: Option<Arc<FileReporter>>,
}

impl Reporter for CompositeReporter {
    fn on_test_start(&self, test: &crate::extract::Test) {
        self.console.on_test_start(test);
        if let Some(file) = &self.file {
            file.on_test_start(test);
        }
    }

    fn on_test_end(&self, test: &crate::extract::Test, outcome: &runner::TestOutcome) {
        self.console.on_test_end(test, outcome);
        if let Some(file) = &self.file {
            file.on_test_end(test, outcome);
        }
    }

    fn on_document_end(&self, summary: &DocumentSummary) -> Result<()> {
        self.console.on_document_end(summary)?;
        if let Some(file) = &self.file {
            file.on_document_end(summary)?;
        }
        Ok(())
    }
}
