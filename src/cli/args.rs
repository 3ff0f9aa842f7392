// CLI argument definitions using Clap, mirroring the teacher's flattened
// `Cli`/`Commands` shape: a default "run" action at the top level plus a
// small number of non-running subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    #[default]
    Dots,
    Bar,
    None,
    Verbose,
}

impl std::str::FromStr for ProgressMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bar" => Ok(Self::Bar),
            "none" => Ok(Self::None),
            "verbose" => Ok(Self::Verbose),
            _ => Ok(Self::Dots),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Console,
    Json,
    JUnit,
}

impl std::str::FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "junit" => Ok(Self::JUnit),
            _ => Ok(Self::Console),
        }
    }
}

/// A literate-testing runner: extract prompt-prefixed examples from prose
/// documents and check them against a live language runtime.
#[derive(Parser, Debug)]
#[command(name = "groktest")]
#[command(author = "groktest contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run doctest-style examples embedded in documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Files or directories to test. Directories are walked recursively.
    pub paths: Vec<PathBuf>,

    /// Extract and list tests without executing them
    #[arg(long, default_value_t = false)]
    pub preview: bool,

    /// Re-run the files and options from the most recent invocation
    #[arg(long, default_value_t = false)]
    pub last: bool,

    /// Stop the whole run after the first failing document
    #[arg(short = 'f', long, default_value_t = false)]
    pub fail_fast: bool,

    /// Number of documents to test concurrently
    #[arg(short = 'C', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Include skipped tests in console output
    #[arg(long, default_value_t = false)]
    pub show_skipped: bool,

    /// Verbose diagnostic logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Default test-type profile when a document's front matter omits one
    #[arg(long, value_name = "NAME")]
    pub test_type: Option<String>,

    /// Report format
    #[arg(long, value_name = "FORMAT", value_parser = ["console", "json", "junit"])]
    pub log_format: Option<String>,

    /// Output file for the selected report format
    #[arg(long, value_name = "PATH")]
    pub log_output: Option<PathBuf>,

    /// Progress indicator style
    #[arg(long, value_name = "MODE", value_parser = ["dots", "bar", "none", "verbose"])]
    pub progress: Option<String>,

    /// Disable colored output
    #[arg(long, default_value_t = false)]
    pub no_color: bool,

    /// Override a document's `retry-on-fail` option
    #[arg(long, value_name = "N")]
    pub retry_on_fail: Option<u32>,

    /// Disable retries regardless of document or CLI setting
    #[arg(long, default_value_t = false)]
    pub no_retry: bool,

    /// Write a starter `.groktestrc.toml` at the given path and exit
    #[arg(long, value_name = "PATH")]
    pub init_config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a shell completion script
    Completion {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Cli {
    pub fn concurrency(&self, default: usize) -> usize {
        self.concurrency.unwrap_or(default).max(1)
    }

    pub fn progress_mode(&self) -> ProgressMode {
        match self.progress.as_deref() {
            Some(mode) => mode.parse().unwrap_or_default(),
            None if self.debug => ProgressMode::Verbose,
            None => ProgressMode::Dots,
        }
    }

    pub fn log_format_mode(&self) -> Option<LogFormat> {
        self.log_format.as_deref().map(|s| s.parse().unwrap_or(LogFormat::Console))
    }

    /// The subset of flags that become CLI-synthesized config (precedence
    /// tier 2, per the config resolver), as the merge-ready `serde_json::Value`.
    pub fn synthesized_config(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        if self.fail_fast {
            map.insert("fail-fast".to_string(), serde_json::Value::Bool(true));
        }
        if self.no_retry {
            map.insert("retry-on-fail".to_string(), serde_json::Value::from(0));
        } else if let Some(n) = self.retry_on_fail {
            map.insert("retry-on-fail".to_string(), serde_json::Value::from(n));
        }
        serde_json::Value::Object(map)
    }
}
