// Integration coverage for CLI parsing and the small amount of derived logic
// (progress-mode selection, synthesized config) that sits on top of it.

use clap::Parser;
use groktest::cli::{Cli, Commands, LogFormat, ProgressMode};

#[test]
fn bare_invocation_with_a_path_parses_with_all_defaults() {
    let cli = Cli::parse_from(["groktest", "docs/"]);
    assert_eq!(cli.paths, vec![std::path::PathBuf::from("docs/")]);
    assert!(!cli.preview);
    assert!(!cli.last);
    assert_eq!(cli.concurrency(1), 1);
}

#[test]
fn concurrency_flag_overrides_the_binary_level_default() {
    let cli = Cli::parse_from(["groktest", "-C", "4", "docs/"]);
    assert_eq!(cli.concurrency(1), 4);
}

#[test]
fn concurrency_is_floored_at_one_even_if_zero_is_given() {
    let cli = Cli::parse_from(["groktest", "-C", "0", "docs/"]);
    assert_eq!(cli.concurrency(8), 1);
}

#[test]
fn log_format_mode_parses_the_restricted_value_set() {
    let cli = Cli::parse_from(["groktest", "--log-format", "junit", "docs/"]);
    assert_eq!(cli.log_format_mode(), Some(LogFormat::JUnit));
}

#[test]
fn no_log_format_given_means_no_file_reporter() {
    let cli = Cli::parse_from(["groktest", "docs/"]);
    assert_eq!(cli.log_format_mode(), None);
}

#[test]
fn completion_subcommand_carries_the_requested_shell() {
    let cli = Cli::parse_from(["groktest", "completion", "bash"]);
    assert!(matches!(cli.command, Some(Commands::Completion { shell: clap_complete::Shell::Bash })));
}

#[test]
fn progress_mode_none_suppresses_dots_and_bar() {
    let cli = Cli::parse_from(["groktest", "--progress", "none", "docs/"]);
    assert_eq!(cli.progress_mode(), ProgressMode::None);
}

#[test]
fn retry_on_fail_and_no_retry_both_reach_synthesized_config_independently() {
    let cli = Cli::parse_from(["groktest", "--retry-on-fail", "2", "docs/"]);
    assert_eq!(cli.synthesized_config()["retry-on-fail"], serde_json::json!(2));
}
