// Commands: the CLI's entry point to the runner, plus shell completion.

pub mod run;

pub use run::run_cli;

/// Handle shell completion generation, the crate's one non-running
/// subcommand.
pub fn handle_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;

    let mut cmd = crate::cli::Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
