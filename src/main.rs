// Entry point: parse CLI, install structured logging, hand off to the
// run command, and map its result onto the process exit code.

use clap::Parser;

use groktest::cli::{Cli, Commands};
use groktest::commands;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug { "groktest=debug,warn" } else { "groktest=info,warn" };
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .event_format(groktest::logging::CustomFormatter)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    if let Some(Commands::Completion { shell }) = cli.command {
        commands::handle_completion(shell);
        std::process::exit(0);
    }

    match commands::run_cli(&cli).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(3);
        }
    }
}
