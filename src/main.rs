// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, set up logging, hand off to `cli`.
// - Any error is printed to stdout and turns into exit code 1.

use clap::Parser;
use newsdesk::{cli, ui};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = cli::Cli::parse();
    init_tracing(args.verbose);

    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ui::print_error(&err);
            ExitCode::FAILURE
        }
    }
}

// Logs go to stderr so they never mix with command output. RUST_LOG wins
// over --verbose.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "newsdesk=debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
