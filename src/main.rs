use clap::Parser;
use foldersort::cli::{Cli, run_cli};
use foldersort::logging::{Verbosity, init_logging};
use foldersort::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(Verbosity::from_flags(cli.quiet, cli.verbose)) {
        eprintln!("Warning: could not initialize logging: {}", e);
    }

    match run_cli(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
