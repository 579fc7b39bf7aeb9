#![forbid(unsafe_code)]

//! Matrix Life binary entry point.

use std::process::ExitCode;

use mlife_app::cli::{self, Command};
use mlife_app::logging;

fn main() -> ExitCode {
    let config = match cli::parse_env() {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            println!("{}", cli::HELP_TEXT);
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("mlife {}", cli::VERSION);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("mlife: {e}");
            eprintln!("Run with --help for usage information.");
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = &config.log_file
        && let Err(e) = logging::init(path, config.verbosity)
    {
        eprintln!("mlife: {e}");
        return ExitCode::FAILURE;
    }

    match mlife_app::run(&config) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("mlife: {e}");
            ExitCode::FAILURE
        }
    }
}
