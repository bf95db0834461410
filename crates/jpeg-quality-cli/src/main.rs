use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use jpeg_quality_core::QualityError;

mod cli;
mod commands;

use crate::cli::{CliArgs, Commands};

pub type CliResult<T> = Result<T, CliError>;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Quality(#[from] QualityError),

    #[error("{failed} of {total} file(s) could not be processed")]
    SomeFilesFailed { failed: usize, total: usize },
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let result = match args.command {
        Commands::Estimate(cmd) => cmd.run(),
        Commands::Compress(cmd) => cmd.run(),
        Commands::Inspect(cmd) => cmd.run(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// Per-file errors are already logged, the summary only counts them.
fn failure_message(e: &CliError) -> String {
    match e {
        CliError::SomeFilesFailed { .. } => format!("Failed: {e}"),
        CliError::Quality(_) => format!("Error: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_not_repeat_error_prefix_for_summary() {
        let summary = failure_message(&CliError::SomeFilesFailed {
            failed: 1,
            total: 3,
        });
        assert_eq!(summary, "Failed: 1 of 3 file(s) could not be processed");

        let single = failure_message(&CliError::Quality(QualityError::SourceNotSet));
        assert!(single.starts_with("Error: "));
    }
}
