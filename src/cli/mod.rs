use std::io;

pub mod args;
mod commands;
mod exit_status;
mod report;
mod run;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;

use commands::Summary;

/// Run a parsed command line, print its outcome and return the exit status.
pub fn run_cli(args: Arguments) -> ExitStatus {
    let verbose = args.verbose();

    let Some(args) = args.with_command_or_help() else {
        return ExitStatus::Success;
    };

    match run::run(args) {
        Ok(summary) => {
            summary.print_to(&mut io::stdout().lock());
            summary.exit_status()
        }
        Err(err) => {
            report::print_error(&err, verbose);
            ExitStatus::Error
        }
    }
}
