use std::process::ExitCode;

use clap::Parser;
use traks::cli::{Arguments, run_cli};

fn main() -> ExitCode {
    run_cli(Arguments::parse()).into()
}
