use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{
        CommandSummary, build::build, export::export, hashes::hashes, import::import, init::init,
        migrate::migrate, update::update,
    },
};

/// Dispatch to the handler of the parsed command.
pub fn run(Arguments { command }: Arguments) -> Result<CommandSummary> {
    match command {
        Some(Command::Init(cmd)) => init(cmd),
        Some(Command::Update(cmd)) => update(cmd),
        Some(Command::Hashes(cmd)) => hashes(cmd),
        Some(Command::Export(cmd)) => export(cmd),
        Some(Command::Import(cmd)) => import(cmd),
        Some(Command::Migrate(cmd)) => migrate(cmd),
        Some(Command::Build(cmd)) => build(cmd),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
