//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `init`: write the config file, translations file and import file
//! - `update`: sync the translations file with the `<T>` tags in source
//! - `hashes`: print the key of every `<T>` tag
//! - `export` / `import`: move translations out to JSON and patch them back in
//! - `migrate`: re-key the translations file for another signature normalizer
//! - `build`: rewrite source files for a development or baked build

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::registry::InsertMode;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        self.command
            .as_ref()
            .is_some_and(|command| command.common().verbose)
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root; the config file is searched from here upwards
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Translations file, relative to the project root (overrides config file)
    #[arg(long, env = "TRAKS_TRANSLATIONS_FILE")]
    pub translations_file: Option<String>,

    /// Signature normalizer version (overrides config file)
    #[arg(long)]
    pub normalizer_version: Option<u32>,

    /// Where new translations are placed (overrides config file)
    #[arg(long, value_enum)]
    pub insert_mode: Option<InsertMode>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct InitCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct UpdateCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Write nothing; exit with status 1 if the translations file is out of date
    #[arg(long)]
    pub check: bool,
}

#[derive(Debug, Args)]
pub struct HashesCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct ExportCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Where to write the export document
    #[arg(short, long, default_value = "traks-export.json")]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct ImportCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Patch document in the `traks export` format
    pub patch: PathBuf,
}

#[derive(Debug, Args)]
pub struct MigrateCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Signature normalizer version to migrate to
    #[arg(long)]
    pub to: u32,
}

#[derive(Debug, Args)]
pub struct BuildCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Source files to rewrite
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Write rewritten files here (mirroring their paths) instead of stdout
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Keep the children of tagged translations (development builds)
    #[arg(long)]
    pub keep_children: bool,

    /// Bake this language into the output
    #[arg(long, env = "TRAKS_BAKE_LANG")]
    pub bake_lang: Option<String>,

    /// Language to use when the bake language has no translation
    #[arg(long, env = "TRAKS_FALLBACK_LANG")]
    pub fallback_lang: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create .traksrc.json, the translations file and the import file
    Init(InitCommand),
    /// Add new translations to the translations file and mark unused ones
    Update(UpdateCommand),
    /// Print the location and key of every translation tag
    Hashes(HashesCommand),
    /// Export every translation to a JSON document
    Export(ExportCommand),
    /// Apply a JSON patch produced from `traks export`
    Import(ImportCommand),
    /// Re-key the translations file for another signature normalizer version
    Migrate(MigrateCommand),
    /// Rewrite translation tags by key, or bake a language into them
    Build(BuildCommand),
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Init(cmd) => &cmd.common,
            Command::Update(cmd) => &cmd.common,
            Command::Hashes(cmd) => &cmd.common,
            Command::Export(cmd) => &cmd.common,
            Command::Import(cmd) => &cmd.common,
            Command::Migrate(cmd) => &cmd.common,
            Command::Build(cmd) => &cmd.common,
        }
    }
}
