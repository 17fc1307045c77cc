use std::io::Write;

use enum_dispatch::enum_dispatch;

use super::super::exit_status::ExitStatus;
use crate::core::registry::ReconcileSummary;

/// Something a command can report once it has finished.
///
/// Printing lives in `report`; commands only build summaries.
#[enum_dispatch]
pub trait Summary {
    /// Write the human-readable outcome.
    fn print_to(&self, writer: &mut dyn Write);

    fn exit_status(&self) -> ExitStatus {
        ExitStatus::Success
    }
}

#[enum_dispatch(Summary)]
#[derive(Debug)]
pub enum CommandSummary {
    Init(InitSummary),
    Update(UpdateSummary),
    Hashes(HashesSummary),
    Export(ExportSummary),
    Import(ImportSummary),
    Migrate(MigrateSummary),
    Build(BuildSummary),
}

#[derive(Debug)]
pub struct InitSummary {
    /// Files written, in creation order.
    pub created: Vec<String>,
    /// Files that already existed and were left alone.
    pub kept: Vec<String>,
}

#[derive(Debug)]
pub struct UpdateSummary {
    pub translations_file: String,
    pub files_scanned: usize,
    pub changes: ReconcileSummary,
    /// The translations file did not exist and was created from the stub.
    pub created_stub: bool,
    /// `--check` was given: nothing was written.
    pub is_check: bool,
    /// The translations file differs (or would differ) from its new content.
    pub is_dirty: bool,
}

#[derive(Debug)]
pub struct HashesSummary {
    /// `(file, line, key)` sorted by file then line.
    pub locations: Vec<(String, usize, String)>,
}

#[derive(Debug)]
pub struct ExportSummary {
    pub output: String,
    pub entry_count: usize,
}

#[derive(Debug)]
pub struct ImportSummary {
    pub translations_file: String,
    pub patched_count: usize,
    pub written: bool,
}

#[derive(Debug)]
pub struct MigrateSummary {
    pub translations_file: String,
    pub from_version: u32,
    pub to_version: u32,
    /// `(old, new)` key pairs.
    pub renamed: Vec<(String, String)>,
    pub changes: ReconcileSummary,
    pub written: bool,
}

#[derive(Debug)]
pub struct BuildSummary {
    pub bake_langs: Vec<String>,
    /// Files written to the output directory.
    pub written: Vec<String>,
    /// Transformed sources to print, when no output directory was given.
    pub printed: Vec<String>,
}
