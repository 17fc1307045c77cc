use std::fs;

use anyhow::{Context, Result};

use super::{CommandSummary, ImportSummary};
use crate::{
    cli::args::ImportCommand,
    core::{
        context::ProjectContext,
        registry::{ExportDocument, Observations, import_patch, reconcile},
        registry_file::RegistryFile,
    },
};

/// Splice a patch into the translations file.
///
/// Nothing is scanned: the commit only drops refs to files that are gone and
/// never marks or restores deletions.
pub fn import(cmd: ImportCommand) -> Result<CommandSummary> {
    let ctx = ProjectContext::new(&cmd.common)?;

    let content = fs::read_to_string(&cmd.patch)
        .with_context(|| format!("Failed to read patch: {}", cmd.patch.display()))?;
    let patch: ExportDocument = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse patch: {}", cmd.patch.display()))?;

    let translations_file = ctx.translations_display();
    let mut file = RegistryFile::open(&ctx.translations_path(), &translations_file)?;
    let patched_count = import_patch(&mut file.registry, &patch, &ctx.config.indent)?;

    reconcile(
        &mut file.registry,
        &Observations::new(),
        &ctx.reconcile_options(true),
        |path| ctx.file_exists(path),
    );
    let written = file.save(&ctx.config.indent)?;

    Ok(CommandSummary::Import(ImportSummary {
        translations_file,
        patched_count,
        written,
    }))
}
