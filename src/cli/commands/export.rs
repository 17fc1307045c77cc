use anyhow::{Context, Result};

use super::{CommandSummary, ExportSummary};
use crate::{
    cli::args::ExportCommand,
    core::{
        context::ProjectContext,
        registry::export_document,
        registry_file::{RegistryFile, write_atomic},
    },
};

pub fn export(cmd: ExportCommand) -> Result<CommandSummary> {
    let ctx = ProjectContext::new(&cmd.common)?;
    let file = RegistryFile::open(&ctx.translations_path(), &ctx.translations_display())?;

    let document = export_document(&file.registry)?;
    let json =
        serde_json::to_string_pretty(&document).context("Failed to serialize export document")?;
    write_atomic(&cmd.output, &format!("{}\n", json))?;

    Ok(CommandSummary::Export(ExportSummary {
        output: cmd.output.display().to_string(),
        entry_count: document.list.len(),
    }))
}
