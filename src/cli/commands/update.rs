use anyhow::Result;

use super::{CommandSummary, UpdateSummary};
use crate::{
    cli::args::UpdateCommand,
    core::{
        context::ProjectContext,
        registry::{ReconcileSummary, reconcile},
        registry_file::{RegistryFile, write_atomic},
        templates::translations_stub,
    },
};

pub fn update(cmd: UpdateCommand) -> Result<CommandSummary> {
    let ctx = ProjectContext::new(&cmd.common)?;
    let processor = ctx.processor()?;
    let translations_path = ctx.translations_path();
    let translations_file = ctx.translations_display();
    let observations = ctx.observe(&processor)?;

    let created_stub = !translations_path.exists();
    if created_stub {
        if cmd.check {
            return Ok(CommandSummary::Update(UpdateSummary {
                translations_file,
                files_scanned: ctx.files.len(),
                changes: ReconcileSummary::default(),
                created_stub: false,
                is_check: true,
                is_dirty: true,
            }));
        }
        write_atomic(
            &translations_path,
            &translations_stub(&ctx.config.import_file),
        )?;
    }

    let mut file = RegistryFile::open(&translations_path, &translations_file)?;
    let changes = reconcile(
        &mut file.registry,
        &observations,
        &ctx.reconcile_options(false),
        |path| ctx.file_exists(path),
    );

    let indent = &ctx.config.indent;
    let is_dirty = if cmd.check {
        file.is_dirty(indent)
    } else {
        file.save(indent)?
    };

    Ok(CommandSummary::Update(UpdateSummary {
        translations_file,
        files_scanned: ctx.files.len(),
        changes,
        created_stub,
        is_check: cmd.check,
        is_dirty: is_dirty || created_stub,
    }))
}
