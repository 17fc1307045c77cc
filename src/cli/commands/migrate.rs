use anyhow::{Result, bail};

use super::{CommandSummary, MigrateSummary};
use crate::{
    cli::args::MigrateCommand,
    core::{
        context::ProjectContext,
        extract::SignatureNormalizer,
        registry::{KeyMap, Observations, reconcile, remap_keys},
        registry_file::RegistryFile,
    },
};

/// Old key to new key for every fragment, pairing the two scans by position.
fn build_keymap(old: &Observations, new: &Observations) -> Result<KeyMap> {
    let mut keymap = KeyMap::new();
    for (file, old_fragments) in old {
        let new_fragments = new.get(file).map(Vec::as_slice).unwrap_or_default();
        if old_fragments.len() != new_fragments.len() {
            bail!("{} changed while it was being scanned", file);
        }
        for (old_fragment, new_fragment) in old_fragments.iter().zip(new_fragments) {
            keymap
                .entry(old_fragment.key.clone())
                .or_insert_with(|| new_fragment.key.clone());
        }
    }
    Ok(keymap)
}

pub fn migrate(cmd: MigrateCommand) -> Result<CommandSummary> {
    let ctx = ProjectContext::new(&cmd.common)?;
    let from = ctx.normalizer()?;
    let to = SignatureNormalizer::from_version(cmd.to)?;

    let translations_file = ctx.translations_display();
    let mut file = RegistryFile::open(&ctx.translations_path(), &translations_file)?;

    let processor = ctx.processor()?;
    let target = processor.with_normalizer(to);
    let current_observations = ctx.observe(&processor)?;
    let target_observations = if from == to {
        current_observations.clone()
    } else {
        ctx.observe(&target)?
    };

    let keymap = build_keymap(&current_observations, &target_observations)?;
    let renamed = remap_keys(&mut file.registry, &keymap)?;

    let changes = reconcile(
        &mut file.registry,
        &target_observations,
        &ctx.reconcile_options(false),
        |path| ctx.file_exists(path),
    );
    let written = file.save(&ctx.config.indent)?;

    Ok(CommandSummary::Migrate(MigrateSummary {
        translations_file,
        from_version: from.version(),
        to_version: to.version(),
        renamed,
        changes,
        written,
    }))
}
