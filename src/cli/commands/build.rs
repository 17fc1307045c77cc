use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result};

use super::{BuildSummary, CommandSummary};
use crate::{
    cli::args::BuildCommand,
    core::{
        context::{ProjectContext, normalize_relative},
        parsers::jsx::parse_jsx_source,
        registry_file::{RegistryFile, write_atomic},
        transform::{BuildMode, transform_source},
    },
    error::TraksError,
};

/// Path of `file` below the output directory.
fn output_path(out_dir: &Path, root_dir: &Path, file: &Path) -> PathBuf {
    let relative = file.strip_prefix(root_dir).unwrap_or(file);
    let mirrored: PathBuf = relative
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    out_dir.join(mirrored)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub fn build(cmd: BuildCommand) -> Result<CommandSummary> {
    let ctx = ProjectContext::new(&cmd.common)?;
    let processor = ctx.processor()?;

    let bake_lang = non_empty(cmd.bake_lang.clone()).or_else(|| non_empty(ctx.config.bake_lang.clone()));
    let fallback_lang =
        non_empty(cmd.fallback_lang.clone()).or_else(|| non_empty(ctx.config.fallback_lang.clone()));
    let bake_langs: Vec<String> = match bake_lang {
        Some(lang) => std::iter::once(lang).chain(fallback_lang).collect(),
        None => Vec::new(),
    };

    let translations_path = ctx.translations_path();
    let registry_file = if bake_langs.is_empty() {
        None
    } else {
        if !translations_path.is_file() {
            return Err(TraksError::config(format!(
                "baking requires the translations file, but {} does not exist",
                ctx.translations_display()
            ))
            .into());
        }
        Some(RegistryFile::open(&translations_path, &ctx.translations_display())?)
    };
    let translations_canonical = fs::canonicalize(&translations_path).ok();

    let mut written = Vec::new();
    let mut printed = Vec::new();
    for file in &cmd.files {
        let code = fs::read_to_string(file)
            .with_context(|| format!("Failed to read file: {}", file.display()))?;
        let display_path = normalize_relative(&file.to_string_lossy());

        let is_translations_file = translations_canonical.is_some()
            && fs::canonicalize(file).ok() == translations_canonical;

        let output = match &registry_file {
            Some(registry_file) if is_translations_file => registry_file
                .registry
                .render_baked(&bake_langs, &ctx.config.indent)?,
            Some(registry_file) => {
                let source = parse_jsx_source(code, &display_path)?;
                transform_source(
                    &source,
                    &processor,
                    BuildMode::Bake {
                        registry: &registry_file.registry,
                        langs: &bake_langs,
                    },
                )?
            }
            None => {
                let source = parse_jsx_source(code, &display_path)?;
                transform_source(
                    &source,
                    &processor,
                    BuildMode::Tag {
                        keep_children: cmd.keep_children,
                    },
                )?
            }
        };

        match &cmd.out_dir {
            Some(out_dir) => {
                let target = output_path(out_dir, &ctx.root_dir, file);
                write_atomic(&target, &output)?;
                written.push(target.display().to_string());
            }
            None => printed.push(output),
        }
    }

    Ok(CommandSummary::Build(BuildSummary {
        bake_langs,
        written,
        printed,
    }))
}
