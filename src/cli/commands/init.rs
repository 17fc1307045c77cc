use std::path::PathBuf;

use anyhow::{Result, bail};

use super::{CommandSummary, InitSummary};
use crate::{
    cli::args::InitCommand,
    config::{CONFIG_FILE_NAME, Config, default_config_json},
    core::{
        registry_file::write_atomic,
        templates::{import_stub, translations_stub},
    },
};

pub fn init(cmd: InitCommand) -> Result<CommandSummary> {
    let root = cmd
        .common
        .source_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        bail!("{} already exists", CONFIG_FILE_NAME);
    }

    let config = Config::default();
    let mut created = Vec::new();
    let mut kept = Vec::new();

    write_atomic(&config_path, &format!("{}\n", default_config_json()?))?;
    created.push(CONFIG_FILE_NAME.to_string());

    let stubs = [
        (
            config.translations_file.clone(),
            translations_stub(&config.import_file),
        ),
        (
            config.import_file.clone(),
            import_stub(&config.import_file, &config.translations_file, &config.langs[0]),
        ),
    ];
    for (file, content) in stubs {
        let path = root.join(&file);
        if path.exists() {
            kept.push(file);
        } else {
            write_atomic(&path, &content)?;
            created.push(file);
        }
    }

    Ok(CommandSummary::Init(InitSummary { created, kept }))
}
