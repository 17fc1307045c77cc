use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::{
    core::{extract::SignatureNormalizer, registry::InsertMode},
    error::{TraksError, TraksResult},
};

pub const CONFIG_FILE_NAME: &str = ".traksrc.json";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_langs")]
    pub langs: Vec<String>,
    #[serde(default = "default_src_dirs")]
    pub src_dirs: Vec<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
    #[serde(default)]
    pub exclude_files: Vec<String>,
    #[serde(default)]
    pub insert_mode: InsertMode,
    #[serde(default = "default_translations_file")]
    pub translations_file: String,
    #[serde(default = "default_import_file")]
    pub import_file: String,
    #[serde(default = "default_indent")]
    pub indent: String,
    #[serde(default)]
    pub signature_normalizer_version: u32,
    #[serde(default = "default_tag_name")]
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bake_lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_lang: Option<String>,
}

fn default_langs() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_src_dirs() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_extensions() -> Vec<String> {
    ["js", "jsx"].map(String::from).to_vec()
}

fn default_exclude_dirs() -> Vec<String> {
    vec!["node_modules".to_string()]
}

fn default_translations_file() -> String {
    "src/traks-translations.js".to_string()
}

fn default_import_file() -> String {
    "src/traks.js".to_string()
}

fn default_indent() -> String {
    "\t".to_string()
}

fn default_tag_name() -> String {
    "T".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            langs: default_langs(),
            src_dirs: default_src_dirs(),
            extensions: default_extensions(),
            exclude_dirs: default_exclude_dirs(),
            exclude_files: Vec::new(),
            insert_mode: InsertMode::default(),
            translations_file: default_translations_file(),
            import_file: default_import_file(),
            indent: default_indent(),
            signature_normalizer_version: 0,
            tag_name: default_tag_name(),
            bake_lang: None,
            fallback_lang: None,
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> TraksResult<()> {
        if self.langs.is_empty() {
            return Err(TraksError::config("'langs' must name at least one language"));
        }
        let mut seen = HashSet::new();
        for lang in &self.langs {
            if lang.is_empty() || lang.starts_with('_') || lang.starts_with('#') {
                return Err(TraksError::config(format!("invalid language in 'langs': {:?}", lang)));
            }
            if !seen.insert(lang) {
                return Err(TraksError::config(format!("duplicate language in 'langs': {:?}", lang)));
            }
        }

        self.normalizer()?;

        if self.indent.is_empty() {
            return Err(TraksError::config("'indent' must not be empty"));
        }
        if self.tag_name.is_empty() {
            return Err(TraksError::config("'tagName' must not be empty"));
        }

        for (field, patterns) in [
            ("excludeDirs", &self.exclude_dirs),
            ("excludeFiles", &self.exclude_files),
        ] {
            for pattern in patterns {
                Pattern::new(pattern).map_err(|e| {
                    TraksError::config(format!(
                        "invalid glob pattern in '{}': \"{}\" ({})",
                        field, pattern, e
                    ))
                })?;
            }
        }

        Ok(())
    }

    pub fn normalizer(&self) -> TraksResult<SignatureNormalizer> {
        SignatureNormalizer::from_version(self.signature_normalizer_version)
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Config file that was loaded, or `None` when using defaults.
    pub path: Option<PathBuf>,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
