use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use colored::Colorize;
use rayon::prelude::*;

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        extract::{Fragment, FragmentProcessor, SignatureNormalizer, extract_fragments},
        file_scanner::scan_files,
        parsers::jsx::parse_jsx_source,
        registry::{Observations, ReconcileOptions},
    },
};

/// Configuration and source files of one project.
///
/// # Configuration Priority
///
/// 1. CLI arguments (e.g. `--translations-file`)
/// 2. `.traksrc.json`, searched from the source root upwards
/// 3. Built-in defaults
pub struct ProjectContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Project root; every configured path is relative to it.
    pub root_dir: PathBuf,

    /// Source files to scan, relative to `root_dir` and sorted.
    pub files: Vec<String>,

    pub verbose: bool,
}

impl ProjectContext {
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let verbose = common_args.verbose;

        let root_dir = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let config_result = load_config(&root_dir)?;
        if verbose {
            match &config_result.path {
                Some(path) => eprintln!("{} using {}", "note:".bold().cyan(), path.display()),
                None => eprintln!(
                    "{} no {} found, using default configuration",
                    "note:".bold().cyan(),
                    CONFIG_FILE_NAME
                ),
            }
        }

        let mut config = config_result.config;
        if let Some(ref translations_file) = common_args.translations_file {
            config.translations_file = translations_file.clone();
        }
        if let Some(version) = common_args.normalizer_version {
            config.signature_normalizer_version = version;
        }
        if let Some(insert_mode) = common_args.insert_mode {
            config.insert_mode = insert_mode;
        }
        config.validate()?;

        let scan_result = scan_files(
            &root_dir,
            &config.src_dirs,
            &config.extensions,
            &config.exclude_dirs,
            &config.exclude_files,
            verbose,
        );

        if scan_result.skipped_count > 0 {
            eprintln!(
                "{} {} path(s) skipped due to access errors{}",
                "warning:".bold().yellow(),
                scan_result.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        let translations_file = normalize_relative(&config.translations_file);
        let files: Vec<String> = scan_result
            .files
            .into_iter()
            .filter(|f| *f != translations_file)
            .collect();

        if verbose {
            eprintln!(
                "{} {} source file(s) in {}",
                "note:".bold().cyan(),
                files.len(),
                config.src_dirs.join(", ")
            );
        }

        Ok(Self {
            config,
            root_dir,
            files,
            verbose,
        })
    }

    /// Fragment processor for the configured tag and normalizer.
    pub fn processor(&self) -> Result<FragmentProcessor> {
        Ok(FragmentProcessor::new(
            self.config.tag_name.clone(),
            self.config.normalizer()?,
        ))
    }

    pub fn normalizer(&self) -> Result<SignatureNormalizer> {
        Ok(self.config.normalizer()?)
    }

    /// Absolute (or root-relative) path of a project-relative path.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root_dir.join(relative)
    }

    pub fn translations_path(&self) -> PathBuf {
        self.resolve(&self.config.translations_file)
    }

    /// Translations file as it appears in messages, e.g. `src/traks-translations.js`.
    pub fn translations_display(&self) -> String {
        normalize_relative(&self.config.translations_file)
    }

    pub fn file_exists(&self, relative: &str) -> bool {
        self.resolve(relative).is_file()
    }

    pub fn reconcile_options(&self, patch_mode: bool) -> ReconcileOptions<'_> {
        ReconcileOptions {
            langs: &self.config.langs,
            insert_mode: self.config.insert_mode,
            indent: &self.config.indent,
            patch_mode,
        }
    }

    /// Read, parse and extract every source file in parallel.
    ///
    /// Every scanned file gets an entry, even without fragments. The first
    /// failing file in path order aborts the scan.
    pub fn observe(&self, processor: &FragmentProcessor) -> Result<Observations> {
        let results: Vec<(String, Result<Vec<Fragment>>)> = self
            .files
            .par_iter()
            .map(|file_path| (file_path.clone(), self.extract_file(file_path, processor)))
            .collect();

        let mut observations = Observations::new();
        for (file_path, result) in results {
            observations.insert(file_path, result?);
        }
        Ok(observations)
    }

    fn extract_file(&self, file_path: &str, processor: &FragmentProcessor) -> Result<Vec<Fragment>> {
        let path = self.resolve(file_path);
        let code = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let source = parse_jsx_source(code, file_path)?;
        Ok(extract_fragments(&source, processor)?)
    }
}

/// `./src//a.js` -> `src/a.js`
pub fn normalize_relative(path: &str) -> String {
    Path::new(path)
        .components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
