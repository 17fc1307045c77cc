use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Result};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

mod build;
mod hashes;
mod import_export;
mod init;
mod migrate;
mod update;

const BIN_NAME: &str = "traks";

/// Translations file path under the default configuration.
pub const TRANSLATIONS_FILE: &str = "src/traks-translations.js";

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn with_file(path: &str, content: &str) -> Result<Self> {
        let test = Self::new()?;
        test.write_file(path, content)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn remove_file(&self, path: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);
        fs::remove_file(&file_path)
            .with_context(|| format!("Failed to remove file: {}", file_path.display()))
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn update_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("update");
        cmd
    }

    /// Run `traks update` and fail the test unless it succeeds.
    pub fn update(&self) -> Result<Output> {
        let output = self.update_command().output()?;
        assert!(
            output.status.success(),
            "update failed. stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        Ok(output)
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }

    pub fn read_translations(&self) -> Result<String> {
        self.read_file(TRANSLATIONS_FILE)
    }

    /// The translations file with everything before the export statement removed.
    pub fn read_export_statement(&self) -> Result<String> {
        let content = self.read_translations()?;
        let start = content
            .find("export default {")
            .context("translations file has no export statement")?;
        Ok(content[start..].to_string())
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
