use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::core::registry::{Registry, parse_registry};

/// The translations file on disk together with its parsed registry.
///
/// The file is rewritten only when the rendered registry differs from what
/// was read, and always through a rename so readers never see half a file.
pub struct RegistryFile {
    file_path: PathBuf,
    original: String,
    pub registry: Registry,
}

impl RegistryFile {
    /// Open and parse the translations file. `display_path` names it in errors
    /// and refs.
    pub fn open(path: &Path, display_path: &str) -> Result<Self> {
        let original = fs::read_to_string(path)
            .with_context(|| format!("Failed to read translations file: {}", path.display()))?;
        let registry = parse_registry(original.clone(), display_path)?;
        Ok(Self {
            file_path: path.to_path_buf(),
            original,
            registry,
        })
    }

    /// The registry as it would be written.
    pub fn render(&self, indent: &str) -> String {
        self.registry.render(indent)
    }

    /// Whether saving would change the file.
    pub fn is_dirty(&self, indent: &str) -> bool {
        self.render(indent) != self.original
    }

    /// Write the registry back. Returns `false` when the file was already up
    /// to date.
    pub fn save(&mut self, indent: &str) -> Result<bool> {
        let content = self.render(indent);
        if content == self.original {
            return Ok(false);
        }
        write_atomic(&self.file_path, &content)?;
        self.original = content;
        Ok(true)
    }
}

/// Replace `path` with `content` via a temporary file in the same directory.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in: {}", dir.display()))?;
    temp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    temp.persist(path)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(())
}
