use std::path::Path;

use colored::Colorize;
use glob::Pattern;
use walkdir::{DirEntry, WalkDir};

/// Result of scanning files.
pub struct ScanResult {
    /// Paths relative to the project root, `/`-separated and sorted.
    pub files: Vec<String>,
    pub skipped_count: usize,
}

fn compile_patterns(patterns: &[String], verbose: bool) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                if verbose {
                    eprintln!(
                        "{} Invalid exclude pattern '{}': {}",
                        "warning:".bold().yellow(),
                        p,
                        e
                    );
                }
                None
            }
        })
        .collect()
}

fn matches_name(patterns: &[Pattern], entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    patterns.iter().any(|p| p.matches(&name))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Collect source files under `src_dirs` (relative to `root_dir`).
///
/// Directory and file exclusions are glob patterns matched against the base
/// name, so `node_modules` excludes that directory at any depth.
pub fn scan_files(
    root_dir: &Path,
    src_dirs: &[String],
    extensions: &[String],
    exclude_dirs: &[String],
    exclude_files: &[String],
    verbose: bool,
) -> ScanResult {
    let mut files = Vec::new();
    let mut skipped_count = 0;

    let dir_patterns = compile_patterns(exclude_dirs, verbose);
    let file_patterns = compile_patterns(exclude_files, verbose);

    for src_dir in src_dirs {
        let dir = root_dir.join(src_dir);
        if !dir.exists() {
            if verbose {
                eprintln!(
                    "{} Source directory does not exist: {}",
                    "warning:".bold().yellow(),
                    dir.display()
                );
            }
            continue;
        }

        let walker = WalkDir::new(&dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !(e.file_type().is_dir() && e.depth() > 0 && matches_name(&dir_patterns, e)));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    if verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };

            if !entry.file_type().is_file() || matches_name(&file_patterns, &entry) {
                continue;
            }
            if has_extension(entry.path(), extensions) {
                files.push(relative_path(root_dir, entry.path()));
            }
        }
    }

    files.sort();
    files.dedup();

    ScanResult {
        files,
        skipped_count,
    }
}
