//! Report formatting and printing.
//!
//! Errors are printed cargo-style to stderr; command summaries go to the
//! writer handed to [`Summary::print_to`].

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::{
    commands::{
        BuildSummary, ExportSummary, HashesSummary, ImportSummary, InitSummary, MigrateSummary,
        Summary, UpdateSummary,
    },
    exit_status::ExitStatus,
};
use crate::{core::registry::ReconcileSummary, error::TraksError};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print a command error to stderr.
pub fn print_error(err: &anyhow::Error, verbose: bool) {
    print_error_to(err, verbose, &mut io::stderr().lock());
}

/// Print a command error to a custom writer.
pub fn print_error_to<W: Write>(err: &anyhow::Error, verbose: bool, writer: &mut W) {
    match err.downcast_ref::<TraksError>() {
        Some(TraksError::Usage {
            file,
            line,
            col,
            message,
            source_line,
        }) => print_code_frame(writer, message, file, *line, *col, source_line),
        Some(traks_err) => {
            let _ = writeln!(writer, "{} {}", "error:".bold().red(), traks_err);
            if let Some((file, line)) = traks_err.location() {
                let _ = writeln!(writer, "  {} {}:{}", "-->".blue(), file, line);
            }
        }
        None => {
            let _ = writeln!(writer, "{} {}", "error:".bold().red(), err);
            if verbose {
                for cause in err.chain().skip(1) {
                    let _ = writeln!(writer, "  {} {}", "caused by:".bold(), cause);
                }
            }
        }
    }
}

fn print_code_frame<W: Write>(
    writer: &mut W,
    message: &str,
    file: &str,
    line: usize,
    col: usize,
    source_line: &str,
) {
    let gutter = line.to_string().len();

    let _ = writeln!(writer, "{} {}", "error:".bold().red(), message);
    let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), file, line, col + 1);
    let _ = writeln!(writer, "{:>width$} {}", "", "|".blue(), width = gutter);
    let _ = writeln!(
        writer,
        "{} {} {}",
        line.to_string().blue(),
        "|".blue(),
        source_line
    );

    let prefix: String = source_line.chars().take(col).collect();
    let _ = writeln!(
        writer,
        "{:>width$} {} {}{}",
        "",
        "|".blue(),
        " ".repeat(UnicodeWidthStr::width(prefix.as_str())),
        "^".red(),
        width = gutter
    );
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

fn describe_changes(changes: &ReconcileSummary) -> String {
    format!(
        "{} new, {} deleted, {} restored",
        changes.added, changes.deleted, changes.restored
    )
}

fn success<W: Write + ?Sized>(writer: &mut W, message: String) {
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), message.green());
}

impl Summary for InitSummary {
    fn print_to(&self, writer: &mut dyn Write) {
        for file in &self.created {
            success(writer, format!("Created {}", file));
        }
        for file in &self.kept {
            let _ = writeln!(writer, "{} {} already exists", "note:".bold().cyan(), file);
        }
    }
}

impl Summary for UpdateSummary {
    fn print_to(&self, writer: &mut dyn Write) {
        if self.created_stub {
            success(writer, format!("Created {}", self.translations_file));
        }
        let scanned = plural(self.files_scanned, "source file");
        if self.is_check {
            if self.is_dirty {
                let _ = writeln!(
                    writer,
                    "{} {} is out of date ({}; scanned {})",
                    FAILURE_MARK.red(),
                    self.translations_file,
                    describe_changes(&self.changes),
                    scanned
                );
            } else {
                success(
                    writer,
                    format!("{} is up to date (scanned {})", self.translations_file, scanned),
                );
            }
        } else if self.is_dirty {
            success(
                writer,
                format!(
                    "Updated {}: {} (scanned {})",
                    self.translations_file,
                    describe_changes(&self.changes),
                    scanned
                ),
            );
        } else {
            success(
                writer,
                format!("{} is up to date (scanned {})", self.translations_file, scanned),
            );
        }
    }

    fn exit_status(&self) -> ExitStatus {
        if self.is_check && self.is_dirty {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}

impl Summary for HashesSummary {
    fn print_to(&self, writer: &mut dyn Write) {
        for (file, line, key) in &self.locations {
            let _ = writeln!(writer, "{}:{}\t{}", file, line, key);
        }
    }
}

impl Summary for ExportSummary {
    fn print_to(&self, writer: &mut dyn Write) {
        success(
            writer,
            format!(
                "Exported {} to {}",
                plural(self.entry_count, "translation entry").replace("entrys", "entries"),
                self.output
            ),
        );
    }
}

impl Summary for ImportSummary {
    fn print_to(&self, writer: &mut dyn Write) {
        let outcome = if self.written {
            format!("Updated {}", self.translations_file)
        } else {
            format!("{} unchanged", self.translations_file)
        };
        success(
            writer,
            format!(
                "Imported {}: {}",
                plural(self.patched_count, "translation"),
                outcome
            ),
        );
    }
}

impl Summary for MigrateSummary {
    fn print_to(&self, writer: &mut dyn Write) {
        for (old, new) in &self.renamed {
            let _ = writeln!(writer, "Mapped key {} to {}", old, new);
        }
        let outcome = if self.written { "Updated" } else { "Checked" };
        success(
            writer,
            format!(
                "{} {}: {} re-keyed; {}",
                outcome,
                self.translations_file,
                plural(self.renamed.len(), "entry").replace("entrys", "entries"),
                describe_changes(&self.changes)
            ),
        );
        if self.from_version != self.to_version {
            let _ = writeln!(
                writer,
                "{} set \"signatureNormalizerVersion\": {} in your config (was {})",
                "note:".bold().cyan(),
                self.to_version,
                self.from_version
            );
        }
    }
}

impl Summary for BuildSummary {
    fn print_to(&self, writer: &mut dyn Write) {
        for output in &self.printed {
            let _ = write!(writer, "{}", output);
        }
        if self.written.is_empty() {
            return;
        }
        let mode = if self.bake_langs.is_empty() {
            "tagged".to_string()
        } else {
            format!("baked [{}]", self.bake_langs.join(", "))
        };
        for file in &self.written {
            success(writer, format!("Wrote {} ({})", file, mode));
        }
    }
}
