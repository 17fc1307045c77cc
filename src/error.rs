//! Error taxonomy for the extraction and reconciliation engine.
//!
//! Every variant is fatal for the operation that raised it. Each one carries
//! enough location context (file and line, or key) to find the offending
//! fragment or registry entry without re-running anything.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraksError {
    /// A translation tag is used in a way the extractor cannot support
    /// (bad attribute, nesting, inline function, `this`, ...).
    #[error("at {file}:{line}: {message}")]
    Usage {
        file: String,
        line: usize,
        /// 0-based character column of the offending node.
        col: usize,
        message: String,
        /// The physical source line, for code frames.
        source_line: String,
    },

    /// The host parser rejected a source file.
    #[error("failed to parse {file}:{line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    /// The translations file violates its structural contract.
    #[error("corrupt translations file at {file}:{line}: {reason}")]
    CorruptRegistry {
        file: String,
        line: usize,
        reason: String,
    },

    /// Baking found no translation for any candidate language.
    #[error("at {file}:{line}: translation not found: lookup({key:?}, {langs:?}) failed")]
    LookupMiss {
        key: String,
        langs: Vec<String>,
        file: String,
        line: usize,
    },

    /// An import patch does not fit the function body it targets.
    #[error("cannot apply patch to {key} ({lang}): {message}")]
    Patch {
        key: String,
        lang: String,
        message: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl TraksError {
    pub fn corrupt(file: &str, line: usize, reason: impl Into<String>) -> Self {
        TraksError::CorruptRegistry {
            file: file.to_string(),
            line,
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        TraksError::Config(message.into())
    }

    /// Location of the error as `file:line`, when it has one.
    pub fn location(&self) -> Option<(&str, usize)> {
        match self {
            TraksError::Usage { file, line, .. }
            | TraksError::Parse { file, line, .. }
            | TraksError::CorruptRegistry { file, line, .. }
            | TraksError::LookupMiss { file, line, .. } => Some((file, *line)),
            TraksError::Patch { .. } | TraksError::Config(_) => None,
        }
    }
}

pub type TraksResult<T> = std::result::Result<T, TraksError>;
