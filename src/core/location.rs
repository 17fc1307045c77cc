use std::fmt;

use crate::error::{TraksError, TraksResult};

/// A reference from a registry entry back to a fragment occurrence.
///
/// Ordering is by file path, then line, which is also the order `_refs`
/// arrays are written in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceRef {
    pub file: String,
    /// 1-based.
    pub line: usize,
}

impl SourceRef {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Parse a `path:line` string as written in `_refs`.
    ///
    /// The split happens at the last colon so that paths containing colons
    /// still round-trip.
    pub fn parse(s: &str) -> Option<Self> {
        let (file, line) = s.rsplit_once(':')?;
        if file.is_empty() {
            return None;
        }
        let line = line.parse().ok().filter(|&l: &usize| l > 0)?;
        Some(Self::new(file, line))
    }

    pub fn parse_or_corrupt(s: &str, registry_file: &str, registry_line: usize) -> TraksResult<Self> {
        Self::parse(s).ok_or_else(|| {
            TraksError::corrupt(
                registry_file,
                registry_line,
                format!("invalid reference {:?} in '_refs' (expected \"path:line\")", s),
            )
        })
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}
