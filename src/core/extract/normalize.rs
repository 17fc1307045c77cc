//! Signature normalizers.
//!
//! Keys already issued with an old normalizer must stay reproducible, so
//! versions are append-only: add a new variant, never change an existing one.

use std::{fmt, sync::LazyLock};

use regex::Regex;

use crate::error::{TraksError, TraksResult};

static LEADING_WS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?mR)^[ \t]+").unwrap());
static TRAILING_WS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?mR)[ \t]+$").unwrap());
static WS_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// Whitespace policy used to turn a fragment body into its signature body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignatureNormalizer {
    /// Trims and collapses horizontal whitespace; line breaks are significant.
    V0,
    /// Like `V0`, but line breaks (and carriage returns) are insignificant too.
    V1,
}

impl SignatureNormalizer {
    pub const LATEST: SignatureNormalizer = SignatureNormalizer::V1;

    pub fn from_version(version: u32) -> TraksResult<Self> {
        match version {
            0 => Ok(Self::V0),
            1 => Ok(Self::V1),
            other => Err(TraksError::config(format!(
                "invalid signature normalizer version: {} (known versions: 0, 1)",
                other
            ))),
        }
    }

    pub fn version(self) -> u32 {
        match self {
            Self::V0 => 0,
            Self::V1 => 1,
        }
    }

    pub fn normalize(self, body: &str) -> String {
        match self {
            Self::V0 => collapse(&trim_lines(body)),
            Self::V1 => {
                let body = body.replace('\r', "");
                collapse(&trim_lines(&body).replace('\n', " "))
            }
        }
    }
}

impl fmt::Display for SignatureNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.version())
    }
}

fn trim_lines(s: &str) -> String {
    let s = LEADING_WS_REGEX.replace_all(s, "");
    TRAILING_WS_REGEX.replace_all(&s, "").into_owned()
}

fn collapse(s: &str) -> String {
    WS_RUN_REGEX.replace_all(s, " ").into_owned()
}
