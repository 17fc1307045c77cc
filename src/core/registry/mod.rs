//! The translations registry.
//!
//! The registry is a JS module whose default export maps keys to entries:
//!
//! ```text
//! export default {
//!     "e5410e122e8c": {
//!         "#note": "shown in the header",
//!         "_new": true, // FIXME remove this line when translation is done
//!         "_refs": ["src/app.jsx:3"],
//!         "en": () => <O>foo</O>,
//!         "da": () => <O>fu</O>,
//!     },
//! }
//! ```
//!
//! Everything before `export` is preamble and survives rewrites untouched, as do
//! function bodies and `#`-prefixed fields. All other fields are rebuilt.

mod parser;
mod patch;
mod reconcile;
mod remap;
mod writer;

use crate::core::location::SourceRef;

pub use parser::parse_registry;
pub use patch::{
    ExportDocument, ExportedEntry, ExportedTranslation, PatchAttrValue, PatchNode, export_document,
    import_patch, render_nodes,
};
pub use reconcile::{InsertMode, Observations, ReconcileOptions, ReconcileSummary, reconcile};
pub use remap::{KeyMap, remap_keys};

/// Name of the wrapper element every translation body renders into.
pub const WRAPPER_TAG: &str = "O";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationBody {
    /// `{ ... }` statement block, verbatim including braces.
    Block(String),
    /// Expression body, verbatim including any surrounding parentheses.
    Expression {
        code: String,
        /// Children of the body's element when the body can replace a tag
        /// in place (every name it uses is a parameter).
        inline_children: Option<String>,
    },
}

impl TranslationBody {
    pub fn code(&self) -> &str {
        match self {
            TranslationBody::Block(code) | TranslationBody::Expression { code, .. } => code,
        }
    }

    pub fn is_inlinable(&self) -> bool {
        self.inline_children().is_some()
    }

    pub fn inline_children(&self) -> Option<&str> {
        match self {
            TranslationBody::Expression {
                inline_children: Some(children),
                ..
            } => Some(children),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub lang: String,
    pub body: TranslationBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    /// Parameter list shared by every language's function.
    pub deps: Vec<String>,
    pub context: String,
    pub is_new: bool,
    pub is_deleted: bool,
    /// Sorted and unique.
    pub refs: Vec<SourceRef>,
    /// `#`-prefixed fields as written, e.g. `"#note": "menu label"`.
    pub metadata: Vec<String>,
    pub translations: Vec<Translation>,
    /// Line of the entry in the registry file; 0 for entries created this run.
    pub line: usize,
}

impl Entry {
    pub fn translation(&self, lang: &str) -> Option<&Translation> {
        self.translations.iter().find(|t| t.lang == lang)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    /// Registry path as used in error messages.
    pub path: String,
    pub preamble: String,
    pub entries: Vec<Entry>,
}

impl Registry {
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Translation of `key` in `lang`, if both exist.
    pub fn lookup(&self, key: &str, lang: &str) -> Option<&Translation> {
        self.get(key).and_then(|e| e.translation(lang))
    }

    /// First of `langs` that `key` has a translation for.
    pub fn lookup_first<'a>(&'a self, key: &str, langs: &[String]) -> Option<&'a Translation> {
        let entry = self.get(key)?;
        langs.iter().find_map(|lang| entry.translation(lang))
    }
}
