use std::collections::{BTreeMap, HashMap, HashSet};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::{Entry, Registry, Translation, TranslationBody, WRAPPER_TAG};
use crate::core::{extract::Fragment, location::SourceRef};

/// Fragments found this run, keyed by the relative path of the scanned file.
/// Files without fragments are present with an empty list.
pub type Observations = BTreeMap<String, Vec<Fragment>>;

/// Where brand-new entries go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InsertMode {
    /// Next to the entries used by neighbouring fragments.
    #[default]
    RelativeInsert,
    /// At the end of the registry.
    Append,
}

#[derive(Debug, Clone)]
pub struct ReconcileOptions<'a> {
    /// Languages that get a stub translation in new entries.
    pub langs: &'a [String],
    pub insert_mode: InsertMode,
    pub indent: &'a str,
    /// Import mode: no deletion marking and no restoration.
    pub patch_mode: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub added: usize,
    pub deleted: usize,
    pub restored: usize,
}

impl ReconcileSummary {
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.deleted == 0 && self.restored == 0
    }
}

/// Bring `registry` in line with `observed`.
///
/// `exists` answers whether a referenced file (relative path) is still on
/// disk; it is asked at most once per path.
pub fn reconcile(
    registry: &mut Registry,
    observed: &Observations,
    options: &ReconcileOptions,
    mut exists: impl FnMut(&str) -> bool,
) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();
    let known: HashSet<String> = registry.entries.iter().map(|e| e.key.clone()).collect();

    // Discovery, in path order then document order.
    let mut seen_refs: HashMap<&str, Vec<SourceRef>> = HashMap::new();
    let mut new_entries: Vec<Entry> = Vec::new();
    let mut new_index: HashMap<&str, usize> = HashMap::new();
    for fragment in observed.values().flatten() {
        seen_refs
            .entry(fragment.key.as_str())
            .or_default()
            .push(fragment.loc.clone());

        if known.contains(&fragment.key) {
            continue;
        }
        match new_index.get(fragment.key.as_str()) {
            Some(&i) => new_entries[i].refs.push(fragment.loc.clone()),
            None => {
                new_index.insert(fragment.key.as_str(), new_entries.len());
                new_entries.push(new_entry(fragment, options));
            }
        }
    }

    let mut exists_cache: HashMap<String, bool> = HashMap::new();
    let mut still_exists = |file: &str| -> bool {
        if let Some(&cached) = exists_cache.get(file) {
            return cached;
        }
        let result = exists(file);
        exists_cache.insert(file.to_string(), result);
        result
    };

    for entry in &mut registry.entries {
        let mut refs: Vec<SourceRef> = entry
            .refs
            .iter()
            .filter(|r| !observed.contains_key(&r.file) && still_exists(&r.file))
            .cloned()
            .collect();
        if let Some(seen) = seen_refs.get(entry.key.as_str()) {
            refs.extend(seen.iter().cloned());
        }
        refs.sort();
        refs.dedup();
        entry.refs = refs;

        if options.patch_mode {
            continue;
        }
        if entry.refs.is_empty() && !entry.is_deleted {
            entry.is_deleted = true;
            summary.deleted += 1;
        } else if !entry.refs.is_empty() && entry.is_deleted {
            entry.is_deleted = false;
            summary.restored += 1;
        }
    }

    for mut entry in new_entries {
        entry.refs.sort();
        entry.refs.dedup();
        summary.added += 1;
        match options.insert_mode {
            InsertMode::Append => registry.entries.push(entry),
            InsertMode::RelativeInsert => {
                let index = entry
                    .refs
                    .first()
                    .map_or(0, |anchor| insertion_index(&registry.entries, anchor));
                registry.entries.insert(index, entry);
            }
        }
    }

    summary
}

fn new_entry(fragment: &Fragment, options: &ReconcileOptions) -> Entry {
    let body = if fragment.is_multiline {
        TranslationBody::Block(block_template(&fragment.lines, options.indent))
    } else {
        TranslationBody::Expression {
            code: format!("<{0}>{1}</{0}>", WRAPPER_TAG, fragment.body),
            inline_children: Some(fragment.body.clone()),
        }
    };

    Entry {
        key: fragment.key.clone(),
        deps: fragment.deps.clone(),
        context: fragment.context.clone(),
        is_new: true,
        is_deleted: false,
        refs: vec![fragment.loc.clone()],
        metadata: Vec::new(),
        translations: options
            .langs
            .iter()
            .map(|lang| Translation {
                lang: lang.clone(),
                body: body.clone(),
            })
            .collect(),
        line: 0,
    }
}

/// `{ return ( <O>...</O> ); }` laid out at entry depth.
fn block_template(lines: &[String], indent: &str) -> String {
    let tab = |n: usize| indent.repeat(n);
    let (first, rest) = lines.split_first().map_or(("", &[][..]), |(f, r)| (f.as_str(), r));
    let (last, middle) = rest.split_last().map_or(("", &[][..]), |(l, m)| (l.as_str(), m));

    let mut out = String::from("{\n");
    out.push_str(&format!("{}return (\n", tab(3)));
    out.push_str(&format!("{}<{}>{}\n", tab(4), WRAPPER_TAG, first));
    for line in middle {
        out.push_str(&format!("{}{}\n", tab(4), line));
    }
    out.push_str(&format!("{}{}</{}>\n", tab(4), last, WRAPPER_TAG));
    out.push_str(&format!("{});\n", tab(3)));
    out.push_str(&format!("{}}}", tab(2)));
    out
}

/// Position for a new entry whose first reference is `anchor`.
///
/// In order of preference: right after the entry with the closest reference
/// earlier in the same file; right before the entry with the first reference
/// in the same file; right after the entry with the greatest reference in a
/// file sorting before the anchor's file; the front.
fn insertion_index(entries: &[Entry], anchor: &SourceRef) -> usize {
    let mut closest_before: Option<(usize, usize)> = None;
    let mut lowest_line: Option<(usize, usize)> = None;
    let mut preceding_file: Option<(&SourceRef, usize)> = None;

    for (i, entry) in entries.iter().enumerate() {
        for r in &entry.refs {
            if r.file != anchor.file {
                if r.file < anchor.file && preceding_file.is_none_or(|(best, _)| r >= best) {
                    preceding_file = Some((r, i));
                }
                continue;
            }
            if lowest_line.is_none_or(|(line, _)| r.line < line) {
                lowest_line = Some((r.line, i));
            }
            if r.line < anchor.line {
                let distance = anchor.line - r.line;
                if closest_before.is_none_or(|(best, _)| distance < best) {
                    closest_before = Some((distance, i));
                }
            }
        }
    }

    if let Some((_, i)) = closest_before {
        i + 1
    } else if let Some((_, i)) = lowest_line {
        i
    } else if let Some((_, i)) = preceding_file {
        i + 1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::{
        extract::{FragmentProcessor, SignatureNormalizer, extract_fragments},
        parsers::jsx::parse_jsx_source,
        registry::parse_registry,
    };

    fn scan(files: &[(&str, &str)]) -> Observations {
        let processor = FragmentProcessor::new("T", SignatureNormalizer::V0);
        files
            .iter()
            .map(|(path, code)| {
                let source = parse_jsx_source(code.to_string(), path).unwrap();
                (path.to_string(), extract_fragments(&source, &processor).unwrap())
            })
            .collect()
    }

    fn options(langs: &[String], insert_mode: InsertMode) -> ReconcileOptions<'_> {
        ReconcileOptions {
            langs,
            insert_mode,
            indent: "\t",
            patch_mode: false,
        }
    }

    fn empty_registry() -> Registry {
        parse_registry("export default {\n}\n".to_string(), "src/traks-translations.js").unwrap()
    }

    fn keys(registry: &Registry) -> Vec<&str> {
        registry.entries.iter().map(|e| e.key.as_str()).collect()
    }

    fn entry_with_ref(key: &str, file: &str, line: usize) -> Entry {
        Entry {
            key: key.to_string(),
            deps: Vec::new(),
            context: String::new(),
            is_new: false,
            is_deleted: false,
            refs: vec![SourceRef::new(file, line)],
            metadata: Vec::new(),
            translations: Vec::new(),
            line: 0,
        }
    }

    #[test]
    fn test_new_entries_from_empty_registry() {
        let langs = vec!["en".to_string(), "da".to_string()];
        let observed = scan(&[(
            "src/app.jsx",
            "const a = <T>foo</T>;\nconst b = <T>Hi {name}</T>;\nconst c = <T>foo</T>;\n",
        )]);
        let mut registry = empty_registry();
        let summary = reconcile(&mut registry, &observed, &options(&langs, InsertMode::Append), |_| true);

        assert_eq!(summary, ReconcileSummary { added: 2, deleted: 0, restored: 0 });
        assert_eq!(
            registry.render("\t"),
            "export default {
\t\"e5410e122e8c\": {
\t\t\"_new\": true, // FIXME remove this line when translation is done
\t\t\"_refs\": [\"src/app.jsx:1\", \"src/app.jsx:3\"],
\t\t\"en\": () => <O>foo</O>,
\t\t\"da\": () => <O>foo</O>,
\t},

\t\"f03784233a38\": {
\t\t\"_new\": true, // FIXME remove this line when translation is done
\t\t\"_refs\": [\"src/app.jsx:2\"],
\t\t\"en\": (name) => <O>Hi {name}</O>,
\t\t\"da\": (name) => <O>Hi {name}</O>,
\t},
}
"
        );
    }

    #[test]
    fn test_multiline_fragment_gets_block_template() {
        let langs = vec!["en".to_string()];
        let observed = scan(&[(
            "src/app.jsx",
            "function A() {\n\treturn (\n\t\t<T>\n\t\t\tHello\n\t\t\t<b>world</b>\n\t\t</T>\n\t);\n}\n",
        )]);
        let mut registry = empty_registry();
        reconcile(&mut registry, &observed, &options(&langs, InsertMode::Append), |_| true);

        assert_eq!(
            registry.entries[0].translations[0].body,
            TranslationBody::Block(
                "{\n\t\t\treturn (\n\t\t\t\t<O>\n\t\t\t\t\tHello\n\t\t\t\t\t<b>world</b>\n\t\t\t\t</O>\n\t\t\t);\n\t\t}"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let langs = vec!["en".to_string()];
        let observed = scan(&[
            ("src/a.jsx", "const a = <T>one</T>;\nconst b = <T context=\"x\">two {n}</T>;\n"),
            ("src/b.jsx", "const c = <T>\n\tthree\n</T>;\n"),
        ]);
        let mut registry = empty_registry();
        let opts = options(&langs, InsertMode::RelativeInsert);
        reconcile(&mut registry, &observed, &opts, |_| true);
        let first = registry.render("\t");

        let mut reparsed = parse_registry(first.clone(), "src/traks-translations.js").unwrap();
        let summary = reconcile(&mut reparsed, &observed, &opts, |_| true);
        assert!(summary.is_unchanged());
        assert_eq!(reparsed.render("\t"), first);
    }

    #[test]
    fn test_deletion_and_restoration() {
        let langs = vec!["en".to_string()];
        let opts = options(&langs, InsertMode::Append);
        let with_tag = scan(&[("src/a.jsx", "const a = <T>foo</T>;\n")]);
        let without_tag = scan(&[("src/a.jsx", "const a = null;\n")]);

        let mut registry = empty_registry();
        reconcile(&mut registry, &with_tag, &opts, |_| true);
        let original_body = registry.entries[0].translations.clone();

        let summary = reconcile(&mut registry, &without_tag, &opts, |_| true);
        assert_eq!(summary, ReconcileSummary { added: 0, deleted: 1, restored: 0 });
        assert!(registry.entries[0].is_deleted);
        assert!(registry.entries[0].refs.is_empty());

        let summary = reconcile(&mut registry, &with_tag, &opts, |_| true);
        assert_eq!(summary, ReconcileSummary { added: 0, deleted: 0, restored: 1 });
        assert!(!registry.entries[0].is_deleted);
        assert_eq!(registry.entries[0].translations, original_body);
        assert_eq!(registry.entries.len(), 1);
    }

    #[test]
    fn test_refs_for_unscanned_and_vanished_files() {
        let langs = vec!["en".to_string()];
        let mut registry = empty_registry();
        let mut entry = entry_with_ref("e5410e122e8c", "src/kept.jsx", 4);
        entry.refs.push(SourceRef::new("src/gone.jsx", 1));
        registry.entries.push(entry);

        let observed = scan(&[("src/a.jsx", "const a = <T>foo</T>;\n")]);
        reconcile(&mut registry, &observed, &options(&langs, InsertMode::Append), |file| {
            file != "src/gone.jsx"
        });
        assert_eq!(
            registry.entries[0].refs,
            vec![SourceRef::new("src/a.jsx", 1), SourceRef::new("src/kept.jsx", 4)]
        );
    }

    #[test]
    fn test_patch_mode_never_deletes() {
        let langs = vec!["en".to_string()];
        let mut registry = empty_registry();
        registry.entries.push(entry_with_ref("aaa", "src/gone.jsx", 1));
        let opts = ReconcileOptions {
            patch_mode: true,
            ..options(&langs, InsertMode::Append)
        };
        let summary = reconcile(&mut registry, &Observations::new(), &opts, |_| false);
        assert!(summary.is_unchanged());
        assert!(registry.entries[0].refs.is_empty());
        assert!(!registry.entries[0].is_deleted);
    }

    #[test]
    fn test_relative_insertion_between_same_file_refs() {
        let entries = vec![
            entry_with_ref("k10", "fileA", 10),
            entry_with_ref("k30", "fileA", 30),
        ];
        assert_eq!(insertion_index(&entries, &SourceRef::new("fileA", 20)), 1);
        assert_eq!(insertion_index(&entries, &SourceRef::new("fileA", 40)), 2);
        assert_eq!(insertion_index(&entries, &SourceRef::new("fileA", 5)), 0);
    }

    #[test]
    fn test_relative_insertion_across_files() {
        let entries = vec![
            entry_with_ref("b", "src/b.jsx", 3),
            entry_with_ref("a", "src/a.jsx", 7),
            entry_with_ref("d", "src/d.jsx", 1),
        ];
        // after the greatest ref among files sorting before src/c.jsx
        assert_eq!(insertion_index(&entries, &SourceRef::new("src/c.jsx", 1)), 1);
        // no same-file refs and no preceding files
        assert_eq!(insertion_index(&entries, &SourceRef::new("src/0.jsx", 1)), 0);
        assert_eq!(insertion_index(&[], &SourceRef::new("src/a.jsx", 1)), 0);
    }

    #[test]
    fn test_relative_insert_end_to_end() {
        let langs = vec!["en".to_string()];
        let opts = options(&langs, InsertMode::RelativeInsert);
        let mut registry = empty_registry();
        reconcile(
            &mut registry,
            &scan(&[("src/a.jsx", "const a = <T>first</T>;\n\n\nconst c = <T>third</T>;\n")]),
            &opts,
            |_| true,
        );
        let before = keys(&registry).iter().map(|k| k.to_string()).collect::<Vec<_>>();

        reconcile(
            &mut registry,
            &scan(&[(
                "src/a.jsx",
                "const a = <T>first</T>;\nconst b = <T>second</T>;\n\nconst c = <T>third</T>;\n",
            )]),
            &opts,
            |_| true,
        );
        let after = keys(&registry);
        assert_eq!(after.len(), 3);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[1]);
        assert_eq!(registry.entries[1].refs, vec![SourceRef::new("src/a.jsx", 2)]);
    }
}
