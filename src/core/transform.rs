//! Build-time substitution of translation tags.
//!
//! Fragments are never rewritten in the AST. Each one becomes a
//! [`Replacement`] over the original source text, and all replacements of a
//! file are spliced in a single pass.

use std::ops::Range;

use swc_ecma_ast::{JSXAttrValue, PropName, Str};
use swc_ecma_visit::{Visit, VisitWith};

use crate::{
    core::{
        extract::{Fragment, FragmentProcessor, extract_fragments},
        parsers::jsx::ParsedSource,
        registry::Registry,
    },
    error::{TraksError, TraksResult},
};

/// Replaced by `true` in baked builds and `false` otherwise.
pub const MAGIC_IS_BAKED: &str = "TRAKS_COMPILE_TIME_MAGICK_CONST__IS_BAKED";
/// Replaced by the bake language in baked builds.
pub const MAGIC_LANG: &str = "TRAKS_COMPILE_TIME_MAGICK_CONST__LANG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub range: Range<usize>,
    pub text: String,
}

/// How translation tags are rewritten.
#[derive(Debug, Clone, Copy)]
pub enum BuildMode<'a> {
    /// Annotate each tag with its key and deps.
    Tag { keep_children: bool },
    /// Substitute each tag with its translation in the first of `langs`
    /// that has one.
    Bake {
        registry: &'a Registry,
        langs: &'a [String],
    },
}

impl BuildMode<'_> {
    fn bake_lang(&self) -> Option<&str> {
        match self {
            BuildMode::Tag { .. } => None,
            BuildMode::Bake { langs, .. } => langs.first().map(String::as_str),
        }
    }
}

fn key_deps_attrs(fragment: &Fragment) -> String {
    format!(
        " k=\"{}\" deps={{[{}]}}",
        fragment.key,
        fragment.deps.join(", ")
    )
}

fn key_attr(fragment: &Fragment) -> String {
    fragment
        .key_attr
        .as_ref()
        .map(|attr| format!(" {}", attr))
        .unwrap_or_default()
}

/// `<T k="…" deps={[…]}>` with the original children, or self-closing.
pub fn tag_fragment(fragment: &Fragment, tag_name: &str, keep_children: bool) -> Replacement {
    let attrs = format!("{}{}", key_deps_attrs(fragment), key_attr(fragment));
    let text = if keep_children {
        format!("<{0}{1}>{2}</{0}>", tag_name, attrs, fragment.body)
    } else {
        format!("<{}{}/>", tag_name, attrs)
    };
    Replacement {
        range: fragment.range.clone(),
        text,
    }
}

/// Substitute `fragment` with its translation.
///
/// An inlinable translation replaces the tag's children and drops `k` and
/// `deps`. Any other translation leaves an empty tag that is resolved by key
/// at runtime.
pub fn bake_fragment(
    fragment: &Fragment,
    registry: &Registry,
    langs: &[String],
    tag_name: &str,
) -> TraksResult<Replacement> {
    let translation =
        registry
            .lookup_first(&fragment.key, langs)
            .ok_or_else(|| TraksError::LookupMiss {
                key: fragment.key.clone(),
                langs: langs.to_vec(),
                file: fragment.loc.file.clone(),
                line: fragment.loc.line,
            })?;

    let text = match translation.body.inline_children() {
        Some(children) => format!("<{0}{1}>{2}</{0}>", tag_name, key_attr(fragment), children),
        None => format!(
            "<{0}{1}{2}></{0}>",
            tag_name,
            key_deps_attrs(fragment),
            key_attr(fragment)
        ),
    };
    Ok(Replacement {
        range: fragment.range.clone(),
        text,
    })
}

struct MagicFinder<'a> {
    source: &'a ParsedSource,
    bake_lang: Option<&'a str>,
    skip: &'a [Range<usize>],
    replacements: Vec<Replacement>,
}

impl MagicFinder<'_> {
    fn replacement_value(&self, s: &Str) -> Option<String> {
        match s.value.as_str()? {
            MAGIC_IS_BAKED => Some(self.bake_lang.is_some().to_string()),
            MAGIC_LANG => self
                .bake_lang
                .map(|lang| serde_json::Value::String(lang.to_string()).to_string()),
            _ => None,
        }
    }

    fn push(&mut self, s: &Str, wrap: bool) {
        let Some(value) = self.replacement_value(s) else {
            return;
        };
        let start = self.source.offset(s.span.lo);
        if self.skip.iter().any(|r| r.contains(&start)) {
            return;
        }
        let text = if wrap { format!("{{{}}}", value) } else { value };
        self.replacements.push(Replacement {
            range: start..self.source.offset(s.span.hi),
            text,
        });
    }
}

impl Visit for MagicFinder<'_> {
    fn visit_str(&mut self, node: &Str) {
        self.push(node, false);
    }

    fn visit_jsx_attr_value(&mut self, node: &JSXAttrValue) {
        match node {
            JSXAttrValue::Str(s) => self.push(s, true),
            _ => node.visit_children_with(self),
        }
    }

    fn visit_prop_name(&mut self, node: &PropName) {
        if let PropName::Computed(computed) = node {
            computed.visit_with(self);
        }
    }
}

/// Replacements for the compile-time magic string literals of `source`,
/// leaving literals inside `skip` ranges alone.
pub fn magic_replacements(
    source: &ParsedSource,
    bake_lang: Option<&str>,
    skip: &[Range<usize>],
) -> Vec<Replacement> {
    let mut finder = MagicFinder {
        source,
        bake_lang,
        skip,
        replacements: Vec::new(),
    };
    source.module.visit_with(&mut finder);
    finder.replacements
}

/// Splice `replacements` into `code`. Ranges must not overlap.
pub fn apply_replacements(code: &str, mut replacements: Vec<Replacement>) -> String {
    replacements.sort_by_key(|r| r.range.start);
    let mut out = String::with_capacity(code.len());
    let mut cursor = 0;
    for replacement in replacements {
        out.push_str(&code[cursor..replacement.range.start]);
        out.push_str(&replacement.text);
        cursor = replacement.range.end;
    }
    out.push_str(&code[cursor..]);
    out
}

/// Rewrite every translation tag and magic string of `source`.
pub fn transform_source(
    source: &ParsedSource,
    processor: &FragmentProcessor,
    mode: BuildMode<'_>,
) -> TraksResult<String> {
    let fragments = extract_fragments(source, processor)?;
    let tag_name = processor.tag_name();

    let mut replacements = Vec::with_capacity(fragments.len());
    for fragment in &fragments {
        let replacement = match mode {
            BuildMode::Tag { keep_children } => tag_fragment(fragment, tag_name, keep_children),
            BuildMode::Bake { registry, langs } => {
                bake_fragment(fragment, registry, langs, tag_name)?
            }
        };
        replacements.push(replacement);
    }

    let skip: Vec<Range<usize>> = fragments.iter().map(|f| f.range.clone()).collect();
    replacements.extend(magic_replacements(source, mode.bake_lang(), &skip));

    Ok(apply_replacements(&source.code, replacements))
}
