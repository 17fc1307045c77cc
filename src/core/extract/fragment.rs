use std::{collections::BTreeSet, ops::Range};

use sha2::{Digest, Sha256};
use swc_common::Spanned;
use swc_ecma_ast::{
    Expr, JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElement, JSXElementName,
    JSXExpr, Lit,
};

use super::{deps::capture_children, normalize::SignatureNormalizer};
use crate::{
    core::{location::SourceRef, parsers::jsx::ParsedSource},
    error::TraksResult,
};

/// Number of hex digits of the SHA-256 digest kept as key.
pub const KEY_LENGTH: usize = 12;

/// One occurrence of a translation tag in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Source text between the opening and the closing tag, verbatim.
    pub body: String,
    pub context: String,
    /// Sorted and unique.
    pub deps: Vec<String>,
    pub signature: String,
    pub key: String,
    pub is_multiline: bool,
    /// Body lines with the tag's own indentation removed. Holds the whole
    /// body as a single line for one-line fragments.
    pub lines: Vec<String>,
    pub loc: SourceRef,
    /// Byte range of the whole element in its source file.
    pub range: Range<usize>,
    /// The framework `key` attribute as written, e.g. `key={item.id}`.
    pub key_attr: Option<String>,
}

pub fn signature_of(normalized_body: &str, context: &str, deps: &[String]) -> String {
    format!("{}\0{}\0{}", normalized_body, context, deps.join(","))
}

pub fn key_of(signature: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(signature.as_bytes()));
    digest[..KEY_LENGTH].to_string()
}

/// Turns translation tags into [`Fragment`]s.
#[derive(Debug, Clone)]
pub struct FragmentProcessor {
    tag_name: String,
    normalizer: SignatureNormalizer,
}

impl FragmentProcessor {
    pub fn new(tag_name: impl Into<String>, normalizer: SignatureNormalizer) -> Self {
        Self {
            tag_name: tag_name.into(),
            normalizer,
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn normalizer(&self) -> SignatureNormalizer {
        self.normalizer
    }

    pub fn with_normalizer(&self, normalizer: SignatureNormalizer) -> Self {
        Self {
            tag_name: self.tag_name.clone(),
            normalizer,
        }
    }

    pub fn is_translation_tag(&self, name: &JSXElementName) -> bool {
        matches!(name, JSXElementName::Ident(ident) if *ident.sym == *self.tag_name)
    }

    pub fn process(&self, source: &ParsedSource, element: &JSXElement) -> TraksResult<Fragment> {
        let span = element.span;
        if !self.is_translation_tag(&element.opening.name) {
            return Err(source.usage_error(
                span,
                format!("expected a <{}> element", self.tag_name),
            ));
        }
        let Some(closing) = &element.closing else {
            return Err(source.usage_error(
                span,
                format!(
                    "translation tags need a body: <{0}>...</{0}>",
                    self.tag_name
                ),
            ));
        };

        let mut deps = BTreeSet::new();
        let mut context = String::new();
        let mut key_attr = None;

        for attr in &element.opening.attrs {
            let attr = match attr {
                JSXAttrOrSpread::JSXAttr(attr) => attr,
                JSXAttrOrSpread::SpreadElement(spread) => {
                    return Err(source.usage_error(
                        spread.expr.span(),
                        "spread attributes are not allowed on translation tags",
                    ));
                }
            };
            match attr_name(attr).as_str() {
                "deps" => deps.extend(explicit_deps(source, attr)?),
                "context" => context = context_value(source, attr)?,
                "key" => key_attr = Some(source.slice(attr.span).to_string()),
                "style" | "__self" | "__source" => {}
                name => {
                    return Err(
                        source.usage_error(span, format!("invalid attribute name: '{}'", name))
                    );
                }
            }
        }

        let captured = capture_children(&element.children, Some(&self.tag_name))
            .map_err(|e| source.usage_error(e.span, e.violation.message()))?;
        deps.extend(captured);
        let deps: Vec<String> = deps.into_iter().collect();

        let body_range = source.offset(element.opening.span.hi)..source.offset(closing.span.lo);
        let body = source.code[body_range].to_string();

        let signature = signature_of(&self.normalizer.normalize(&body), &context, &deps);
        let key = key_of(&signature);

        let start_line = source.line(span.lo);
        let is_multiline = source.line(span.hi) > start_line;
        let lines = if is_multiline {
            let indent = leading_indent(source.line_text(span.lo));
            body.split('\n')
                .map(|line| line.strip_prefix(indent).unwrap_or(line).to_string())
                .collect()
        } else {
            vec![body.clone()]
        };

        Ok(Fragment {
            body,
            context,
            deps,
            signature,
            key,
            is_multiline,
            lines,
            loc: SourceRef::new(source.path.clone(), start_line),
            range: source.offset(span.lo)..source.offset(span.hi),
            key_attr,
        })
    }
}

fn attr_name(attr: &JSXAttr) -> String {
    match &attr.name {
        JSXAttrName::Ident(ident) => ident.sym.to_string(),
        JSXAttrName::JSXNamespacedName(ns) => format!("{}:{}", ns.ns.sym, ns.name.sym),
    }
}

/// Horizontal whitespace at the start of `line`.
fn leading_indent(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

fn explicit_deps(source: &ParsedSource, attr: &JSXAttr) -> TraksResult<Vec<String>> {
    let Some(JSXAttrValue::JSXExprContainer(container)) = &attr.value else {
        let span = attr.value.as_ref().map_or(attr.span, |v| v.span());
        return Err(source.usage_error(span, "expected jsx expression for 'deps' attribute"));
    };
    let JSXExpr::Expr(expr) = &container.expr else {
        return Err(source.usage_error(
            container.span,
            "expected jsx expression containing array for 'deps' attribute",
        ));
    };
    let Expr::Array(array) = &**expr else {
        return Err(source.usage_error(
            expr.span(),
            "expected jsx expression containing array for 'deps' attribute",
        ));
    };

    let mut names = Vec::new();
    for element in &array.elems {
        match element {
            Some(e) if e.spread.is_none() => match &*e.expr {
                Expr::Ident(ident) => names.push(ident.sym.to_string()),
                other => {
                    return Err(source.usage_error(
                        other.span(),
                        format!(
                            "expected Identifier in 'deps' array, got {}",
                            describe_expr(other)
                        ),
                    ));
                }
            },
            Some(e) => {
                return Err(source.usage_error(
                    e.expr.span(),
                    "expected Identifier in 'deps' array, got spread element",
                ));
            }
            None => {
                return Err(source.usage_error(
                    array.span,
                    "expected Identifier in 'deps' array, got empty slot",
                ));
            }
        }
    }
    Ok(names)
}

fn context_value(source: &ParsedSource, attr: &JSXAttr) -> TraksResult<String> {
    if let Some(JSXAttrValue::Str(s)) = &attr.value
        && let Some(value) = s.value.as_str()
    {
        return Ok(value.to_string());
    }
    let span = attr.value.as_ref().map_or(attr.span, |v| v.span());
    Err(source.usage_error(span, "expected string literal for 'context' attribute"))
}

fn describe_expr(expr: &Expr) -> &'static str {
    match expr {
        Expr::Lit(Lit::Str(_)) => "string literal",
        Expr::Lit(Lit::Num(_)) => "numeric literal",
        Expr::Lit(_) => "literal",
        Expr::Member(_) | Expr::OptChain(_) => "member expression",
        Expr::Call(_) => "call expression",
        Expr::Object(_) => "object expression",
        Expr::Array(_) => "array expression",
        Expr::Tpl(_) => "template literal",
        Expr::This(_) => "this expression",
        _ => "expression",
    }
}
