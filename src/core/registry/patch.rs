//! Export of translation bodies to JSON, and import of edited exports.
//!
//! Each translation is exported as the children of its `<O>` wrapper elements.
//! Nodes are tagged arrays:
//!
//! ```text
//! ["TEXT", "raw text"]
//! ["TAG", "b", [["title", ["A:TEXT", "\"", "hi"]]], [...children]]
//! ["EXPR", "{count}"]
//! ```
//!
//! Attribute values are `["A:TEXT", quote, value]`, `["A:EXPR", "{code}"]` or
//! `["A:BOOL"]` for valueless attributes.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use swc_common::Spanned;
use swc_ecma_ast::{
    JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElement, JSXElementChild, JSXElementName,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::{Registry, WRAPPER_TAG, parser::parse_body};
use crate::{
    core::parsers::jsx::{ParsedSource, parse_jsx_source},
    error::{TraksError, TraksResult},
};

/// HTML elements that never have children.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Prefix that turns a lone function body into a parseable module.
const STUB_PREFIX: &str = "()=>";

/// Text newlines are re-indented to the depth of a block body's wrapper.
const TEXT_INDENT_DEPTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub list: Vec<ExportedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedEntry {
    pub key: String,
    /// Optional in patches; when present it overrides the entry's flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub translations: Vec<ExportedTranslation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedTranslation {
    pub lang: String,
    /// Children of each `<O>` element of the body, in document order.
    pub nodes: Vec<Vec<PatchNode>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Value", try_from = "Value")]
pub enum PatchNode {
    Text(String),
    Tag {
        name: String,
        attrs: Vec<(String, PatchAttrValue)>,
        children: Vec<PatchNode>,
    },
    Expr(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Value", try_from = "Value")]
pub enum PatchAttrValue {
    Text { quote: String, value: String },
    Expr(String),
    Bool,
}

impl From<PatchNode> for Value {
    fn from(node: PatchNode) -> Self {
        match node {
            PatchNode::Text(text) => json!(["TEXT", text]),
            PatchNode::Tag {
                name,
                attrs,
                children,
            } => {
                let attrs: Vec<Value> = attrs
                    .into_iter()
                    .map(|(name, value)| json!([name, Value::from(value)]))
                    .collect();
                let children: Vec<Value> = children.into_iter().map(Value::from).collect();
                json!(["TAG", name, attrs, children])
            }
            PatchNode::Expr(code) => json!(["EXPR", code]),
        }
    }
}

impl From<PatchAttrValue> for Value {
    fn from(value: PatchAttrValue) -> Self {
        match value {
            PatchAttrValue::Text { quote, value } => json!(["A:TEXT", quote, value]),
            PatchAttrValue::Expr(code) => json!(["A:EXPR", code]),
            PatchAttrValue::Bool => json!(["A:BOOL"]),
        }
    }
}

fn as_string(value: &Value, what: &str) -> Result<String, String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("expected a string for {}, got {}", what, value))
}

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, String> {
    value
        .as_array()
        .ok_or_else(|| format!("expected an array for {}, got {}", what, value))
}

impl TryFrom<Value> for PatchNode {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let items = as_array(&value, "node")?;
        match items.first().and_then(Value::as_str) {
            Some("TEXT") if items.len() == 2 => Ok(PatchNode::Text(as_string(&items[1], "TEXT")?)),
            Some("EXPR") if items.len() == 2 => Ok(PatchNode::Expr(as_string(&items[1], "EXPR")?)),
            Some("TAG") if items.len() == 4 => {
                let name = as_string(&items[1], "tag name")?;
                let attrs = as_array(&items[2], "tag attributes")?
                    .iter()
                    .map(|attr| {
                        let pair = as_array(attr, "attribute")?;
                        match pair.as_slice() {
                            [name, value] => Ok((
                                as_string(name, "attribute name")?,
                                PatchAttrValue::try_from(value.clone())?,
                            )),
                            _ => Err(format!("expected [name, value] attribute, got {}", attr)),
                        }
                    })
                    .collect::<Result<Vec<_>, String>>()?;
                let children = as_array(&items[3], "tag children")?
                    .iter()
                    .map(|child| PatchNode::try_from(child.clone()))
                    .collect::<Result<Vec<_>, String>>()?;
                Ok(PatchNode::Tag {
                    name,
                    attrs,
                    children,
                })
            }
            _ => Err(format!("unhandled node: {}", value)),
        }
    }
}

impl TryFrom<Value> for PatchAttrValue {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let items = as_array(&value, "attribute value")?;
        match items.first().and_then(Value::as_str) {
            Some("A:TEXT") if items.len() == 3 => Ok(PatchAttrValue::Text {
                quote: as_string(&items[1], "attribute quote")?,
                value: as_string(&items[2], "attribute text")?,
            }),
            Some("A:EXPR") if items.len() == 2 => {
                Ok(PatchAttrValue::Expr(as_string(&items[1], "A:EXPR")?))
            }
            Some("A:BOOL") if items.len() == 1 => Ok(PatchAttrValue::Bool),
            _ => Err(format!("unhandled attribute type: {}", value)),
        }
    }
}

/// One `<O>` element found in a function body.
struct WrapperSlot {
    /// Byte range of the element within the body.
    range: Range<usize>,
    children: Vec<PatchNode>,
}

struct SlotFinder<'a> {
    source: &'a ParsedSource,
    slots: Vec<WrapperSlot>,
    error: Option<String>,
}

impl SlotFinder<'_> {
    fn export_children(&mut self, children: &[JSXElementChild]) -> Vec<PatchNode> {
        children.iter().map(|child| self.export_node(child)).collect()
    }

    fn export_node(&mut self, child: &JSXElementChild) -> PatchNode {
        match child {
            JSXElementChild::JSXText(text) => PatchNode::Text(self.source.slice(text.span).to_string()),
            JSXElementChild::JSXElement(element) => {
                let name = match &element.opening.name {
                    JSXElementName::Ident(ident) => ident.sym.to_string(),
                    other => self.source.slice(other.span()).to_string(),
                };
                let mut attrs = Vec::with_capacity(element.opening.attrs.len());
                for attr in &element.opening.attrs {
                    let JSXAttrOrSpread::JSXAttr(attr) = attr else {
                        self.error
                            .get_or_insert_with(|| "spread attributes cannot be exported".to_string());
                        continue;
                    };
                    let attr_name = match &attr.name {
                        JSXAttrName::Ident(ident) => ident.sym.to_string(),
                        JSXAttrName::JSXNamespacedName(ns) => format!("{}:{}", ns.ns.sym, ns.name.sym),
                    };
                    let value = match &attr.value {
                        None => PatchAttrValue::Bool,
                        Some(JSXAttrValue::Str(s)) => {
                            let raw = self.source.slice(s.span);
                            PatchAttrValue::Text {
                                quote: raw.chars().next().map(String::from).unwrap_or_default(),
                                value: s.value.as_str().unwrap_or_default().to_string(),
                            }
                        }
                        Some(other) => PatchAttrValue::Expr(self.source.slice(other.span()).to_string()),
                    };
                    attrs.push((attr_name, value));
                }
                PatchNode::Tag {
                    name,
                    attrs,
                    children: self.export_children(&element.children),
                }
            }
            other => PatchNode::Expr(self.source.slice(other.span()).to_string()),
        }
    }
}

impl Visit for SlotFinder<'_> {
    fn visit_jsx_element(&mut self, node: &JSXElement) {
        if let JSXElementName::Ident(ident) = &node.opening.name
            && &*ident.sym == WRAPPER_TAG
        {
            let start = self.source.offset(node.span.lo).saturating_sub(STUB_PREFIX.len());
            let end = self.source.offset(node.span.hi).saturating_sub(STUB_PREFIX.len());
            let children = self.export_children(&node.children);
            self.slots.push(WrapperSlot {
                range: start..end,
                children,
            });
            return;
        }
        node.visit_children_with(self);
    }
}

fn wrapper_slots(body: &str) -> Result<Vec<WrapperSlot>, String> {
    let source = parse_jsx_source(format!("{}{}", STUB_PREFIX, body), "body.jsx")
        .map_err(|e| e.to_string())?;
    let mut finder = SlotFinder {
        source: &source,
        slots: Vec::new(),
        error: None,
    };
    source.module.visit_with(&mut finder);
    match finder.error {
        Some(e) => Err(e),
        None => Ok(finder.slots),
    }
}

/// Export every translation body of `registry`.
pub fn export_document(registry: &Registry) -> TraksResult<ExportDocument> {
    let mut list = Vec::with_capacity(registry.entries.len());
    for entry in &registry.entries {
        let mut translations = Vec::with_capacity(entry.translations.len());
        for translation in &entry.translations {
            let slots =
                wrapper_slots(translation.body.code()).map_err(|message| TraksError::Patch {
                    key: entry.key.clone(),
                    lang: translation.lang.clone(),
                    message,
                })?;
            translations.push(ExportedTranslation {
                lang: translation.lang.clone(),
                nodes: slots.into_iter().map(|slot| slot.children).collect(),
            });
        }
        list.push(ExportedEntry {
            key: entry.key.clone(),
            is_new: Some(entry.is_new),
            is_deleted: entry.is_deleted,
            translations,
        });
    }
    Ok(ExportDocument { list })
}

/// Splice `patch` into the bodies of `registry`. Returns the number of
/// translations that were rewritten.
///
/// Keys and languages missing from the registry are skipped.
pub fn import_patch(registry: &mut Registry, patch: &ExportDocument, indent: &str) -> TraksResult<usize> {
    let mut patched = 0;
    for patch_entry in &patch.list {
        let Some(entry) = registry.entries.iter_mut().find(|e| e.key == patch_entry.key) else {
            continue;
        };
        if let Some(is_new) = patch_entry.is_new {
            entry.is_new = is_new;
        }

        for patch_translation in &patch_entry.translations {
            let Some(translation) = entry
                .translations
                .iter_mut()
                .find(|t| t.lang == patch_translation.lang)
            else {
                continue;
            };
            let key = entry.key.clone();
            let lang = translation.lang.clone();
            let error = |message: String| TraksError::Patch {
                key: key.clone(),
                lang: lang.clone(),
                message,
            };

            let is_inlinable = translation.body.is_inlinable();
            let expected = patch_translation.nodes.len();
            let locate = |body: &str| -> Result<Vec<WrapperSlot>, String> {
                let slots = wrapper_slots(body)?;
                if slots.len() != expected {
                    return Err(format!(
                        "found unexpected number of <{}>-tags: expected {}, found {}",
                        WRAPPER_TAG,
                        expected,
                        slots.len()
                    ));
                }
                if is_inlinable && expected != 1 {
                    return Err(format!(
                        "expected exactly one <{}>-tag in an inlinable body, but the patch has {}",
                        WRAPPER_TAG, expected
                    ));
                }
                Ok(slots)
            };

            let mut body = translation.body.code().to_string();
            for (i, nodes) in patch_translation.nodes.iter().enumerate() {
                let slots = locate(&body).map_err(error)?;
                let replacement = format!(
                    "<{0}>{1}</{0}>",
                    WRAPPER_TAG,
                    render_nodes(nodes, indent)
                );
                body.replace_range(slots[i].range.clone(), &replacement);
            }
            locate(&body).map_err(error)?;

            let new_body =
                parse_body(&body, &entry.deps, "patch").map_err(|e| error(e.to_string()))?;
            translation.body = new_body;
            patched += 1;
        }
    }
    Ok(patched)
}

/// Render patch nodes back to JSX source.
pub fn render_nodes(nodes: &[PatchNode], indent: &str) -> String {
    nodes.iter().map(|node| render_node(node, indent)).collect()
}

fn render_node(node: &PatchNode, indent: &str) -> String {
    match node {
        PatchNode::Text(text) => {
            let newline = format!("\n{}", indent.repeat(TEXT_INDENT_DEPTH));
            text.replace("\r\n", "\n")
                .replace('\r', "\n")
                .replace('\n', &newline)
        }
        PatchNode::Expr(code) => code.clone(),
        PatchNode::Tag {
            name,
            attrs,
            children,
        } => {
            let mut attr_code = String::new();
            for (attr_name, value) in attrs {
                attr_code.push(' ');
                attr_code.push_str(attr_name);
                match value {
                    PatchAttrValue::Text { quote, value } => {
                        attr_code.push('=');
                        attr_code.push_str(quote);
                        attr_code.push_str(&escape_attr(value));
                        attr_code.push_str(quote);
                    }
                    PatchAttrValue::Expr(code) => {
                        attr_code.push('=');
                        attr_code.push_str(code);
                    }
                    PatchAttrValue::Bool => {}
                }
            }
            if VOID_ELEMENTS.contains(&name.to_lowercase().as_str()) {
                format!("<{}{}/>", name, attr_code)
            } else {
                format!(
                    "<{0}{1}>{2}</{0}>",
                    name,
                    attr_code,
                    render_nodes(children, indent)
                )
            }
        }
    }
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace("\r\n", "&#13;")
        .replace(['\r', '\n'], "&#13;")
}
