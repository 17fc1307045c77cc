//! Free-variable capture for translation bodies.
//!
//! A translation body is re-rendered later from a registry function whose
//! parameters are the captured names, so everything the body references from
//! its surrounding scope must be visible statically.

use std::collections::BTreeSet;

use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, ClassExpr, ComputedPropName, Expr, FnExpr, GetterProp, Ident, JSXAttrName,
    JSXClosingElement, JSXElement, JSXElementChild, JSXElementName, JSXObject,
    MemberExpr, MemberProp, MethodProp, PropName, SetterProp, ThisExpr, TsType,
};
use swc_ecma_visit::{Visit, VisitWith};

/// Construct that makes static dependency analysis impossible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    SelfReference,
    InlineFunction,
    NestedTag,
}

impl Violation {
    pub fn message(self) -> &'static str {
        match self {
            Violation::SelfReference => "'this' is not allowed within <T>-tags",
            Violation::InlineFunction => "translation tags cannot have inline functions",
            Violation::NestedTag => "translation <T>-tags cannot be nested",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureError {
    pub span: Span,
    pub violation: Violation,
}

/// Collects the names a JSX subtree needs from its enclosing scope.
///
/// Only the first violation is kept; traversal stops descending into the
/// offending node.
pub struct DependencyCollector<'a> {
    /// Translation tag name; `None` when nested tags are acceptable.
    tag_name: Option<&'a str>,
    deps: BTreeSet<String>,
    error: Option<CaptureError>,
}

impl<'a> DependencyCollector<'a> {
    pub fn new(tag_name: Option<&'a str>) -> Self {
        Self {
            tag_name,
            deps: BTreeSet::new(),
            error: None,
        }
    }

    pub fn finish(self) -> Result<BTreeSet<String>, CaptureError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.deps),
        }
    }

    fn fail(&mut self, span: Span, violation: Violation) {
        if self.error.is_none() {
            self.error = Some(CaptureError { span, violation });
        }
    }

    fn add(&mut self, name: &str) {
        if !self.deps.contains(name) {
            self.deps.insert(name.to_string());
        }
    }

    fn add_component(&mut self, name: &str) {
        if is_component_name(name) {
            self.add(name);
        }
    }

    /// A computed key or property is a dependency unless it is a bare name.
    fn visit_computed_key(&mut self, computed: &ComputedPropName) {
        let mut expr = &*computed.expr;
        while let Expr::Paren(paren) = expr {
            expr = &paren.expr;
        }
        if !matches!(expr, Expr::Ident(_)) {
            expr.visit_with(self);
        }
    }
}

/// Capture dependencies of every node in `children`.
pub fn capture_children(
    children: &[JSXElementChild],
    tag_name: Option<&str>,
) -> Result<BTreeSet<String>, CaptureError> {
    let mut collector = DependencyCollector::new(tag_name);
    for child in children {
        child.visit_with(&mut collector);
    }
    collector.finish()
}

fn is_component_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| !c.is_lowercase())
}

fn jsx_object_segments<'a>(object: &'a JSXObject, out: &mut Vec<&'a str>) {
    match object {
        JSXObject::Ident(ident) => out.push(&ident.sym),
        JSXObject::JSXMemberExpr(member) => {
            jsx_object_segments(&member.obj, out);
            out.push(&member.prop.sym);
        }
    }
}

impl Visit for DependencyCollector<'_> {
    fn visit_this_expr(&mut self, node: &ThisExpr) {
        self.fail(node.span, Violation::SelfReference);
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        self.fail(node.span, Violation::InlineFunction);
    }

    fn visit_fn_expr(&mut self, node: &FnExpr) {
        self.fail(node.function.span, Violation::InlineFunction);
    }

    fn visit_class_expr(&mut self, node: &ClassExpr) {
        self.fail(node.class.span, Violation::InlineFunction);
    }

    fn visit_method_prop(&mut self, node: &MethodProp) {
        self.fail(node.function.span, Violation::InlineFunction);
    }

    fn visit_getter_prop(&mut self, node: &GetterProp) {
        self.fail(node.span, Violation::InlineFunction);
    }

    fn visit_setter_prop(&mut self, node: &SetterProp) {
        self.fail(node.span, Violation::InlineFunction);
    }

    fn visit_jsx_element(&mut self, node: &JSXElement) {
        if let (Some(tag_name), JSXElementName::Ident(ident)) = (self.tag_name, &node.opening.name)
            && &*ident.sym == tag_name
        {
            self.fail(node.span(), Violation::NestedTag);
            return;
        }
        node.visit_children_with(self);
    }

    /// Every capitalized segment of a tag name: `<Icons.Star>` needs both.
    fn visit_jsx_element_name(&mut self, node: &JSXElementName) {
        match node {
            JSXElementName::Ident(ident) => self.add_component(&ident.sym),
            JSXElementName::JSXMemberExpr(member) => {
                let mut segments = Vec::new();
                jsx_object_segments(&member.obj, &mut segments);
                segments.push(&member.prop.sym);
                for segment in segments {
                    self.add_component(segment);
                }
            }
            JSXElementName::JSXNamespacedName(name) => {
                self.add_component(&name.ns.sym);
                self.add_component(&name.name.sym);
            }
        }
    }

    fn visit_jsx_attr_name(&mut self, node: &JSXAttrName) {
        match node {
            JSXAttrName::Ident(ident) => self.add_component(&ident.sym),
            JSXAttrName::JSXNamespacedName(name) => {
                self.add_component(&name.ns.sym);
                self.add_component(&name.name.sym);
            }
        }
    }

    // Only the object of a member access is a dependency: `a[b]` needs `a`.
    fn visit_member_expr(&mut self, node: &MemberExpr) {
        node.obj.visit_with(self);
        if let MemberProp::Computed(computed) = &node.prop {
            self.visit_computed_key(computed);
        }
    }

    fn visit_prop_name(&mut self, node: &PropName) {
        if let PropName::Computed(computed) = node {
            self.visit_computed_key(computed);
        }
    }


    // The closing name always repeats the opening one.
    fn visit_jsx_closing_element(&mut self, _node: &JSXClosingElement) {}

    fn visit_ts_type(&mut self, _node: &TsType) {}

    fn visit_ident(&mut self, node: &Ident) {
        self.add(&node.sym);
    }
}
