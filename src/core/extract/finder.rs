use swc_ecma_ast::JSXElement;
use swc_ecma_visit::{Visit, VisitWith};

use super::fragment::{Fragment, FragmentProcessor};
use crate::{
    core::parsers::jsx::ParsedSource,
    error::{TraksError, TraksResult},
};

/// Walks a module and processes every outermost translation tag.
///
/// Tags nested inside another translation tag are not visited here; the
/// processor rejects them while capturing the outer tag's dependencies.
struct TagFinder<'a> {
    source: &'a ParsedSource,
    processor: &'a FragmentProcessor,
    fragments: Vec<Fragment>,
    error: Option<TraksError>,
}

impl Visit for TagFinder<'_> {
    fn visit_jsx_element(&mut self, node: &JSXElement) {
        if self.error.is_some() {
            return;
        }
        if self.processor.is_translation_tag(&node.opening.name) {
            match self.processor.process(self.source, node) {
                Ok(fragment) => self.fragments.push(fragment),
                Err(e) => self.error = Some(e),
            }
            return;
        }
        node.visit_children_with(self);
    }
}

/// Extract all fragments of a parsed file, in document order.
pub fn extract_fragments(
    source: &ParsedSource,
    processor: &FragmentProcessor,
) -> TraksResult<Vec<Fragment>> {
    let mut finder = TagFinder {
        source,
        processor,
        fragments: Vec::new(),
        error: None,
    };
    source.module.visit_with(&mut finder);

    match finder.error {
        Some(e) => Err(e),
        None => Ok(finder.fragments),
    }
}
