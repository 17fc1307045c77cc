use std::collections::HashSet;

use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, BlockStmtOrExpr, Expr, ExprOrSpread, Lit, ModuleDecl, ModuleItem, ObjectLit, Pat,
    Prop, PropName, PropOrSpread, Stmt, Str,
};

use super::{Entry, Registry, Translation, TranslationBody};
use crate::{
    core::{
        extract::capture_children,
        location::SourceRef,
        parsers::jsx::{ParsedSource, parse_jsx_source},
    },
    error::{TraksError, TraksResult},
};

/// Parse registry source text. Nothing is returned unless the whole file is valid.
pub fn parse_registry(code: String, file_path: &str) -> TraksResult<Registry> {
    let source = parse_jsx_source(code, file_path)?;
    RegistryParser { source: &source }.parse()
}

/// Parse a lone function body, as if it were written `(params) => code`.
pub(crate) fn parse_body(code: &str, params: &[String], file_path: &str) -> TraksResult<TranslationBody> {
    let source = parse_jsx_source(format!("({}) => {}", params.join(", "), code), file_path)?;
    let parser = RegistryParser { source: &source };
    match source.module.body.as_slice() {
        [ModuleItem::Stmt(Stmt::Expr(stmt))] => match &*stmt.expr {
            Expr::Arrow(arrow) => parser.translation_function(arrow).map(|(_, body)| body),
            other => Err(parser.corrupt(other.span(), "expected a function body")),
        },
        _ => Err(TraksError::corrupt(file_path, 1, "expected a single function body")),
    }
}

struct RegistryParser<'a> {
    source: &'a ParsedSource,
}

impl RegistryParser<'_> {
    fn corrupt(&self, span: Span, reason: impl Into<String>) -> TraksError {
        TraksError::corrupt(&self.source.path, self.source.line(span.lo), reason)
    }

    fn parse(&self) -> TraksResult<Registry> {
        let mut export = None;
        for item in &self.source.module.body {
            match item {
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(e)) => {
                    if export.is_some() {
                        return Err(self.corrupt(e.span, "found multiple default exports"));
                    }
                    export = Some(e);
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(d)) => {
                    return Err(self.corrupt(d.span, "expected an object literal as default export"));
                }
                _ => {}
            }
        }
        let Some(export) = export else {
            return Err(TraksError::corrupt(&self.source.path, 1, "found no default export"));
        };
        let Expr::Object(object) = &*export.expr else {
            return Err(self.corrupt(export.expr.span(), "expected an object literal as default export"));
        };

        let preamble = self.source.code[..self.source.offset(export.span.lo)].to_string();

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(object.props.len());
        for prop in &object.props {
            let (key_name, value, span) = self.key_value(prop)?;
            if !seen.insert(key_name.clone()) {
                return Err(self.corrupt(span, format!("duplicate key {:?}", key_name)));
            }
            let Expr::Object(fields) = value else {
                return Err(self.corrupt(value.span(), format!("expected an object for key {:?}", key_name)));
            };
            let mut entry = self.entry(key_name, fields)?;
            entry.line = self.source.line(span.lo);
            entries.push(entry);
        }

        Ok(Registry {
            path: self.source.path.clone(),
            preamble,
            entries,
        })
    }

    fn key_value<'p>(&self, prop: &'p PropOrSpread) -> TraksResult<(String, &'p Expr, Span)> {
        let PropOrSpread::Prop(prop) = prop else {
            return Err(self.corrupt(prop.span(), "spread is not allowed here"));
        };
        let Prop::KeyValue(kv) = &**prop else {
            return Err(self.corrupt(prop.span(), "expected a \"key\": value property"));
        };
        let name = match &kv.key {
            PropName::Str(s) => self.string(s)?,
            PropName::Ident(ident) => ident.sym.to_string(),
            other => return Err(self.corrupt(other.span(), "expected a string or identifier key")),
        };
        Ok((name, &kv.value, prop.span()))
    }

    fn string(&self, s: &Str) -> TraksResult<String> {
        s.value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.corrupt(s.span, "string is not valid unicode"))
    }

    fn entry(&self, key: String, fields: &ObjectLit) -> TraksResult<Entry> {
        let mut entry = Entry {
            key,
            deps: Vec::new(),
            context: String::new(),
            is_new: false,
            is_deleted: false,
            refs: Vec::new(),
            metadata: Vec::new(),
            translations: Vec::new(),
            line: 0,
        };
        let mut params: Option<Vec<String>> = None;

        for field in &fields.props {
            let (name, value, span) = self.key_value(field)?;
            match name.as_str() {
                n if n.starts_with('#') => {
                    entry.metadata.push(self.source.slice(span).to_string());
                }
                "_new" => entry.is_new = self.flag(&name, value)?,
                "_deleted" => entry.is_deleted = self.flag(&name, value)?,
                "_context" => match value {
                    Expr::Lit(Lit::Str(s)) => entry.context = self.string(s)?,
                    other => {
                        return Err(self.corrupt(other.span(), "expected a string for '_context'"));
                    }
                },
                "_refs" => entry.refs = self.refs(value)?,
                _ => {
                    let Expr::Arrow(arrow) = value else {
                        return Err(self.corrupt(
                            value.span(),
                            format!("expected an arrow function for language {:?}", name),
                        ));
                    };
                    let (fn_params, body) = self.translation_function(arrow)?;
                    match &params {
                        None => params = Some(fn_params),
                        Some(earlier) if *earlier != fn_params => {
                            return Err(self.corrupt(
                                arrow.span,
                                "function param mismatch with earlier function; all must be identical",
                            ));
                        }
                        Some(_) => {}
                    }
                    entry.translations.push(Translation {
                        lang: name.clone(),
                        body,
                    });
                }
            }
        }

        entry.deps = params.unwrap_or_default();
        Ok(entry)
    }

    fn flag(&self, name: &str, value: &Expr) -> TraksResult<bool> {
        match value {
            Expr::Lit(Lit::Bool(b)) if b.value => Ok(true),
            other => Err(self.corrupt(
                other.span(),
                format!("only 'true' is a valid value for {}", name),
            )),
        }
    }

    fn refs(&self, value: &Expr) -> TraksResult<Vec<SourceRef>> {
        let Expr::Array(array) = value else {
            return Err(self.corrupt(value.span(), "expected an array for '_refs'"));
        };
        let mut refs = Vec::with_capacity(array.elems.len());
        for element in &array.elems {
            let s = match element {
                Some(ExprOrSpread { spread: None, expr }) => match &**expr {
                    Expr::Lit(Lit::Str(s)) => s,
                    other => {
                        return Err(self.corrupt(other.span(), "expected only strings in '_refs'"));
                    }
                },
                _ => return Err(self.corrupt(array.span, "expected only strings in '_refs'")),
            };
            let text = self.string(s)?;
            refs.push(SourceRef::parse_or_corrupt(
                &text,
                &self.source.path,
                self.source.line(s.span.lo),
            )?);
        }
        refs.sort();
        refs.dedup();
        Ok(refs)
    }

    fn translation_function(&self, arrow: &ArrowExpr) -> TraksResult<(Vec<String>, TranslationBody)> {
        if arrow.is_async || arrow.is_generator {
            return Err(self.corrupt(arrow.span, "translation functions must be plain arrow functions"));
        }
        let mut params = Vec::with_capacity(arrow.params.len());
        for param in &arrow.params {
            match param {
                Pat::Ident(binding) => params.push(binding.id.sym.to_string()),
                other => {
                    return Err(self.corrupt(other.span(), "expected an identifier parameter"));
                }
            }
        }

        let body = match &*arrow.body {
            BlockStmtOrExpr::BlockStmt(block) => {
                TranslationBody::Block(self.source.slice(block.span).to_string())
            }
            BlockStmtOrExpr::Expr(expr) => TranslationBody::Expression {
                code: self.source.slice(expr.span()).to_string(),
                inline_children: self.inline_children(expr, &params)?,
            },
        };
        Ok((params, body))
    }

    /// Children text of an element body that only uses the function's parameters.
    fn inline_children(&self, expr: &Expr, params: &[String]) -> TraksResult<Option<String>> {
        let mut expr = expr;
        while let Expr::Paren(paren) = expr {
            expr = &paren.expr;
        }
        let Expr::JSXElement(element) = expr else {
            return Ok(None);
        };
        let captured = capture_children(&element.children, None)
            .map_err(|err| self.corrupt(err.span, err.violation.message()))?;
        if !captured.iter().all(|dep| params.contains(dep)) {
            return Ok(None);
        }
        Ok(Some(match &element.closing {
            Some(closing) => {
                let range = self.source.offset(element.opening.span.hi)
                    ..self.source.offset(closing.span.lo);
                self.source.code[range].to_string()
            }
            None => String::new(),
        }))
    }
}
