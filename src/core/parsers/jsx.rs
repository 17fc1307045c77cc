use std::{path::Path, sync::Arc};

use swc_common::{BytePos, FileName, Globals, SourceMap, Span, Spanned};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

use crate::error::{TraksError, TraksResult};

/// A parsed JSX/TSX source file together with its text.
///
/// All spans in `module` point into `code`; use [`ParsedSource::slice`] and
/// [`ParsedSource::line`] instead of doing `BytePos` arithmetic by hand.
pub struct ParsedSource {
    /// Path as it appears in references (relative to the project root).
    pub path: String,
    pub code: String,
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    start_pos: BytePos,
}

impl ParsedSource {
    /// Byte offset of `pos` into `code`.
    pub fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.start_pos.0) as usize
    }

    /// 1-indexed line of `pos`.
    pub fn line(&self, pos: BytePos) -> usize {
        self.source_map.lookup_char_pos(pos).line
    }

    /// 0-indexed character column of `pos`.
    pub fn col(&self, pos: BytePos) -> usize {
        self.source_map.lookup_char_pos(pos).col.0
    }

    /// Source text covered by `span`.
    pub fn slice(&self, span: Span) -> &str {
        self.code
            .get(self.offset(span.lo)..self.offset(span.hi))
            .unwrap_or_default()
    }

    /// The full physical line containing `pos`, without its line break.
    pub fn line_text(&self, pos: BytePos) -> &str {
        let offset = self.offset(pos).min(self.code.len());
        let start = self.code[..offset].rfind('\n').map_or(0, |i| i + 1);
        let end = self.code[offset..]
            .find('\n')
            .map_or(self.code.len(), |i| offset + i);
        self.code[start..end].trim_end_matches('\r')
    }

    /// Build a usage error pointing at `span`.
    pub fn usage_error(&self, span: Span, message: impl Into<String>) -> TraksError {
        TraksError::Usage {
            file: self.path.clone(),
            line: self.line(span.lo),
            col: self.col(span.lo),
            message: message.into(),
            source_line: self.line_text(span.lo).to_string(),
        }
    }
}

fn syntax_for(path: &str) -> Syntax {
    let is_plain_ts = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ts"));

    Syntax::Typescript(TsSyntax {
        tsx: !is_plain_ts,
        ..Default::default()
    })
}

/// Parse JSX/TSX source code into an AST.
///
/// `.ts` files are parsed without JSX so that angle-bracket casts keep working;
/// everything else (`.js`, `.jsx`, `.tsx`, ...) is parsed as TSX.
pub fn parse_jsx_source(code: String, file_path: &str) -> TraksResult<ParsedSource> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_map = Arc::new(SourceMap::default());
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code.clone());
        let start_pos = source_file.start_pos;

        let mut parser = Parser::new(syntax_for(file_path), StringInput::from(&*source_file), None);

        let to_error = |e: swc_ecma_parser::error::Error| TraksError::Parse {
            file: file_path.to_string(),
            line: source_map.lookup_char_pos(e.span().lo).line,
            message: format!("{:?}", e.kind()),
        };

        let module = parser.parse_module().map_err(to_error)?;

        // Recovered errors still mean the file is not what its author intended.
        if let Some(e) = parser.take_errors().into_iter().next() {
            return Err(to_error(e));
        }

        Ok(ParsedSource {
            path: file_path.to_string(),
            code,
            module,
            source_map,
            start_pos,
        })
    })
}
