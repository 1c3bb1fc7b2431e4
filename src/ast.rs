//! Tree construction and serialization.
//!
//! The syntax tree itself is swc's: this module only decides the parser
//! syntax from the original file extension, turns source text into a
//! `Module` plus its comment store, and prints the mutated tree back out
//! through that store so inserted suggestion comments survive.

use std::path::Path;

use swc_core::common::comments::SingleThreadedComments;
use swc_core::common::input::StringInput;
use swc_core::common::sync::Lrc;
use swc_core::common::{FileName, SourceMap};
use swc_core::ecma::ast::{EsVersion, Module};
use swc_core::ecma::codegen::{text_writer::JsWriter, Config, Emitter};
use swc_core::ecma::parser::{lexer::Lexer, EsSyntax, Parser, Syntax, TsSyntax};

use crate::ConvertError;

pub struct ParsedModule {
    pub module: Module,
    pub source_map: Lrc<SourceMap>,
    pub comments: SingleThreadedComments,
}

impl std::fmt::Debug for ParsedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // `SourceMap` does not implement `Debug`, so it is skipped here.
        f.debug_struct("ParsedModule")
            .field("module", &self.module)
            .field("comments", &self.comments)
            .finish_non_exhaustive()
    }
}

fn syntax_for(path: &Path) -> Syntax {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    match ext {
        "ts" | "mts" | "cts" => Syntax::Typescript(TsSyntax {
            tsx: false,
            ..Default::default()
        }),
        "tsx" => Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: true,
            ..Default::default()
        }),
    }
}

pub fn parse(source: &str, file_path: &Path) -> Result<ParsedModule, ConvertError> {
    let source_map: Lrc<SourceMap> = Default::default();
    let file = source_map.new_source_file(
        Lrc::new(FileName::Real(file_path.to_path_buf())),
        source.to_string(),
    );
    let comments = SingleThreadedComments::default();

    let lexer = Lexer::new(
        syntax_for(file_path),
        EsVersion::latest(),
        StringInput::from(&*file),
        Some(&comments),
    );
    let mut parser = Parser::new_from(lexer);

    let parse_failure = |message: String| ConvertError::Parse {
        file: file_path.display().to_string(),
        message,
    };

    let module = parser
        .parse_module()
        .map_err(|e| parse_failure(e.kind().msg().to_string()))?;

    // The parser recovers from some errors; an unparseable file must be
    // fatal with no partial output, so recovered errors are fatal too.
    if let Some(err) = parser.take_errors().into_iter().next() {
        return Err(parse_failure(err.kind().msg().to_string()));
    }

    Ok(ParsedModule {
        module,
        source_map,
        comments,
    })
}

pub fn print(
    module: &Module,
    source_map: Lrc<SourceMap>,
    comments: &SingleThreadedComments,
) -> Result<String, ConvertError> {
    let mut buf = Vec::new();
    {
        let writer = JsWriter::new(source_map.clone(), "\n", &mut buf, None);
        let mut emitter = Emitter {
            cfg: Config::default(),
            cm: source_map,
            comments: Some(comments),
            wr: writer,
        };
        emitter.emit_module(module).map_err(ConvertError::Emit)?;
    }
    String::from_utf8(buf).map_err(|e| ConvertError::Emit(std::io::Error::other(e)))
}
