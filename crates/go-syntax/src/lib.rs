// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Go source front end: lexer, parser, identifier resolution and rendering
//! of top-level declarations.

pub mod ast;
pub mod error;
pub mod lexer;
mod parser;
pub mod render;
mod resolve;
mod scope;
pub mod token;
pub mod visit;

pub use ast::SourceFile;
pub use error::{ParseError, ParseResult};
pub use render::{render_decl, render_import, render_imports};

use std::path::Path;

/// Parse one Go source file and resolve its identifiers
pub fn parse_file(path: &Path, text: &str) -> ParseResult<SourceFile> {
    let tokens = lexer::tokenize(path, text)?;
    let mut file = parser::parse_tokens(path, text, tokens)?;
    resolve::resolve_file(&mut file);
    log::trace!(
        "parsed {} (package {}, {} declarations)",
        path.display(),
        file.package.name,
        file.decls.len()
    );
    Ok(file)
}
