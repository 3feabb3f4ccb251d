// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Go source files
//!
//! Follows the structure of the Go grammar: declarations here, types in
//! `types.rs`, expressions in `exprs.rs` and statements in `stmts.rs`.
//! `expr_lev` tracks the composite literal ambiguity in control clauses
//! (`if x == T{}` is not a literal unless parenthesised).

mod exprs;
mod stmts;
mod types;

use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::Tokens;
use crate::token::{Comment, LineIndex, Span, Token, TokenKind};
use std::path::Path;

pub(crate) fn parse_tokens(path: &Path, text: &str, tokens: Tokens) -> ParseResult<SourceFile> {
    let mut parser = Parser::new(path, text, tokens);
    parser.parse_file()
}

pub(crate) struct Parser<'a> {
    path: &'a Path,
    text: &'a str,
    tokens: Vec<Token>,
    comments: Vec<Comment>,
    lines: LineIndex,
    pos: usize,
    /// End offset of the last consumed explicit token
    prev_end: usize,
    expr_lev: i32,
}

impl<'a> Parser<'a> {
    fn new(path: &'a Path, text: &'a str, tokens: Tokens) -> Self {
        Self {
            path,
            text,
            tokens: tokens.tokens,
            comments: tokens.comments,
            lines: LineIndex::new(text),
            pos: 0,
            prev_end: 0,
            expr_lev: 0,
        }
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    fn tok(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.tok().kind
    }

    fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn next(&mut self) -> Token {
        let token = self.tok();
        if token.kind != TokenKind::Eof {
            if !token.implicit {
                self.prev_end = token.span.end;
            }
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.next();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.at(kind) {
            Ok(self.next())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    /// A statement terminator, optional before a closing `)` or `}`
    fn expect_semi(&mut self) -> ParseResult<()> {
        match self.kind() {
            TokenKind::RParen | TokenKind::RBrace => Ok(()),
            TokenKind::Semicolon => {
                self.next();
                Ok(())
            }
            _ => Err(self.unexpected("';' or newline")),
        }
    }

    fn error(&self, span: Span, message: impl Into<String>) -> ParseError {
        ParseError::new(self.path, span, message)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.tok();
        let found = if token.implicit {
            "newline".to_string()
        } else if token.kind == TokenKind::Ident || token.kind.is_literal() {
            format!("{} '{}'", token.kind.as_str(), &self.text[token.span.range()])
        } else {
            token.kind.to_string()
        };
        self.error(token.span, format!("expected {expected}, found {found}"))
    }

    fn ident(&mut self) -> ParseResult<Ident> {
        let token = self.expect(TokenKind::Ident)?;
        Ok(Ident::new(&self.text[token.span.range()], token.span))
    }

    fn ident_list(&mut self) -> ParseResult<Vec<Ident>> {
        let mut idents = vec![self.ident()?];
        while self.eat(TokenKind::Comma) {
            idents.push(self.ident()?);
        }
        Ok(idents)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end.max(start))
    }

    // ------------------------------------------------------------------
    // File and declarations
    // ------------------------------------------------------------------

    fn parse_file(&mut self) -> ParseResult<SourceFile> {
        self.expect(TokenKind::Package)?;
        let package = self.ident()?;
        self.expect_semi()?;

        let mut imports = Vec::new();
        let mut decls = Vec::new();

        while !self.at(TokenKind::Eof) {
            if self.eat(TokenKind::Semicolon) {
                continue;
            }
            let prev_end = self.prev_end;
            let start = self.tok().span.start;

            let mut decl = match self.kind() {
                TokenKind::Func => Decl::Func(self.parse_func_decl()?),
                TokenKind::Import => {
                    let gen = self.parse_gen_decl(DeclKeyword::Import)?;
                    imports.extend(gen.specs.iter().filter_map(|spec| match spec {
                        Spec::Import(import) => Some(import.clone()),
                        _ => None,
                    }));
                    Decl::Gen(gen)
                }
                TokenKind::Const => Decl::Gen(self.parse_gen_decl(DeclKeyword::Const)?),
                TokenKind::Type => Decl::Gen(self.parse_gen_decl(DeclKeyword::Type)?),
                TokenKind::Var => Decl::Gen(self.parse_gen_decl(DeclKeyword::Var)?),
                _ => return Err(self.unexpected("declaration")),
            };
            self.expect_semi()?;

            let doc = self.doc_comment(prev_end, start);
            match &mut decl {
                Decl::Func(func) => func.doc = doc,
                Decl::Gen(gen) => gen.doc = doc,
            }
            decls.push(decl);
        }

        Ok(SourceFile {
            path: self.path.to_path_buf(),
            text: self.text.to_string(),
            package,
            imports,
            decls,
            comments: self.comments.iter().map(|c| c.span).collect(),
        })
    }

    /// The comment group ending on the line right before `start`, not
    /// sharing a line with the token that ends at `prev_end`.
    fn doc_comment(&self, prev_end: usize, start: usize) -> Option<Span> {
        let prev_line = (prev_end > 0).then(|| self.lines.line_of(prev_end - 1));
        let candidates: Vec<Span> = self
            .comments
            .iter()
            .map(|c| c.span)
            .filter(|span| span.start >= prev_end && span.end <= start)
            .filter(|span| prev_line.map_or(true, |line| self.lines.line_of(span.start) > line))
            .collect();

        let last = *candidates.last()?;
        if self.lines.line_of(last.end) + 1 != self.lines.line_of(start) {
            return None;
        }

        let mut first = last;
        for span in candidates.iter().rev().skip(1) {
            if self.lines.line_of(span.end) + 1 >= self.lines.line_of(first.start) {
                first = *span;
            } else {
                break;
            }
        }
        Some(first.to(last))
    }

    fn parse_func_decl(&mut self) -> ParseResult<FuncDecl> {
        let start = self.expect(TokenKind::Func)?.span.start;

        let recv = if self.at(TokenKind::LParen) {
            let mut fields = self.parse_parameters()?;
            if fields.len() != 1 {
                return Err(self.error(self.span_from(start), "method has multiple receivers"));
            }
            fields.pop()
        } else {
            None
        };

        let name = self.ident()?;
        let type_params = if self.at(TokenKind::LBrack) {
            self.parse_type_params()?
        } else {
            Vec::new()
        };
        let signature = self.parse_signature()?;
        let body = if self.at(TokenKind::LBrace) {
            let outer = self.expr_lev;
            self.expr_lev = 0;
            let body = self.parse_block()?;
            self.expr_lev = outer;
            Some(body)
        } else {
            None
        };

        Ok(FuncDecl {
            doc: None,
            recv,
            name,
            type_params,
            signature,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_gen_decl(&mut self, keyword: DeclKeyword) -> ParseResult<GenDecl> {
        let start = self.next().span.start;
        let mut specs = Vec::new();

        if self.eat(TokenKind::LParen) {
            while !self.at(TokenKind::RParen) && !self.at(TokenKind::Eof) {
                specs.push(self.parse_spec(keyword)?);
                self.expect_semi()?;
            }
            self.expect(TokenKind::RParen)?;
        } else {
            specs.push(self.parse_spec(keyword)?);
        }

        Ok(GenDecl {
            doc: None,
            keyword,
            specs,
            span: self.span_from(start),
        })
    }

    fn parse_spec(&mut self, keyword: DeclKeyword) -> ParseResult<Spec> {
        match keyword {
            DeclKeyword::Import => self.parse_import_spec().map(Spec::Import),
            DeclKeyword::Type => self.parse_type_spec().map(Spec::Type),
            DeclKeyword::Const | DeclKeyword::Var => self.parse_value_spec().map(Spec::Value),
        }
    }

    fn parse_import_spec(&mut self) -> ParseResult<ImportSpec> {
        let start = self.tok().span.start;
        let name = match self.kind() {
            TokenKind::Ident => Some(self.ident()?),
            TokenKind::Period => {
                let token = self.next();
                Some(Ident::new(".", token.span))
            }
            _ => None,
        };
        let path_token = self.expect(TokenKind::String)?;
        let raw = &self.text[path_token.span.range()];
        let path = raw.trim_matches(|c| c == '"' || c == '`').to_string();

        Ok(ImportSpec {
            name,
            path,
            span: self.span_from(start),
        })
    }

    fn parse_value_spec(&mut self) -> ParseResult<ValueSpec> {
        let start = self.tok().span.start;
        let names = self.ident_list()?;
        let ty = match self.kind() {
            TokenKind::Assign | TokenKind::Semicolon | TokenKind::RParen => None,
            _ => Some(self.parse_type()?),
        };
        let values = if self.eat(TokenKind::Assign) {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };

        Ok(ValueSpec {
            names,
            ty,
            values,
            span: self.span_from(start),
        })
    }

    fn parse_type_spec(&mut self) -> ParseResult<TypeSpec> {
        let start = self.tok().span.start;
        let name = self.ident()?;
        let type_params = if self.at(TokenKind::LBrack) && self.starts_type_params() {
            self.parse_type_params()?
        } else {
            Vec::new()
        };
        let alias = self.eat(TokenKind::Assign);
        let ty = self.parse_type()?;

        Ok(TypeSpec {
            name,
            type_params,
            alias,
            ty,
            span: self.span_from(start),
        })
    }

    /// At `[` after a type name: type parameters (`[T any]`) rather than an
    /// array length (`[N]T`)
    fn starts_type_params(&self) -> bool {
        self.peek_kind(1) == TokenKind::Ident
            && matches!(
                self.peek_kind(2),
                TokenKind::Ident
                    | TokenKind::Comma
                    | TokenKind::Interface
                    | TokenKind::Func
                    | TokenKind::Chan
                    | TokenKind::Map
                    | TokenKind::Struct
                    | TokenKind::Tilde
                    | TokenKind::LBrack
            )
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parse_file;
    use std::path::Path;

    fn parse(src: &str) -> SourceFile {
        parse_file(Path::new("test.go"), src).unwrap()
    }

    #[test]
    fn test_package_and_imports() {
        let file = parse("package demo\n\nimport (\n\t\"fmt\"\n\tstr \"strings\"\n)\n");
        assert_eq!(file.package.name, "demo");
        assert_eq!(file.imports.len(), 2);
        assert_eq!(file.imports[0].local_name(), Some("fmt"));
        assert_eq!(file.imports[1].local_name(), Some("str"));
    }

    #[test]
    fn test_top_level_declarations() {
        let file = parse(
            "package p\n\
             const A, B = 1, 2\n\
             var (\n\tx int\n\ty = \"s\"\n)\n\
             type T struct{ F int }\n\
             type List[E any] []E\n\
             type Arr [4]int\n\
             func (t *T) Get() int { return t.F }\n\
             func Map[K comparable, V any](m map[K]V) []V { return nil }\n\
             func external(x int) int\n",
        );
        assert_eq!(file.decls.len(), 8);

        let Decl::Gen(consts) = &file.decls[0] else { panic!("expected const") };
        assert_eq!(consts.names().map(|n| n.name.as_str()).collect::<Vec<_>>(), ["A", "B"]);

        let Decl::Gen(list) = &file.decls[3] else { panic!("expected type") };
        let Spec::Type(spec) = &list.specs[0] else { panic!("expected type spec") };
        assert_eq!(spec.type_params.len(), 1);

        let Decl::Gen(arr) = &file.decls[4] else { panic!("expected type") };
        let Spec::Type(spec) = &arr.specs[0] else { panic!("expected type spec") };
        assert!(spec.type_params.is_empty());
        assert!(matches!(spec.ty, Expr::ArrayType { len: Some(_), .. }));

        let method = file.decls[5].as_func().unwrap();
        assert_eq!(method.receiver_type_name(), Some("T"));

        let generic = file.decls[6].as_func().unwrap();
        assert_eq!(generic.type_params.len(), 2);
        assert_eq!(generic.type_params[0].names[0].name, "K");

        assert!(file.decls[7].as_func().unwrap().body.is_none());
    }

    #[test]
    fn test_doc_comments() {
        let src = "package p\n\n// Helper does things.\n// Second line.\nfunc Helper() {}\n\n// detached\n\nfunc Other() {}\n";
        let file = parse(src);
        let doc = file.decls[0].doc().unwrap();
        assert_eq!(file.slice(doc), "// Helper does things.\n// Second line.");
        assert!(file.decls[1].doc().is_none());
    }

    #[test]
    fn test_trailing_comment_is_not_doc() {
        let src = "package p\n\nvar a = 1 // about a\nfunc F() {}\n";
        let file = parse(src);
        assert!(file.decls[1].doc().is_none());
    }

    #[test]
    fn test_parameter_grouping() {
        let file = parse("package p\nfunc f(a, b int, c ...string) (n int, err error) {}\nfunc g(int, string) bool { return true }\n");
        let f = file.decls[0].as_func().unwrap();
        assert_eq!(f.signature.params.len(), 2);
        assert_eq!(f.signature.params[0].names.len(), 2);
        assert!(matches!(f.signature.params[1].ty, Expr::Ellipsis(Some(_))));
        assert_eq!(f.signature.results[1].names[0].name, "err");

        let g = file.decls[1].as_func().unwrap();
        assert_eq!(g.signature.params.len(), 2);
        assert!(g.signature.params.iter().all(|p| p.names.is_empty()));
        assert_eq!(g.signature.results.len(), 1);
    }

    #[test]
    fn test_parse_error_position() {
        let err = parse_file(Path::new("bad.go"), "package p\nfunc f( {\n").unwrap_err();
        assert_eq!(err.path, Path::new("bad.go"));
        assert!(err.message.starts_with("expected"));
    }
}
