// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use super::Parser;
use crate::ast::*;
use crate::error::ParseResult;
use crate::token::{Span, TokenKind};

#[derive(Clone, Copy, PartialEq, Eq)]
enum SimpleMode {
    Basic,
    LabelOk,
    RangeOk,
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::Assign => AssignOp::Assign,
        TokenKind::Define => AssignOp::Define,
        TokenKind::AddAssign => AssignOp::Op(BinaryOp::Add),
        TokenKind::SubAssign => AssignOp::Op(BinaryOp::Sub),
        TokenKind::MulAssign => AssignOp::Op(BinaryOp::Mul),
        TokenKind::QuoAssign => AssignOp::Op(BinaryOp::Quo),
        TokenKind::RemAssign => AssignOp::Op(BinaryOp::Rem),
        TokenKind::AndAssign => AssignOp::Op(BinaryOp::And),
        TokenKind::OrAssign => AssignOp::Op(BinaryOp::Or),
        TokenKind::XorAssign => AssignOp::Op(BinaryOp::Xor),
        TokenKind::ShlAssign => AssignOp::Op(BinaryOp::Shl),
        TokenKind::ShrAssign => AssignOp::Op(BinaryOp::Shr),
        TokenKind::AndNotAssign => AssignOp::Op(BinaryOp::AndNot),
        _ => return None,
    };
    Some(op)
}

fn is_type_switch_guard(stmt: &Stmt) -> bool {
    let is_guard = |expr: &Expr| matches!(expr, Expr::TypeAssert { ty: None, .. });
    match stmt {
        Stmt::Expr(expr) => is_guard(expr),
        Stmt::Assign { lhs, op: AssignOp::Define, rhs } => {
            lhs.len() == 1 && rhs.len() == 1 && is_guard(&rhs[0])
        }
        _ => false,
    }
}

impl<'a> Parser<'a> {
    pub(super) fn parse_block(&mut self) -> ParseResult<Block> {
        let start = self.expect(TokenKind::LBrace)?.span.start;
        let stmts = self.parse_stmt_list()?;
        let end = self.expect(TokenKind::RBrace)?.span.end;
        Ok(Block { stmts, span: Span::new(start, end) })
    }

    fn parse_stmt_list(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        loop {
            match self.kind() {
                TokenKind::RBrace | TokenKind::Case | TokenKind::Default | TokenKind::Eof => break,
                TokenKind::Semicolon => {
                    self.next();
                }
                _ => {
                    stmts.push(self.parse_stmt()?);
                    self.expect_semi()?;
                }
            }
        }
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        match self.kind() {
            TokenKind::Const => Ok(Stmt::Decl(self.parse_gen_decl(DeclKeyword::Const)?)),
            TokenKind::Type => Ok(Stmt::Decl(self.parse_gen_decl(DeclKeyword::Type)?)),
            TokenKind::Var => Ok(Stmt::Decl(self.parse_gen_decl(DeclKeyword::Var)?)),
            TokenKind::Go => {
                self.next();
                Ok(Stmt::Go(self.parse_expr()?))
            }
            TokenKind::Defer => {
                self.next();
                Ok(Stmt::Defer(self.parse_expr()?))
            }
            TokenKind::Return => {
                self.next();
                let results = match self.kind() {
                    TokenKind::Semicolon | TokenKind::RBrace => Vec::new(),
                    _ => self.parse_expr_list()?,
                };
                Ok(Stmt::Return(results))
            }
            TokenKind::Break | TokenKind::Continue | TokenKind::Goto | TokenKind::Fallthrough => {
                let kind = match self.next().kind {
                    TokenKind::Break => BranchKind::Break,
                    TokenKind::Continue => BranchKind::Continue,
                    TokenKind::Goto => BranchKind::Goto,
                    _ => BranchKind::Fallthrough,
                };
                let label = if kind != BranchKind::Fallthrough && self.at(TokenKind::Ident) {
                    Some(self.ident()?)
                } else {
                    None
                };
                Ok(Stmt::Branch { kind, label })
            }
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Switch => self.parse_switch_stmt(),
            TokenKind::Select => self.parse_select_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Semicolon | TokenKind::RBrace => Ok(Stmt::Empty),
            _ => self.parse_simple_stmt(SimpleMode::LabelOk),
        }
    }

    fn parse_simple_stmt(&mut self, mode: SimpleMode) -> ParseResult<Stmt> {
        if mode == SimpleMode::RangeOk && self.eat(TokenKind::Range) {
            let x = self.parse_expr()?;
            return Ok(Stmt::Range {
                key: None,
                value: None,
                define: false,
                x,
                body: Block::default(),
            });
        }

        let mut lhs = self.parse_expr_list()?;

        if let Some(op) = assign_op(self.kind()) {
            self.next();
            if mode == SimpleMode::RangeOk
                && self.at(TokenKind::Range)
                && matches!(op, AssignOp::Assign | AssignOp::Define)
            {
                self.next();
                let x = self.parse_expr()?;
                let mut lhs = lhs.into_iter();
                return Ok(Stmt::Range {
                    key: lhs.next(),
                    value: lhs.next(),
                    define: op == AssignOp::Define,
                    x,
                    body: Block::default(),
                });
            }
            let rhs = self.parse_expr_list()?;
            return Ok(Stmt::Assign { lhs, op, rhs });
        }

        if lhs.len() > 1 {
            return Err(self.unexpected("':=', '=' or ','"));
        }
        let Some(x) = lhs.pop() else {
            return Err(self.unexpected("expression"));
        };

        let x = match x {
            Expr::Ident(label) if mode == SimpleMode::LabelOk && self.at(TokenKind::Colon) => {
                self.next();
                let stmt = match self.kind() {
                    TokenKind::RBrace => Stmt::Empty,
                    _ => self.parse_stmt()?,
                };
                return Ok(Stmt::Labeled { label, stmt: Box::new(stmt) });
            }
            x => x,
        };

        match self.kind() {
            TokenKind::Arrow => {
                self.next();
                let value = self.parse_expr()?;
                Ok(Stmt::Send { chan: x, value })
            }
            TokenKind::Inc | TokenKind::Dec => {
                let inc = self.next().kind == TokenKind::Inc;
                Ok(Stmt::IncDec { x, inc })
            }
            _ => Ok(Stmt::Expr(x)),
        }
    }

    fn stmt_to_cond(&self, stmt: Stmt) -> ParseResult<Expr> {
        match stmt {
            Stmt::Expr(expr) => Ok(expr),
            _ => Err(self.error(self.tok().span, "expected boolean expression")),
        }
    }

    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::If)?;
        if self.at(TokenKind::LBrace) {
            return Err(self.error(self.tok().span, "missing condition in if statement"));
        }

        let outer = self.expr_lev;
        self.expr_lev = -1;
        let header = self.parse_if_header();
        self.expr_lev = outer;
        let (init, cond) = header?;

        let then = self.parse_block()?;
        let els = if self.eat(TokenKind::Else) {
            match self.kind() {
                TokenKind::If => Some(Box::new(self.parse_if_stmt()?)),
                TokenKind::LBrace => Some(Box::new(Stmt::Block(self.parse_block()?))),
                _ => return Err(self.unexpected("if statement or block")),
            }
        } else {
            None
        };

        Ok(Stmt::If { init, cond, then, els })
    }

    fn parse_if_header(&mut self) -> ParseResult<(Option<Box<Stmt>>, Expr)> {
        let first = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_simple_stmt(SimpleMode::Basic)?)
        };
        if self.eat(TokenKind::Semicolon) {
            let cond = self.parse_simple_stmt(SimpleMode::Basic)?;
            return Ok((first.map(Box::new), self.stmt_to_cond(cond)?));
        }
        match first {
            Some(stmt) => Ok((None, self.stmt_to_cond(stmt)?)),
            None => Err(self.error(self.tok().span, "missing condition in if statement")),
        }
    }

    fn parse_switch_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Switch)?;

        let outer = self.expr_lev;
        self.expr_lev = -1;
        let header = self.parse_switch_header();
        self.expr_lev = outer;
        let (init, tag) = header?;

        self.expect(TokenKind::LBrace)?;
        let mut clauses = Vec::new();
        while matches!(self.kind(), TokenKind::Case | TokenKind::Default) {
            clauses.push(self.parse_case_clause()?);
        }
        self.expect(TokenKind::RBrace)?;

        match tag {
            Some(assign) if is_type_switch_guard(&assign) => {
                Ok(Stmt::TypeSwitch { init, assign: Box::new(assign), clauses })
            }
            Some(stmt) => {
                let tag = self.stmt_to_cond(stmt)?;
                Ok(Stmt::Switch { init, tag: Some(tag), clauses })
            }
            None => Ok(Stmt::Switch { init, tag: None, clauses }),
        }
    }

    fn parse_switch_header(&mut self) -> ParseResult<(Option<Box<Stmt>>, Option<Stmt>)> {
        let mut init = None;
        let mut tag = None;
        if !self.at(TokenKind::LBrace) {
            if !self.at(TokenKind::Semicolon) {
                tag = Some(self.parse_simple_stmt(SimpleMode::Basic)?);
            }
            if self.eat(TokenKind::Semicolon) {
                init = tag.take().map(Box::new);
                if !self.at(TokenKind::LBrace) {
                    tag = Some(self.parse_simple_stmt(SimpleMode::Basic)?);
                }
            }
        }
        Ok((init, tag))
    }

    fn parse_case_clause(&mut self) -> ParseResult<CaseClause> {
        let (list, is_default) = if self.eat(TokenKind::Case) {
            (self.parse_expr_list()?, false)
        } else {
            self.expect(TokenKind::Default)?;
            (Vec::new(), true)
        };
        self.expect(TokenKind::Colon)?;
        let body = self.parse_stmt_list()?;
        Ok(CaseClause { list, body, is_default })
    }

    fn parse_select_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Select)?;
        self.expect(TokenKind::LBrace)?;
        let mut clauses = Vec::new();
        while matches!(self.kind(), TokenKind::Case | TokenKind::Default) {
            let comm = if self.eat(TokenKind::Case) {
                Some(Box::new(self.parse_simple_stmt(SimpleMode::Basic)?))
            } else {
                self.expect(TokenKind::Default)?;
                None
            };
            self.expect(TokenKind::Colon)?;
            let body = self.parse_stmt_list()?;
            clauses.push(CommClause { comm, body });
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Stmt::Select { clauses })
    }

    fn parse_for_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::For)?;

        let outer = self.expr_lev;
        self.expr_lev = -1;
        let header = self.parse_for_header();
        self.expr_lev = outer;
        let (init, cond, post) = header?;

        let body = self.parse_block()?;

        match cond {
            Some(Stmt::Range { key, value, define, x, .. }) => {
                Ok(Stmt::Range { key, value, define, x, body })
            }
            Some(stmt) => {
                let cond = self.stmt_to_cond(stmt)?;
                Ok(Stmt::For { init, cond: Some(cond), post, body })
            }
            None => Ok(Stmt::For { init, cond: None, post, body }),
        }
    }

    #[allow(clippy::type_complexity)]
    fn parse_for_header(
        &mut self,
    ) -> ParseResult<(Option<Box<Stmt>>, Option<Stmt>, Option<Box<Stmt>>)> {
        let mut init = None;
        let mut cond = None;
        let mut post = None;
        if self.at(TokenKind::LBrace) {
            return Ok((init, cond, post));
        }

        if !self.at(TokenKind::Semicolon) {
            cond = Some(self.parse_simple_stmt(SimpleMode::RangeOk)?);
        }
        let is_range = matches!(cond, Some(Stmt::Range { .. }));
        if !is_range && self.at(TokenKind::Semicolon) {
            self.next();
            init = cond.take().map(Box::new);
            if !self.at(TokenKind::Semicolon) {
                cond = Some(self.parse_simple_stmt(SimpleMode::Basic)?);
            }
            self.expect(TokenKind::Semicolon)?;
            if !self.at(TokenKind::LBrace) {
                post = Some(Box::new(self.parse_simple_stmt(SimpleMode::Basic)?));
            }
        }
        Ok((init, cond, post))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parse_file;
    use std::path::Path;

    fn body_of(src: &str) -> Vec<Stmt> {
        let text = format!("package p\nfunc f() {{\n{src}\n}}\n");
        let file = parse_file(Path::new("test.go"), &text).unwrap();
        file.decls[0].as_func().unwrap().body.clone().unwrap().stmts
    }

    #[test]
    fn test_for_forms() {
        let stmts = body_of(
            "for i := 0; i < n; i++ {\n}\n\
             for k, v := range m {\n}\n\
             for range ch {\n}\n\
             for cond {\n}\n\
             for {\n\tbreak\n}",
        );
        assert_eq!(stmts.len(), 5);
        assert!(matches!(stmts[0], Stmt::For { init: Some(_), cond: Some(_), post: Some(_), .. }));
        assert!(matches!(stmts[1], Stmt::Range { define: true, key: Some(_), value: Some(_), .. }));
        assert!(matches!(stmts[2], Stmt::Range { key: None, .. }));
        assert!(matches!(stmts[3], Stmt::For { init: None, cond: Some(_), post: None, .. }));
        assert!(matches!(stmts[4], Stmt::For { cond: None, .. }));
    }

    #[test]
    fn test_switch_forms() {
        let stmts = body_of(
            "switch x := f(); x {\ncase 1, 2:\n\treturn\ndefault:\n}\n\
             switch v := i.(type) {\ncase int:\ncase []string, nil:\n}",
        );
        let Stmt::Switch { init: Some(_), tag: Some(_), clauses } = &stmts[0] else {
            panic!("expected switch")
        };
        assert_eq!(clauses.len(), 2);
        assert!(clauses[1].is_default);
        let Stmt::TypeSwitch { clauses, .. } = &stmts[1] else { panic!("expected type switch") };
        assert_eq!(clauses[1].list.len(), 2);
    }

    #[test]
    fn test_select_and_labels() {
        let stmts = body_of(
            "outer:\nfor {\n\tselect {\n\tcase v := <-in:\n\t\tout <- v\n\tcase <-done:\n\t\tbreak outer\n\tdefault:\n\t}\n}",
        );
        let Stmt::Labeled { label, stmt } = &stmts[0] else { panic!("expected label") };
        assert_eq!(label.name, "outer");
        let Stmt::For { body, .. } = &**stmt else { panic!("expected for") };
        let Stmt::Select { clauses } = &body.stmts[0] else { panic!("expected select") };
        assert_eq!(clauses.len(), 3);
        assert!(clauses[2].comm.is_none());
    }

    #[test]
    fn test_if_else_chain() {
        let stmts = body_of("if err := g(); err != nil {\n\treturn\n} else if ok {\n} else {\n}");
        let Stmt::If { init: Some(_), els: Some(els), .. } = &stmts[0] else { panic!("expected if") };
        assert!(matches!(**els, Stmt::If { els: Some(_), .. }));
    }

    #[test]
    fn test_local_declarations() {
        let stmts = body_of("var x, y int\nconst z = 1\ntype local struct{}\nx++\ngo run()\ndefer close(ch)");
        assert!(matches!(stmts[0], Stmt::Decl(GenDecl { keyword: DeclKeyword::Var, .. })));
        assert!(matches!(stmts[2], Stmt::Decl(GenDecl { keyword: DeclKeyword::Type, .. })));
        assert!(matches!(stmts[3], Stmt::IncDec { inc: true, .. }));
        assert!(matches!(stmts[4], Stmt::Go(_)));
        assert!(matches!(stmts[5], Stmt::Defer(_)));
    }
}
