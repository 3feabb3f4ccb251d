// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use super::Parser;
use crate::ast::*;
use crate::error::ParseResult;
use crate::token::{Span, TokenKind};

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::LOr => BinaryOp::LOr,
        TokenKind::LAnd => BinaryOp::LAnd,
        TokenKind::Eql => BinaryOp::Eql,
        TokenKind::Neq => BinaryOp::Neq,
        TokenKind::Lss => BinaryOp::Lss,
        TokenKind::Leq => BinaryOp::Leq,
        TokenKind::Gtr => BinaryOp::Gtr,
        TokenKind::Geq => BinaryOp::Geq,
        TokenKind::Add => BinaryOp::Add,
        TokenKind::Sub => BinaryOp::Sub,
        TokenKind::Or => BinaryOp::Or,
        TokenKind::Xor => BinaryOp::Xor,
        TokenKind::Mul => BinaryOp::Mul,
        TokenKind::Quo => BinaryOp::Quo,
        TokenKind::Rem => BinaryOp::Rem,
        TokenKind::Shl => BinaryOp::Shl,
        TokenKind::Shr => BinaryOp::Shr,
        TokenKind::And => BinaryOp::And,
        TokenKind::AndNot => BinaryOp::AndNot,
        _ => return None,
    };
    Some(op)
}

fn lit_kind(kind: TokenKind) -> Option<LitKind> {
    let lit = match kind {
        TokenKind::Int => LitKind::Int,
        TokenKind::Float => LitKind::Float,
        TokenKind::Imag => LitKind::Imag,
        TokenKind::Char => LitKind::Char,
        TokenKind::String => LitKind::String,
        _ => return None,
    };
    Some(lit)
}

/// Types that may precede `{` in a composite literal
fn is_literal_type(x: &Expr) -> bool {
    match x {
        Expr::Ident(_) | Expr::ArrayType { .. } | Expr::StructType { .. } | Expr::MapType { .. } => {
            true
        }
        Expr::Selector { x, .. } => matches!(**x, Expr::Ident(_)),
        Expr::Index { x, .. } => is_literal_type(x),
        _ => false,
    }
}

fn is_type_name(x: &Expr) -> bool {
    match x {
        Expr::Ident(_) => true,
        Expr::Selector { x, .. } => matches!(**x, Expr::Ident(_)),
        Expr::Index { x, .. } => is_type_name(x),
        _ => false,
    }
}

impl<'a> Parser<'a> {
    pub(super) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_binary_expr(1)
    }

    pub(super) fn parse_expr_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut list = vec![self.parse_expr()?];
        while self.eat(TokenKind::Comma) {
            list.push(self.parse_expr()?);
        }
        Ok(list)
    }

    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<Expr> {
        let mut x = self.parse_unary_expr()?;
        loop {
            let prec = self.kind().precedence();
            if prec < min_prec || prec == 0 {
                return Ok(x);
            }
            let Some(op) = binary_op(self.next().kind) else {
                return Ok(x);
            };
            let y = self.parse_binary_expr(prec + 1)?;
            x = Expr::Binary { op, x: Box::new(x), y: Box::new(y) };
        }
    }

    fn parse_unary_expr(&mut self) -> ParseResult<Expr> {
        let op = match self.kind() {
            TokenKind::Add => UnaryOp::Pos,
            TokenKind::Sub => UnaryOp::Neg,
            TokenKind::Not => UnaryOp::Not,
            TokenKind::Xor => UnaryOp::Xor,
            TokenKind::And => UnaryOp::Addr,
            TokenKind::Tilde => UnaryOp::Tilde,
            TokenKind::Arrow => {
                if self.peek_kind(1) == TokenKind::Chan {
                    return self.parse_type();
                }
                UnaryOp::Recv
            }
            TokenKind::Mul => {
                self.next();
                let x = self.parse_unary_expr()?;
                return Ok(Expr::Star(Box::new(x)));
            }
            _ => return self.parse_primary_expr(),
        };
        self.next();
        let x = self.parse_unary_expr()?;
        Ok(Expr::Unary { op, x: Box::new(x) })
    }

    fn parse_operand(&mut self) -> ParseResult<Expr> {
        let token = self.tok();
        match token.kind {
            TokenKind::Ident => Ok(Expr::Ident(self.ident()?)),
            kind if kind.is_literal() => {
                self.next();
                let kind = lit_kind(kind).unwrap_or(LitKind::String);
                Ok(Expr::BasicLit { kind, span: token.span })
            }
            TokenKind::LParen => {
                self.next();
                self.expr_lev += 1;
                let x = self.parse_expr();
                self.expr_lev -= 1;
                let x = x?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Paren(Box::new(x)))
            }
            TokenKind::Func => {
                self.next();
                let ty = self.parse_signature()?;
                if self.at(TokenKind::LBrace) {
                    self.expr_lev += 1;
                    let body = self.parse_block();
                    self.expr_lev -= 1;
                    Ok(Expr::FuncLit { ty, body: body? })
                } else {
                    Ok(Expr::FuncType(ty))
                }
            }
            TokenKind::LBrack
            | TokenKind::Struct
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Interface => self.parse_type(),
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_primary_expr(&mut self) -> ParseResult<Expr> {
        let mut x = self.parse_operand()?;
        loop {
            match self.kind() {
                TokenKind::Period => {
                    self.next();
                    if self.eat(TokenKind::LParen) {
                        let ty = if self.eat(TokenKind::Type) {
                            None
                        } else {
                            Some(Box::new(self.parse_type()?))
                        };
                        self.expect(TokenKind::RParen)?;
                        x = Expr::TypeAssert { x: Box::new(x), ty };
                    } else {
                        let sel = self.ident()?;
                        x = Expr::Selector { x: Box::new(x), sel };
                    }
                }
                TokenKind::LBrack => {
                    self.next();
                    self.expr_lev += 1;
                    let result = self.parse_index_or_slice(x);
                    self.expr_lev -= 1;
                    x = result?;
                    self.expect(TokenKind::RBrack)?;
                }
                TokenKind::LParen => {
                    self.next();
                    self.expr_lev += 1;
                    let result = self.parse_call_args();
                    self.expr_lev -= 1;
                    let (args, ellipsis) = result?;
                    self.expect(TokenKind::RParen)?;
                    x = Expr::Call { fun: Box::new(x), args, ellipsis };
                }
                TokenKind::LBrace
                    if is_literal_type(&x) && (self.expr_lev >= 0 || !is_type_name(&x)) =>
                {
                    x = self.parse_literal_value(Some(x))?;
                }
                _ => return Ok(x),
            }
        }
    }

    /// After `x[`, up to but excluding `]`
    fn parse_index_or_slice(&mut self, x: Expr) -> ParseResult<Expr> {
        let low = if self.at(TokenKind::Colon) {
            None
        } else {
            Some(self.parse_expr()?)
        };

        if !self.eat(TokenKind::Colon) {
            let mut indices: Vec<Expr> = low.into_iter().collect();
            while self.eat(TokenKind::Comma) {
                if self.at(TokenKind::RBrack) {
                    break;
                }
                indices.push(self.parse_expr()?);
            }
            return Ok(Expr::Index { x: Box::new(x), indices });
        }

        let high = match self.kind() {
            TokenKind::Colon | TokenKind::RBrack => None,
            _ => Some(Box::new(self.parse_expr()?)),
        };
        let max = if self.eat(TokenKind::Colon) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        Ok(Expr::Slice { x: Box::new(x), low: low.map(Box::new), high, max })
    }

    fn parse_call_args(&mut self) -> ParseResult<(Vec<Expr>, bool)> {
        let mut args = Vec::new();
        let mut ellipsis = false;
        while !self.at(TokenKind::RParen) && !self.at(TokenKind::Eof) {
            args.push(self.parse_expr()?);
            if self.eat(TokenKind::Ellipsis) {
                ellipsis = true;
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok((args, ellipsis))
    }

    /// `{ elem, key: value, ... }` with an optional literal type in front
    fn parse_literal_value(&mut self, ty: Option<Expr>) -> ParseResult<Expr> {
        let start = self.expect(TokenKind::LBrace)?.span.start;
        self.expr_lev += 1;
        let elts = self.parse_elements();
        self.expr_lev -= 1;
        let elts = elts?;
        let end = self.expect(TokenKind::RBrace)?.span.end;
        Ok(Expr::CompositeLit {
            ty: ty.map(Box::new),
            elts,
            span: Span::new(start, end),
        })
    }

    fn parse_elements(&mut self) -> ParseResult<Vec<Expr>> {
        let mut elts = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let key = self.parse_element()?;
            let elt = if self.eat(TokenKind::Colon) {
                let value = self.parse_element()?;
                Expr::KeyValue { key: Box::new(key), value: Box::new(value) }
            } else {
                key
            };
            elts.push(elt);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(elts)
    }

    fn parse_element(&mut self) -> ParseResult<Expr> {
        if self.at(TokenKind::LBrace) {
            self.parse_literal_value(None)
        } else {
            self.parse_expr()
        }
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
    fn test_binary_precedence() {
        let stmts = body_of("x := a + b * c");
        let Stmt::Assign { rhs, .. } = &stmts[0] else { panic!("expected assignment") };
        let Expr::Binary { op: BinaryOp::Add, y, .. } = &rhs[0] else { panic!("expected +") };
        assert!(matches!(**y, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_composite_literal_in_condition() {
        // `T{}` is not a literal in an if header; the brace opens the block
        let stmts = body_of("if x == T {\n}\nif y := (T{}); y.ok {\n}");
        let Stmt::If { cond, .. } = &stmts[0] else { panic!("expected if") };
        assert!(matches!(cond, Expr::Binary { op: BinaryOp::Eql, .. }));
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn test_composite_literals() {
        let stmts = body_of("v := []Point{{X: 1}, {2, 3}}\nm := map[string]int{\"a\": 1}");
        let Stmt::Assign { rhs, .. } = &stmts[0] else { panic!("expected assignment") };
        let Expr::CompositeLit { ty: Some(_), elts, .. } = &rhs[0] else { panic!("expected literal") };
        assert_eq!(elts.len(), 2);
        assert!(matches!(elts[0], Expr::CompositeLit { ty: None, .. }));
        let Stmt::Assign { rhs, .. } = &stmts[1] else { panic!("expected assignment") };
        assert!(matches!(rhs[0], Expr::CompositeLit { .. }));
    }

    #[test]
    fn test_slices_and_assertions() {
        let stmts = body_of("a := s[1:n:cap(s)]\nb, ok := v.(fmt.Stringer)\nc := <-ch");
        let Stmt::Assign { rhs, .. } = &stmts[0] else { panic!("expected assignment") };
        assert!(matches!(rhs[0], Expr::Slice { max: Some(_), .. }));
        let Stmt::Assign { lhs, rhs, .. } = &stmts[1] else { panic!("expected assignment") };
        assert_eq!(lhs.len(), 2);
        assert!(matches!(rhs[0], Expr::TypeAssert { ty: Some(_), .. }));
        let Stmt::Assign { rhs, .. } = &stmts[2] else { panic!("expected assignment") };
        assert!(matches!(rhs[0], Expr::Unary { op: UnaryOp::Recv, .. }));
    }

    #[test]
    fn test_func_literal_and_generic_call() {
        let stmts = body_of("fn := func(x int) bool { return x > 0 }\nr := Map[int, string](xs, fn)");
        let Stmt::Assign { rhs, .. } = &stmts[0] else { panic!("expected assignment") };
        assert!(matches!(rhs[0], Expr::FuncLit { .. }));
        let Stmt::Assign { rhs, .. } = &stmts[1] else { panic!("expected assignment") };
        let Expr::Call { fun, .. } = &rhs[0] else { panic!("expected call") };
        assert!(matches!(**fun, Expr::Index { ref indices, .. } if indices.len() == 2));
    }
}
