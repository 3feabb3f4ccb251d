// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use super::Parser;
use crate::ast::*;
use crate::error::ParseResult;
use crate::token::TokenKind;

/// One entry of a parameter list before grouping into fields
enum ParamItem {
    /// A lone identifier: a parameter name or a type name
    Name(Ident),
    Type(Expr),
    Named(Ident, Expr),
}

impl<'a> Parser<'a> {
    pub(super) fn starts_type(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Ident
                | TokenKind::Mul
                | TokenKind::LBrack
                | TokenKind::Func
                | TokenKind::Map
                | TokenKind::Chan
                | TokenKind::Struct
                | TokenKind::Interface
                | TokenKind::LParen
                | TokenKind::Arrow
        )
    }

    pub(super) fn parse_type(&mut self) -> ParseResult<Expr> {
        match self.kind() {
            TokenKind::Ident => self.parse_type_name(),
            TokenKind::LBrack => {
                self.next();
                if self.eat(TokenKind::RBrack) {
                    let elem = self.parse_type()?;
                    return Ok(Expr::ArrayType { len: None, elem: Box::new(elem) });
                }
                let len = if self.at(TokenKind::Ellipsis) {
                    self.next();
                    Expr::Ellipsis(None)
                } else {
                    self.expr_lev += 1;
                    let len = self.parse_expr();
                    self.expr_lev -= 1;
                    len?
                };
                self.expect(TokenKind::RBrack)?;
                let elem = self.parse_type()?;
                Ok(Expr::ArrayType {
                    len: Some(Box::new(len)),
                    elem: Box::new(elem),
                })
            }
            TokenKind::Mul => {
                self.next();
                Ok(Expr::Star(Box::new(self.parse_type()?)))
            }
            TokenKind::Arrow => {
                self.next();
                self.expect(TokenKind::Chan)?;
                let value = self.parse_type()?;
                Ok(Expr::ChanType { dir: ChanDir::Recv, value: Box::new(value) })
            }
            TokenKind::Chan => {
                self.next();
                let dir = if self.eat(TokenKind::Arrow) { ChanDir::Send } else { ChanDir::Both };
                let value = self.parse_type()?;
                Ok(Expr::ChanType { dir, value: Box::new(value) })
            }
            TokenKind::Func => {
                self.next();
                Ok(Expr::FuncType(self.parse_signature()?))
            }
            TokenKind::Map => {
                self.next();
                self.expect(TokenKind::LBrack)?;
                let key = self.parse_type()?;
                self.expect(TokenKind::RBrack)?;
                let value = self.parse_type()?;
                Ok(Expr::MapType { key: Box::new(key), value: Box::new(value) })
            }
            TokenKind::Struct => self.parse_struct_type(),
            TokenKind::Interface => self.parse_interface_type(),
            TokenKind::LParen => {
                self.next();
                let ty = self.parse_type()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Paren(Box::new(ty)))
            }
            _ => Err(self.unexpected("type")),
        }
    }

    /// `T`, `pkg.T`, optionally instantiated: `T[int]`
    fn parse_type_name(&mut self) -> ParseResult<Expr> {
        let name = self.ident()?;
        let mut ty = Expr::Ident(name);
        if self.eat(TokenKind::Period) {
            let sel = self.ident()?;
            ty = Expr::Selector { x: Box::new(ty), sel };
        }
        if self.at(TokenKind::LBrack) {
            let indices = self.parse_type_args()?;
            ty = Expr::Index { x: Box::new(ty), indices };
        }
        Ok(ty)
    }

    fn parse_type_args(&mut self) -> ParseResult<Vec<Expr>> {
        self.expect(TokenKind::LBrack)?;
        self.expr_lev += 1;
        let mut args = Vec::new();
        while !self.at(TokenKind::RBrack) && !self.at(TokenKind::Eof) {
            args.push(self.parse_expr()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expr_lev -= 1;
        self.expect(TokenKind::RBrack)?;
        Ok(args)
    }

    /// At `[` after `name`: either a field or parameter `name [N]T` / `name []T`,
    /// or the generic type `name[Args]`. Returns the name when it is one.
    fn parse_bracket_after_name(&mut self, name: Ident) -> ParseResult<(Option<Ident>, Expr)> {
        self.expect(TokenKind::LBrack)?;
        if self.eat(TokenKind::RBrack) {
            let elem = self.parse_type()?;
            return Ok((Some(name), Expr::ArrayType { len: None, elem: Box::new(elem) }));
        }
        if self.at(TokenKind::Ellipsis) && self.peek_kind(1) == TokenKind::RBrack {
            self.next();
            self.next();
            let elem = self.parse_type()?;
            let len = Some(Box::new(Expr::Ellipsis(None)));
            return Ok((Some(name), Expr::ArrayType { len, elem: Box::new(elem) }));
        }

        self.expr_lev += 1;
        let mut args = Vec::new();
        loop {
            match self.parse_expr() {
                Ok(arg) => args.push(arg),
                Err(err) => {
                    self.expr_lev -= 1;
                    return Err(err);
                }
            }
            if !self.eat(TokenKind::Comma) || self.at(TokenKind::RBrack) {
                break;
            }
        }
        self.expr_lev -= 1;
        self.expect(TokenKind::RBrack)?;

        if args.len() == 1 && self.starts_type() {
            let elem = self.parse_type()?;
            let len = args.pop().map(Box::new);
            return Ok((Some(name), Expr::ArrayType { len, elem: Box::new(elem) }));
        }
        Ok((None, Expr::Index { x: Box::new(Expr::Ident(name)), indices: args }))
    }

    pub(super) fn parse_signature(&mut self) -> ParseResult<FuncType> {
        let params = self.parse_parameters()?;
        let results = if self.at(TokenKind::LParen) {
            self.parse_parameters()?
        } else if self.starts_type() {
            let ty = self.parse_type()?;
            vec![Field { names: Vec::new(), ty, tag: None }]
        } else {
            Vec::new()
        };
        Ok(FuncType { params, results })
    }

    /// `(a, b int, c string)`, `(int, string)` or `()`
    pub(super) fn parse_parameters(&mut self) -> ParseResult<Vec<Field>> {
        self.expect(TokenKind::LParen)?;
        let mut items = Vec::new();
        while !self.at(TokenKind::RParen) && !self.at(TokenKind::Eof) {
            items.push(self.parse_param_item()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(group_params(items))
    }

    fn parse_param_item(&mut self) -> ParseResult<ParamItem> {
        if !self.at(TokenKind::Ident) {
            return self.parse_param_type().map(ParamItem::Type);
        }

        let name = self.ident()?;
        match self.kind() {
            TokenKind::Comma | TokenKind::RParen => Ok(ParamItem::Name(name)),
            TokenKind::Period => {
                self.next();
                let sel = self.ident()?;
                let mut ty = Expr::Selector { x: Box::new(Expr::Ident(name)), sel };
                if self.at(TokenKind::LBrack) {
                    let indices = self.parse_type_args()?;
                    ty = Expr::Index { x: Box::new(ty), indices };
                }
                Ok(ParamItem::Type(ty))
            }
            TokenKind::LBrack => match self.parse_bracket_after_name(name)? {
                (Some(name), ty) => Ok(ParamItem::Named(name, ty)),
                (None, ty) => Ok(ParamItem::Type(ty)),
            },
            _ => {
                let ty = self.parse_param_type()?;
                Ok(ParamItem::Named(name, ty))
            }
        }
    }

    fn parse_param_type(&mut self) -> ParseResult<Expr> {
        if self.eat(TokenKind::Ellipsis) {
            let elem = self.parse_type()?;
            return Ok(Expr::Ellipsis(Some(Box::new(elem))));
        }
        self.parse_type()
    }

    /// `[K comparable, V any]`
    pub(super) fn parse_type_params(&mut self) -> ParseResult<Vec<Field>> {
        self.expect(TokenKind::LBrack)?;
        let mut fields = Vec::new();
        loop {
            let names = self.ident_list()?;
            self.expr_lev += 1;
            let constraint = self.parse_expr();
            self.expr_lev -= 1;
            fields.push(Field { names, ty: constraint?, tag: None });
            if !self.eat(TokenKind::Comma) || self.at(TokenKind::RBrack) {
                break;
            }
        }
        self.expect(TokenKind::RBrack)?;
        Ok(fields)
    }

    fn parse_struct_type(&mut self) -> ParseResult<Expr> {
        self.expect(TokenKind::Struct)?;
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            fields.push(self.parse_field_decl()?);
            self.expect_semi()?;
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Expr::StructType { fields })
    }

    fn parse_field_decl(&mut self) -> ParseResult<Field> {
        let (names, ty) = if self.at(TokenKind::Mul) {
            (Vec::new(), self.parse_type()?)
        } else {
            let name = self.ident()?;
            match self.kind() {
                TokenKind::Period => {
                    self.next();
                    let sel = self.ident()?;
                    let mut ty = Expr::Selector { x: Box::new(Expr::Ident(name)), sel };
                    if self.at(TokenKind::LBrack) {
                        let indices = self.parse_type_args()?;
                        ty = Expr::Index { x: Box::new(ty), indices };
                    }
                    (Vec::new(), ty)
                }
                TokenKind::String | TokenKind::Semicolon | TokenKind::RBrace => {
                    (Vec::new(), Expr::Ident(name))
                }
                TokenKind::LBrack => match self.parse_bracket_after_name(name)? {
                    (Some(name), ty) => (vec![name], ty),
                    (None, ty) => (Vec::new(), ty),
                },
                _ => {
                    let mut names = vec![name];
                    while self.eat(TokenKind::Comma) {
                        names.push(self.ident()?);
                    }
                    (names, self.parse_type()?)
                }
            }
        };

        let tag = if self.at(TokenKind::String) {
            let token = self.next();
            Some(self.text[token.span.range()].to_string())
        } else {
            None
        };
        Ok(Field { names, ty, tag })
    }

    fn parse_interface_type(&mut self) -> ParseResult<Expr> {
        self.expect(TokenKind::Interface)?;
        self.expect(TokenKind::LBrace)?;
        let mut elems = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            if self.at(TokenKind::Ident) && self.peek_kind(1) == TokenKind::LParen {
                let name = self.ident()?;
                let signature = self.parse_signature()?;
                elems.push(Field {
                    names: vec![name],
                    ty: Expr::FuncType(signature),
                    tag: None,
                });
            } else {
                let ty = self.parse_expr()?;
                elems.push(Field { names: Vec::new(), ty, tag: None });
            }
            self.expect_semi()?;
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Expr::InterfaceType { elems })
    }
}

/// Group parameter entries into fields: if any entry is `name Type`, lone
/// identifiers are names sharing the next type; otherwise every entry is a type.
fn group_params(items: Vec<ParamItem>) -> Vec<Field> {
    let named = items.iter().any(|item| matches!(item, ParamItem::Named(..)));
    let mut fields = Vec::new();

    if !named {
        for item in items {
            let ty = match item {
                ParamItem::Name(name) => Expr::Ident(name),
                ParamItem::Type(ty) | ParamItem::Named(_, ty) => ty,
            };
            fields.push(Field { names: Vec::new(), ty, tag: None });
        }
        return fields;
    }

    let mut pending = Vec::new();
    for item in items {
        match item {
            ParamItem::Name(name) => pending.push(name),
            ParamItem::Named(name, ty) => {
                pending.push(name);
                fields.push(Field {
                    names: std::mem::take(&mut pending),
                    ty,
                    tag: None,
                });
            }
            ParamItem::Type(ty) => fields.push(Field { names: Vec::new(), ty, tag: None }),
        }
    }
    // Trailing names without a type are malformed; keep them as type names
    fields.extend(pending.into_iter().map(|name| Field {
        names: Vec::new(),
        ty: Expr::Ident(name),
        tag: None,
    }));
    fields
}
