// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Pre-order traversal of the syntax tree
//!
//! Override the `visit_*` methods of interest and call the matching `walk_*`
//! function to continue into children. Children are visited in source order.

use crate::ast::*;

pub trait Visitor<'ast> {
    fn visit_ident(&mut self, _ident: &'ast Ident) {}

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr)
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt)
    }

    fn visit_block(&mut self, block: &'ast Block) {
        walk_block(self, block)
    }

    fn visit_field(&mut self, field: &'ast Field) {
        walk_field(self, field)
    }

    fn visit_func_type(&mut self, signature: &'ast FuncType) {
        walk_func_type(self, signature)
    }

    fn visit_gen_decl(&mut self, decl: &'ast GenDecl) {
        walk_gen_decl(self, decl)
    }
}

pub fn walk_func_decl<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, decl: &'ast FuncDecl) {
    if let Some(recv) = &decl.recv {
        visitor.visit_field(recv);
    }
    visitor.visit_ident(&decl.name);
    for field in &decl.type_params {
        visitor.visit_field(field);
    }
    visitor.visit_func_type(&decl.signature);
    if let Some(body) = &decl.body {
        visitor.visit_block(body);
    }
}

pub fn walk_gen_decl<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, decl: &'ast GenDecl) {
    for spec in &decl.specs {
        match spec {
            Spec::Import(import) => {
                if let Some(name) = &import.name {
                    visitor.visit_ident(name);
                }
            }
            Spec::Value(value) => {
                for name in &value.names {
                    visitor.visit_ident(name);
                }
                if let Some(ty) = &value.ty {
                    visitor.visit_expr(ty);
                }
                for expr in &value.values {
                    visitor.visit_expr(expr);
                }
            }
            Spec::Type(ty) => {
                visitor.visit_ident(&ty.name);
                for field in &ty.type_params {
                    visitor.visit_field(field);
                }
                visitor.visit_expr(&ty.ty);
            }
        }
    }
}

pub fn walk_field<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, field: &'ast Field) {
    for name in &field.names {
        visitor.visit_ident(name);
    }
    visitor.visit_expr(&field.ty);
}

pub fn walk_func_type<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, signature: &'ast FuncType) {
    for field in signature.params.iter().chain(&signature.results) {
        visitor.visit_field(field);
    }
}

pub fn walk_block<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, block: &'ast Block) {
    for stmt in &block.stmts {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expr) {
    match expr {
        Expr::Ident(ident) => visitor.visit_ident(ident),
        Expr::BasicLit { .. } | Expr::Ellipsis(None) => {}
        Expr::CompositeLit { ty, elts, .. } => {
            if let Some(ty) = ty {
                visitor.visit_expr(ty);
            }
            for elt in elts {
                visitor.visit_expr(elt);
            }
        }
        Expr::FuncLit { ty, body } => {
            visitor.visit_func_type(ty);
            visitor.visit_block(body);
        }
        Expr::Paren(x) | Expr::Star(x) | Expr::Ellipsis(Some(x)) | Expr::Unary { x, .. } => {
            visitor.visit_expr(x)
        }
        Expr::Selector { x, sel } => {
            visitor.visit_expr(x);
            visitor.visit_ident(sel);
        }
        Expr::Index { x, indices } => {
            visitor.visit_expr(x);
            for index in indices {
                visitor.visit_expr(index);
            }
        }
        Expr::Slice { x, low, high, max } => {
            visitor.visit_expr(x);
            for bound in [low, high, max].into_iter().flatten() {
                visitor.visit_expr(bound);
            }
        }
        Expr::TypeAssert { x, ty } => {
            visitor.visit_expr(x);
            if let Some(ty) = ty {
                visitor.visit_expr(ty);
            }
        }
        Expr::Call { fun, args, .. } => {
            visitor.visit_expr(fun);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Binary { x, y, .. } => {
            visitor.visit_expr(x);
            visitor.visit_expr(y);
        }
        Expr::KeyValue { key, value } => {
            visitor.visit_expr(key);
            visitor.visit_expr(value);
        }
        Expr::ArrayType { len, elem } => {
            if let Some(len) = len {
                visitor.visit_expr(len);
            }
            visitor.visit_expr(elem);
        }
        Expr::StructType { fields } => {
            for field in fields {
                visitor.visit_field(field);
            }
        }
        Expr::FuncType(signature) => visitor.visit_func_type(signature),
        Expr::InterfaceType { elems } => {
            for elem in elems {
                visitor.visit_field(elem);
            }
        }
        Expr::MapType { key, value } => {
            visitor.visit_expr(key);
            visitor.visit_expr(value);
        }
        Expr::ChanType { value, .. } => visitor.visit_expr(value),
    }
}

fn walk_case_clause<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, clause: &'ast CaseClause) {
    for expr in &clause.list {
        visitor.visit_expr(expr);
    }
    for stmt in &clause.body {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, stmt: &'ast Stmt) {
    match stmt {
        Stmt::Decl(decl) => visitor.visit_gen_decl(decl),
        Stmt::Labeled { label, stmt } => {
            visitor.visit_ident(label);
            visitor.visit_stmt(stmt);
        }
        Stmt::Expr(expr) | Stmt::Go(expr) | Stmt::Defer(expr) => visitor.visit_expr(expr),
        Stmt::Send { chan, value } => {
            visitor.visit_expr(chan);
            visitor.visit_expr(value);
        }
        Stmt::IncDec { x, .. } => visitor.visit_expr(x),
        Stmt::Assign { lhs, rhs, .. } => {
            for expr in lhs.iter().chain(rhs) {
                visitor.visit_expr(expr);
            }
        }
        Stmt::Return(results) => {
            for expr in results {
                visitor.visit_expr(expr);
            }
        }
        Stmt::Branch { label, .. } => {
            if let Some(label) = label {
                visitor.visit_ident(label);
            }
        }
        Stmt::Block(block) => visitor.visit_block(block),
        Stmt::If { init, cond, then, els } => {
            if let Some(init) = init {
                visitor.visit_stmt(init);
            }
            visitor.visit_expr(cond);
            visitor.visit_block(then);
            if let Some(els) = els {
                visitor.visit_stmt(els);
            }
        }
        Stmt::Switch { init, tag, clauses } => {
            if let Some(init) = init {
                visitor.visit_stmt(init);
            }
            if let Some(tag) = tag {
                visitor.visit_expr(tag);
            }
            for clause in clauses {
                walk_case_clause(visitor, clause);
            }
        }
        Stmt::TypeSwitch { init, assign, clauses } => {
            if let Some(init) = init {
                visitor.visit_stmt(init);
            }
            visitor.visit_stmt(assign);
            for clause in clauses {
                walk_case_clause(visitor, clause);
            }
        }
        Stmt::Select { clauses } => {
            for clause in clauses {
                if let Some(comm) = &clause.comm {
                    visitor.visit_stmt(comm);
                }
                for stmt in &clause.body {
                    visitor.visit_stmt(stmt);
                }
            }
        }
        Stmt::For { init, cond, post, body } => {
            if let Some(init) = init {
                visitor.visit_stmt(init);
            }
            if let Some(cond) = cond {
                visitor.visit_expr(cond);
            }
            if let Some(post) = post {
                visitor.visit_stmt(post);
            }
            visitor.visit_block(body);
        }
        Stmt::Range { key, value, x, body, .. } => {
            for expr in key.iter().chain(value) {
                visitor.visit_expr(expr);
            }
            visitor.visit_expr(x);
            visitor.visit_block(body);
        }
        Stmt::Empty => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_file;
    use std::path::Path;

    struct Names(Vec<String>);

    impl<'ast> Visitor<'ast> for Names {
        fn visit_ident(&mut self, ident: &'ast Ident) {
            self.0.push(ident.name.clone());
        }
    }

    #[test]
    fn test_pre_order_source_order() {
        let src = "package p\nfunc F() {\n\tx := a.b(c, d[e])\n\tfor k := range m {\n\t\tg(k)\n\t}\n}\n";
        let file = parse_file(Path::new("test.go"), src).unwrap();
        let body = file.decls[0].as_func().unwrap().body.as_ref().unwrap();
        let mut names = Names(Vec::new());
        names.visit_block(body);
        assert_eq!(names.0, ["x", "a", "b", "c", "d", "e", "k", "m", "g", "k"]);
    }
}
