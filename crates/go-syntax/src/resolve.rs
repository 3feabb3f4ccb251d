// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Identifier resolution
//!
//! Runs once over a parsed file and records a [`Binding`] on every
//! identifier. Function-local names are tracked with a lexical scope stack;
//! package-level and predeclared names are left [`Binding::Free`] for the
//! dependency analysis to look up.

use crate::ast::*;
use crate::scope::ScopeStack;
use std::collections::HashSet;

pub(crate) fn resolve_file(file: &mut SourceFile) {
    let imports: HashSet<String> = file
        .imports
        .iter()
        .filter_map(|spec| spec.local_name())
        .map(str::to_string)
        .collect();

    for spec in &mut file.imports {
        mark_import(spec);
    }

    let mut resolver = Resolver {
        scopes: ScopeStack::new(),
        imports,
    };
    for decl in &mut file.decls {
        match decl {
            Decl::Func(func) => resolver.resolve_func_decl(func),
            Decl::Gen(gen) => resolver.resolve_package_gen_decl(gen),
        }
    }
}

fn mark_import(spec: &mut ImportSpec) {
    if let Some(name) = &mut spec.name {
        name.binding = match name.name.as_str() {
            "_" => Binding::Blank,
            "." => Binding::Free,
            _ => Binding::Import,
        };
    }
}

struct Resolver {
    scopes: ScopeStack,
    /// Names bound by the file's imports
    imports: HashSet<String>,
}

impl Resolver {
    fn resolve_func_decl(&mut self, func: &mut FuncDecl) {
        self.scopes.push();

        if let Some(recv) = &mut func.recv {
            self.declare_receiver_type_params(&mut recv.ty);
            self.resolve_expr(&mut recv.ty);
        }
        self.declare_type_params(&mut func.type_params);
        self.resolve_signature_types(&mut func.signature);

        if let Some(recv) = &mut func.recv {
            for name in &mut recv.names {
                self.scopes.declare(name, LocalKind::Receiver);
            }
        }
        self.declare_signature_names(&mut func.signature);

        if let Some(body) = &mut func.body {
            self.resolve_stmts(&mut body.stmts);
        }

        self.scopes.pop();
    }

    /// `func (l *List[T]) ...` introduces `T`
    fn declare_receiver_type_params(&mut self, ty: &mut Expr) {
        match ty {
            Expr::Star(inner) | Expr::Paren(inner) => self.declare_receiver_type_params(inner),
            Expr::Index { indices, .. } => {
                for index in indices {
                    if let Some(ident) = index.as_ident_mut() {
                        self.scopes.declare(ident, LocalKind::TypeParam);
                    }
                }
            }
            _ => {}
        }
    }

    fn declare_type_params(&mut self, fields: &mut [Field]) {
        for field in fields.iter_mut() {
            for name in &mut field.names {
                self.scopes.declare(name, LocalKind::TypeParam);
            }
        }
        for field in fields.iter_mut() {
            self.resolve_expr(&mut field.ty);
        }
    }

    fn resolve_signature_types(&mut self, signature: &mut FuncType) {
        for field in signature.params.iter_mut().chain(&mut signature.results) {
            self.resolve_expr(&mut field.ty);
        }
    }

    fn declare_signature_names(&mut self, signature: &mut FuncType) {
        for field in &mut signature.params {
            for name in &mut field.names {
                self.scopes.declare(name, LocalKind::Param);
            }
        }
        for field in &mut signature.results {
            for name in &mut field.names {
                self.scopes.declare(name, LocalKind::Result);
            }
        }
    }

    /// Function type without a body: parameter names only scope over the signature
    fn resolve_func_type(&mut self, signature: &mut FuncType) {
        self.scopes.push();
        self.resolve_signature_types(signature);
        self.declare_signature_names(signature);
        self.scopes.pop();
    }

    fn resolve_package_gen_decl(&mut self, gen: &mut GenDecl) {
        for spec in &mut gen.specs {
            match spec {
                Spec::Import(import) => mark_import(import),
                Spec::Value(value) => {
                    if let Some(ty) = &mut value.ty {
                        self.resolve_expr(ty);
                    }
                    for expr in &mut value.values {
                        self.resolve_expr(expr);
                    }
                }
                Spec::Type(ty) => self.resolve_type_spec(ty),
            }
        }
    }

    fn resolve_type_spec(&mut self, spec: &mut TypeSpec) {
        self.scopes.push();
        self.declare_type_params(&mut spec.type_params);
        self.resolve_expr(&mut spec.ty);
        self.scopes.pop();
    }

    fn resolve_local_gen_decl(&mut self, gen: &mut GenDecl) {
        let kind = match gen.keyword {
            DeclKeyword::Const => LocalKind::Const,
            _ => LocalKind::Var,
        };
        for spec in &mut gen.specs {
            match spec {
                Spec::Import(import) => mark_import(import),
                Spec::Value(value) => {
                    if let Some(ty) = &mut value.ty {
                        self.resolve_expr(ty);
                    }
                    for expr in &mut value.values {
                        self.resolve_expr(expr);
                    }
                    for name in &mut value.names {
                        self.scopes.declare(name, kind);
                    }
                }
                Spec::Type(ty) => {
                    // in scope within its own definition
                    self.scopes.declare(&mut ty.name, LocalKind::Type);
                    self.resolve_type_spec(ty);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn resolve_block(&mut self, block: &mut Block) {
        self.scopes.push();
        self.resolve_stmts(&mut block.stmts);
        self.scopes.pop();
    }

    fn resolve_stmts(&mut self, stmts: &mut [Stmt]) {
        for stmt in stmts {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Decl(gen) => self.resolve_local_gen_decl(gen),
            Stmt::Labeled { label, stmt } => {
                label.binding = Binding::Label;
                self.resolve_stmt(stmt);
            }
            Stmt::Expr(expr) | Stmt::Go(expr) | Stmt::Defer(expr) => self.resolve_expr(expr),
            Stmt::Send { chan, value } => {
                self.resolve_expr(chan);
                self.resolve_expr(value);
            }
            Stmt::IncDec { x, .. } => self.resolve_expr(x),
            Stmt::Assign { lhs, op, rhs } => {
                for expr in rhs.iter_mut() {
                    self.resolve_expr(expr);
                }
                for expr in lhs.iter_mut() {
                    if *op == AssignOp::Define {
                        self.define(expr);
                    } else {
                        self.resolve_expr(expr);
                    }
                }
            }
            Stmt::Return(results) => {
                for expr in results {
                    self.resolve_expr(expr);
                }
            }
            Stmt::Branch { label, .. } => {
                if let Some(label) = label {
                    label.binding = Binding::Label;
                }
            }
            Stmt::Block(block) => self.resolve_block(block),
            Stmt::If { init, cond, then, els } => {
                self.scopes.push();
                if let Some(init) = init {
                    self.resolve_stmt(init);
                }
                self.resolve_expr(cond);
                self.resolve_block(then);
                if let Some(els) = els {
                    self.resolve_stmt(els);
                }
                self.scopes.pop();
            }
            Stmt::Switch { init, tag, clauses } => {
                self.scopes.push();
                if let Some(init) = init {
                    self.resolve_stmt(init);
                }
                if let Some(tag) = tag {
                    self.resolve_expr(tag);
                }
                for clause in clauses {
                    self.resolve_case_clause(clause, None);
                }
                self.scopes.pop();
            }
            Stmt::TypeSwitch { init, assign, clauses } => {
                self.scopes.push();
                if let Some(init) = init {
                    self.resolve_stmt(init);
                }
                let bound = match &mut **assign {
                    Stmt::Assign { lhs, op: AssignOp::Define, rhs } => {
                        for expr in rhs {
                            self.resolve_expr(expr);
                        }
                        lhs.first_mut().and_then(Expr::as_ident_mut).map(|ident| {
                            ident.binding = if ident.is_blank() {
                                Binding::Blank
                            } else {
                                Binding::Local(LocalKind::Var)
                            };
                            ident.name.clone()
                        })
                    }
                    other => {
                        self.resolve_stmt(other);
                        None
                    }
                };
                for clause in clauses {
                    self.resolve_case_clause(clause, bound.as_deref());
                }
                self.scopes.pop();
            }
            Stmt::Select { clauses } => {
                for clause in clauses {
                    self.scopes.push();
                    if let Some(comm) = &mut clause.comm {
                        self.resolve_stmt(comm);
                    }
                    self.resolve_stmts(&mut clause.body);
                    self.scopes.pop();
                }
            }
            Stmt::For { init, cond, post, body } => {
                self.scopes.push();
                if let Some(init) = init {
                    self.resolve_stmt(init);
                }
                if let Some(cond) = cond {
                    self.resolve_expr(cond);
                }
                if let Some(post) = post {
                    self.resolve_stmt(post);
                }
                self.resolve_block(body);
                self.scopes.pop();
            }
            Stmt::Range { key, value, define, x, body } => {
                self.scopes.push();
                self.resolve_expr(x);
                for expr in key.iter_mut().chain(value.iter_mut()) {
                    if *define {
                        self.define(expr);
                    } else {
                        self.resolve_expr(expr);
                    }
                }
                self.resolve_block(body);
                self.scopes.pop();
            }
            Stmt::Empty => {}
        }
    }

    fn resolve_case_clause(&mut self, clause: &mut CaseClause, bound: Option<&str>) {
        self.scopes.push();
        for expr in &mut clause.list {
            self.resolve_expr(expr);
        }
        if let Some(name) = bound.filter(|name| *name != "_") {
            self.scopes.bind(name, LocalKind::Var);
        }
        self.resolve_stmts(&mut clause.body);
        self.scopes.pop();
    }

    /// Left-hand side of `:=`: redeclared names keep their binding, new ones
    /// become variables of the innermost scope
    fn define(&mut self, expr: &mut Expr) {
        let Expr::Ident(ident) = expr else {
            self.resolve_expr(expr);
            return;
        };
        match self.scopes.lookup_current(&ident.name) {
            Some(kind) => ident.binding = Binding::Local(kind),
            None => self.scopes.declare(ident, LocalKind::Var),
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn resolve_ident(&self, ident: &mut Ident) {
        ident.binding = if ident.is_blank() {
            Binding::Blank
        } else if let Some(kind) = self.scopes.lookup(&ident.name) {
            Binding::Local(kind)
        } else if self.imports.contains(&ident.name) {
            Binding::Import
        } else {
            Binding::Free
        };
    }

    fn resolve_expr(&mut self, expr: &mut Expr) {
        match expr {
            Expr::Ident(ident) => self.resolve_ident(ident),
            Expr::BasicLit { .. } | Expr::Ellipsis(None) => {}
            Expr::CompositeLit { ty, elts, .. } => {
                if let Some(ty) = ty {
                    self.resolve_expr(ty);
                }
                for elt in elts {
                    self.resolve_element(elt);
                }
            }
            Expr::FuncLit { ty, body } => {
                self.scopes.push();
                self.resolve_signature_types(ty);
                self.declare_signature_names(ty);
                self.resolve_stmts(&mut body.stmts);
                self.scopes.pop();
            }
            Expr::Paren(x) | Expr::Star(x) | Expr::Ellipsis(Some(x)) => self.resolve_expr(x),
            Expr::Unary { x, .. } => self.resolve_expr(x),
            Expr::Selector { x, sel } => {
                self.resolve_expr(x);
                sel.binding = Binding::Member;
            }
            Expr::Index { x, indices } => {
                self.resolve_expr(x);
                for index in indices {
                    self.resolve_expr(index);
                }
            }
            Expr::Slice { x, low, high, max } => {
                self.resolve_expr(x);
                for bound in [low, high, max].into_iter().flatten() {
                    self.resolve_expr(bound);
                }
            }
            Expr::TypeAssert { x, ty } => {
                self.resolve_expr(x);
                if let Some(ty) = ty {
                    self.resolve_expr(ty);
                }
            }
            Expr::Call { fun, args, .. } => {
                self.resolve_expr(fun);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            Expr::Binary { x, y, .. } => {
                self.resolve_expr(x);
                self.resolve_expr(y);
            }
            Expr::KeyValue { key, value } => {
                self.resolve_expr(key);
                self.resolve_expr(value);
            }
            Expr::ArrayType { len, elem } => {
                if let Some(len) = len {
                    self.resolve_expr(len);
                }
                self.resolve_expr(elem);
            }
            Expr::StructType { fields } => {
                for field in fields {
                    for name in &mut field.names {
                        name.binding = Binding::Member;
                    }
                    self.resolve_expr(&mut field.ty);
                }
            }
            Expr::FuncType(signature) => self.resolve_func_type(signature),
            Expr::InterfaceType { elems } => {
                for elem in elems {
                    for name in &mut elem.names {
                        name.binding = Binding::Member;
                    }
                    match &mut elem.ty {
                        Expr::FuncType(signature) => self.resolve_func_type(signature),
                        ty => self.resolve_expr(ty),
                    }
                }
            }
            Expr::MapType { key, value } => {
                self.resolve_expr(key);
                self.resolve_expr(value);
            }
            Expr::ChanType { value, .. } => self.resolve_expr(value),
        }
    }

    /// Element of a composite literal. A bare identifier key may be a struct
    /// field name, so it is only resolved when it names a local.
    fn resolve_element(&mut self, elt: &mut Expr) {
        let Expr::KeyValue { key, value } = elt else {
            self.resolve_expr(elt);
            return;
        };
        match &mut **key {
            Expr::Ident(ident) => {
                if let Some(kind) = self.scopes.lookup(&ident.name) {
                    ident.binding = Binding::Local(kind);
                }
            }
            key => self.resolve_expr(key),
        }
        self.resolve_expr(value);
    }
}
