// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Names a function binds anywhere in its signature or body
//!
//! The walk is flat: block structure is ignored, so a name bound in one
//! branch hides a package-level name of the same spelling everywhere in the
//! function.

use go_syntax::ast::*;
use go_syntax::visit::{walk_expr, walk_stmt, Visitor};
use std::collections::BTreeSet;

pub type BoundNameSet = BTreeSet<String>;

pub fn bound_names(func: &FuncDecl) -> BoundNameSet {
    let mut collector = BindingCollector::default();

    if let Some(recv) = &func.recv {
        collector.add_all(&recv.names);
    }
    for field in &func.type_params {
        collector.add_all(&field.names);
    }
    collector.add_signature(&func.signature);

    if let Some(body) = &func.body {
        collector.visit_block(body);
    }
    collector.names
}

#[derive(Default)]
struct BindingCollector {
    names: BoundNameSet,
}

impl BindingCollector {
    fn add(&mut self, ident: &Ident) {
        if !ident.name.is_empty() && !ident.is_blank() {
            self.names.insert(ident.name.clone());
        }
    }

    fn add_all(&mut self, idents: &[Ident]) {
        for ident in idents {
            self.add(ident);
        }
    }

    fn add_exprs<'a>(&mut self, exprs: impl IntoIterator<Item = &'a Expr>) {
        for ident in exprs.into_iter().filter_map(Expr::as_ident) {
            self.add(ident);
        }
    }

    fn add_signature(&mut self, signature: &FuncType) {
        for field in signature.params.iter().chain(&signature.results) {
            self.add_all(&field.names);
        }
    }
}

impl<'ast> Visitor<'ast> for BindingCollector {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::Assign { lhs, op: AssignOp::Define, .. } => self.add_exprs(lhs),
            Stmt::Range { key, value, define: true, .. } => {
                self.add_exprs(key.iter().chain(value));
            }
            Stmt::TypeSwitch { assign, .. } => {
                if let Stmt::Assign { lhs, op: AssignOp::Define, .. } = &**assign {
                    self.add_exprs(lhs);
                }
            }
            Stmt::Decl(decl) => {
                for name in decl.names() {
                    self.add(name);
                }
            }
            _ => {}
        }
        walk_stmt(self, stmt)
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        if let Expr::FuncLit { ty, .. } = expr {
            self.add_signature(ty);
        }
        walk_expr(self, expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use go_syntax::parse_file;
    use std::path::Path;

    fn names_of(src: &str) -> Vec<String> {
        let file = parse_file(Path::new("p.go"), src).unwrap();
        let func = file.func_decls().next().unwrap();
        bound_names(func).into_iter().collect()
    }

    #[test]
    fn test_signature_names() {
        let names = names_of("package p\nfunc (r *R) F[T any](a, b int, _ string) (n int, err error)\n");
        assert_eq!(names, ["T", "a", "b", "err", "n", "r"]);
    }

    #[test]
    fn test_body_bindings_are_flat() {
        let src = "package p
func F(ch chan int, m map[string]int) {
	if true {
		x := 1
		_ = x
	}
	for k, v := range m {
		_, _ = k, v
	}
	for _, w = range m {
	}
	var (
		y int
		_ = 2
	)
	const c = 3
	type local struct{}
	switch s := any(y).(type) {
	}
	select {
	case got := <-ch:
		_ = got
	}
	f := func(p int) (q int) { inner := p; return inner }
	_ = f
}
";
        let names = names_of(src);
        assert_eq!(
            names,
            ["c", "ch", "f", "got", "inner", "k", "local", "m", "p", "q", "s", "v", "x", "y"]
        );
    }

    #[test]
    fn test_no_body() {
        assert_eq!(names_of("package p\nfunc F(a int)\n"), ["a"]);
        assert!(names_of("package p\nfunc F() {}\n").is_empty());
    }
}
