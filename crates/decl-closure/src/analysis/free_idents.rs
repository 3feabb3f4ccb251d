// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use go_syntax::ast::{FuncDecl, Ident};
use go_syntax::visit::Visitor;

/// Every identifier occurrence in the body of `func`, in pre-order, with
/// duplicates. Nothing is filtered here; the resolver decides which
/// occurrences are references to package-level declarations.
pub fn identifiers(func: &FuncDecl) -> Vec<&Ident> {
    let mut collector = IdentCollector(Vec::new());
    if let Some(body) = &func.body {
        collector.visit_block(body);
    }
    collector.0
}

struct IdentCollector<'ast>(Vec<&'ast Ident>);

impl<'ast> Visitor<'ast> for IdentCollector<'ast> {
    fn visit_ident(&mut self, ident: &'ast Ident) {
        self.0.push(ident);
    }
}
