// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::ast::{Binding, Ident, LocalKind};
use std::collections::HashMap;

/// Stack of function-local scopes used while resolving identifiers.
///
/// The package scope is deliberately absent: anything not found here is a
/// package-level or predeclared name and stays [`Binding::Free`].
#[derive(Debug, Default)]
pub(crate) struct ScopeStack {
    scopes: Vec<HashMap<String, LocalKind>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        debug_assert!(!self.scopes.is_empty(), "attempting to pop past the function scope");
        self.scopes.pop();
    }

    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Bind `ident` in the innermost scope and record the binding on it
    pub fn declare(&mut self, ident: &mut Ident, kind: LocalKind) {
        if ident.is_blank() {
            ident.binding = Binding::Blank;
            return;
        }
        self.bind(&ident.name, kind);
        ident.binding = Binding::Local(kind);
    }

    /// Bind a name with no identifier occurrence of its own, such as the
    /// implicit variable of a type switch clause
    pub fn bind(&mut self, name: &str, kind: LocalKind) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), kind);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<LocalKind> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    pub fn lookup_current(&self, name: &str) -> Option<LocalKind> {
        self.scopes.last().and_then(|scope| scope.get(name).copied())
    }
}
