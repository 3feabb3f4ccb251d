// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Per-kind name tables over the declaration arena

use crate::data::declaration::{DeclArena, DeclId, DeclKind};
use crate::error::ResolveError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What to do when two declarations of the same kind share a name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RedeclarationPolicy {
    /// Keep the later declaration and log a warning
    #[default]
    LastWins,
    /// Fail with [`ResolveError::DuplicateDeclaration`]
    Reject,
}

/// Four disjoint name tables, one per declaration kind, in insertion order
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    pub functions: IndexMap<String, DeclId>,
    pub types: IndexMap<String, DeclId>,
    pub variables: IndexMap<String, DeclId>,
    pub constants: IndexMap<String, DeclId>,
}

impl SymbolTable {
    pub fn build(arena: &DeclArena, policy: RedeclarationPolicy) -> Result<Self, ResolveError> {
        let mut table = Self::default();
        for decl in arena.iter() {
            for name in &decl.names {
                table.insert(decl.kind, name, decl.id, policy)?;
            }
        }
        log::info!(
            "indexed {} functions, {} types, {} variables, {} constants",
            table.functions.len(),
            table.types.len(),
            table.variables.len(),
            table.constants.len()
        );
        Ok(table)
    }

    pub fn table(&self, kind: DeclKind) -> &IndexMap<String, DeclId> {
        match kind {
            DeclKind::Function => &self.functions,
            DeclKind::Type => &self.types,
            DeclKind::Variable => &self.variables,
            DeclKind::Constant => &self.constants,
        }
    }

    fn table_mut(&mut self, kind: DeclKind) -> &mut IndexMap<String, DeclId> {
        match kind {
            DeclKind::Function => &mut self.functions,
            DeclKind::Type => &mut self.types,
            DeclKind::Variable => &mut self.variables,
            DeclKind::Constant => &mut self.constants,
        }
    }

    pub fn insert(
        &mut self,
        kind: DeclKind,
        name: &str,
        id: DeclId,
        policy: RedeclarationPolicy,
    ) -> Result<(), ResolveError> {
        let table = self.table_mut(kind);
        match table.get(name) {
            Some(&existing) if existing != id => match policy {
                RedeclarationPolicy::Reject => {
                    return Err(ResolveError::DuplicateDeclaration {
                        kind,
                        name: name.to_string(),
                    })
                }
                RedeclarationPolicy::LastWins => {
                    log::warn!("{kind} '{name}' redeclared; keeping the later declaration");
                }
            },
            _ => {}
        }
        // IndexMap keeps the original position on overwrite
        table.insert(name.to_string(), id);
        Ok(())
    }

    pub fn lookup(&self, kind: DeclKind, name: &str) -> Option<DeclId> {
        self.table(kind).get(name).copied()
    }

    /// Every declaration registered under `name`, functions first, then
    /// types, variables and constants
    pub fn lookup_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = DeclId> + 'a {
        DeclKind::ALL
            .into_iter()
            .filter_map(move |kind| self.lookup(kind, name))
    }

    pub fn len(&self) -> usize {
        DeclKind::ALL.iter().map(|kind| self.table(*kind).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use go_syntax::parse_file;
    use std::path::Path;

    fn arena(src: &str) -> DeclArena {
        DeclArena::new(vec![parse_file(Path::new("p.go"), src).unwrap()])
    }

    #[test]
    fn test_grouped_declaration_shares_identity() {
        let arena = arena("package p\nvar (\n\tA = 1\n\tB = 2\n)\n");
        let table = SymbolTable::build(&arena, RedeclarationPolicy::LastWins).unwrap();
        assert_eq!(table.lookup(DeclKind::Variable, "A"), Some(0));
        assert_eq!(table.lookup(DeclKind::Variable, "B"), Some(0));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_kinds_are_disjoint() {
        let arena = arena("package p\nfunc X() {}\ntype X int\nconst Y = 1\nvar Z = Y\n");
        let table = SymbolTable::build(&arena, RedeclarationPolicy::LastWins).unwrap();
        assert_eq!(table.lookup_all("X").collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(table.lookup(DeclKind::Constant, "Y"), Some(2));
        assert_eq!(table.lookup(DeclKind::Function, "Y"), None);
        assert_eq!(table.lookup_all("missing").count(), 0);
    }

    #[test]
    fn test_redeclaration_policies() {
        let arena = arena("package p\nfunc F() {}\nfunc F() { F() }\n");

        let table = SymbolTable::build(&arena, RedeclarationPolicy::LastWins).unwrap();
        assert_eq!(table.lookup(DeclKind::Function, "F"), Some(1));
        assert_eq!(table.functions.len(), 1);

        let err = SymbolTable::build(&arena, RedeclarationPolicy::Reject).unwrap_err();
        assert_eq!(
            err,
            ResolveError::DuplicateDeclaration {
                kind: DeclKind::Function,
                name: "F".to_string()
            }
        );
    }

    #[test]
    fn test_methods_do_not_collide_with_functions() {
        let arena = arena("package p\ntype T int\nfunc (T) String() string { return \"\" }\nfunc String() {}\n");
        let table = SymbolTable::build(&arena, RedeclarationPolicy::Reject).unwrap();
        assert_eq!(table.lookup(DeclKind::Function, "T.String"), Some(1));
        assert_eq!(table.lookup(DeclKind::Function, "String"), Some(2));
    }
}
