// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::data::DeclKind;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The requested function is not in the function table
    NameNotFound(String),
    /// A second declaration of the same kind and name under
    /// [`RedeclarationPolicy::Reject`](crate::RedeclarationPolicy::Reject)
    DuplicateDeclaration { kind: DeclKind, name: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NameNotFound(name) => write!(f, "Function '{name}' not found."),
            ResolveError::DuplicateDeclaration { kind, name } => {
                write!(f, "{name} redeclared: duplicate {kind} declaration")
            }
        }
    }
}

impl std::error::Error for ResolveError {}
