// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

pub mod declaration;
pub mod symbols;

pub use declaration::{DeclArena, DeclId, DeclKind, Declaration};
pub use symbols::{RedeclarationPolicy, SymbolTable};
