// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Transitive top-level dependencies of a Go function
//!
//! Indexes the top-level declarations of one package by kind and name, then
//! walks function bodies breadth-first to find every function, type,
//! variable and constant a requested function needs.

pub mod analysis;
mod data;
mod error;

// Declarations and name tables (from data/)
pub use data::{DeclArena, DeclId, DeclKind, Declaration, RedeclarationPolicy, SymbolTable};

// Dependency analysis (from analysis/)
pub use analysis::{
    dependency_graph, BindingMode, DependencyClosure, DependencyGraph, DependencyResolver,
    Resolution,
};

pub use error::ResolveError;
