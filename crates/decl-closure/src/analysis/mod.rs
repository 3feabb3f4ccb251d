// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Analyses over function bodies and the dependency closure built from them

mod builtins;
mod dependency_graph;
mod free_idents;
mod local_bindings;
mod resolver;

pub use builtins::{builtins, is_builtin};
pub use dependency_graph::{dependency_graph, DependencyGraph};
pub use free_idents::identifiers;
pub use local_bindings::{bound_names, BoundNameSet};
pub use resolver::{BindingMode, DependencyClosure, DependencyResolver, Resolution};
