// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Predeclared functions that are never dependencies

const BUILTINS: &[&str] = &[
    "append", "cap", "clear", "close", "complex", "delete", "imag", "len", "make", "max", "min",
    "new", "panic", "print", "println", "real", "recover",
];

/// True for the predeclared function names, regardless of any package-level
/// declaration with the same name
pub fn is_builtin(name: &str) -> bool {
    BUILTINS.binary_search(&name).is_ok()
}

pub fn builtins() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().copied()
}
