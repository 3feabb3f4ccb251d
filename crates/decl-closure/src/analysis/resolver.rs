// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Direct dependencies of a declaration and their transitive closure

use crate::analysis::builtins::is_builtin;
use crate::analysis::free_idents::identifiers;
use crate::analysis::local_bindings::bound_names;
use crate::data::{DeclArena, DeclId, DeclKind, SymbolTable};
use crate::error::ResolveError;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Declarations reachable from a start declaration, in discovery order,
/// without the start itself
pub type DependencyClosure = Vec<DeclId>;

/// How locally bound names are excluded from a function's references
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindingMode {
    /// Additionally drop any name bound anywhere in the function, whatever
    /// its scope
    #[default]
    Flat,
    /// Rely only on the scope-accurate bindings recorded by the parser
    Lexical,
}

/// Result of resolving a requested function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub target: DeclId,
    pub dependencies: DependencyClosure,
}

pub struct DependencyResolver<'a> {
    arena: &'a DeclArena,
    symbols: &'a SymbolTable,
    mode: BindingMode,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(arena: &'a DeclArena, symbols: &'a SymbolTable) -> Self {
        Self {
            arena,
            symbols,
            mode: BindingMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: BindingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn arena(&self) -> &'a DeclArena {
        self.arena
    }

    pub fn symbols(&self) -> &'a SymbolTable {
        self.symbols
    }

    /// Names referenced by `id` that may denote package-level declarations,
    /// in encounter order and not deduplicated. Only functions have any.
    pub fn direct_dependencies(&self, id: DeclId) -> Vec<&'a str> {
        let Some(func) = self.arena.func_decl(id) else {
            return Vec::new();
        };

        let bound = match self.mode {
            BindingMode::Flat => bound_names(func),
            BindingMode::Lexical => Default::default(),
        };

        identifiers(func)
            .into_iter()
            .filter(|ident| ident.binding.is_free())
            .map(|ident| ident.name.as_str())
            .filter(|name| !name.is_empty() && !is_builtin(name) && !bound.contains(*name))
            .collect()
    }

    /// Breadth-first closure over direct dependencies. Every declaration a
    /// name resolves to joins the closure; only functions are scanned further.
    pub fn closure(&self, start: DeclId) -> DependencyClosure {
        let mut visited = HashSet::from([start]);
        let mut result = Vec::new();
        let mut worklist = VecDeque::from([start]);

        while let Some(id) = worklist.pop_front() {
            log::debug!("scanning {}", self.arena.label(id));
            for name in self.direct_dependencies(id) {
                for dep in self.symbols.lookup_all(name) {
                    if !visited.insert(dep) {
                        continue;
                    }
                    log::debug!("  {} -> {}", self.arena[id].name(), self.arena.label(dep));
                    result.push(dep);
                    if self.arena[dep].kind == DeclKind::Function {
                        worklist.push_back(dep);
                    }
                }
            }
        }
        result
    }

    /// Look up `name` among the functions and compute its closure
    pub fn resolve(&self, name: &str) -> Result<Resolution, ResolveError> {
        let target = self
            .symbols
            .lookup(DeclKind::Function, name)
            .ok_or_else(|| ResolveError::NameNotFound(name.to_string()))?;
        log::info!("resolving dependencies of {}", self.arena.label(target));
        let dependencies = self.closure(target);
        log::info!("found {} dependencies", dependencies.len());
        Ok(Resolution { target, dependencies })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RedeclarationPolicy;
    use go_syntax::parse_file;
    use std::path::Path;

    fn index(sources: &[&str]) -> (DeclArena, SymbolTable) {
        let files = sources
            .iter()
            .enumerate()
            .map(|(i, src)| parse_file(Path::new(&format!("f{i}.go")), src).unwrap())
            .collect();
        let arena = DeclArena::new(files);
        let symbols = SymbolTable::build(&arena, RedeclarationPolicy::LastWins).unwrap();
        (arena, symbols)
    }

    fn closure_names(arena: &DeclArena, symbols: &SymbolTable, name: &str) -> Vec<String> {
        let resolution = DependencyResolver::new(arena, symbols).resolve(name).unwrap();
        resolution
            .dependencies
            .iter()
            .map(|id| arena[*id].name().to_string())
            .collect()
    }

    const SCENARIO_A: [&str; 2] = [
        "package example

func DoStuff() {
	x := helperFunc()
	println(\"MyVar =\", MyVar)
	var y MyType = x
	_ = y
}
",
        "package example

func helperFunc() MyType {
	return MyType{Field: string(rune(MyConst))}
}

var MyVar = \"global\"

type MyType struct {
	Field string
}

const MyConst = 42
",
    ];

    #[test]
    fn test_transitive_closure_in_discovery_order() {
        let (arena, symbols) = index(&SCENARIO_A);
        assert_eq!(
            closure_names(&arena, &symbols, "DoStuff"),
            ["helperFunc", "MyVar", "MyType", "MyConst"]
        );
    }

    #[test]
    fn test_unknown_function() {
        let (arena, symbols) = index(&SCENARIO_A);
        let resolver = DependencyResolver::new(&arena, &symbols);
        assert_eq!(
            resolver.resolve("Missing"),
            Err(ResolveError::NameNotFound("Missing".to_string()))
        );
        // only functions can be requested
        assert!(resolver.resolve("MyVar").is_err());
    }

    #[test]
    fn test_empty_body_and_builtins_only() {
        let (arena, symbols) = index(&[
            "package p\nfunc Empty() {}\nfunc Intrinsics() {\n\ts := make([]int, 0)\n\ts = append(s, len(s))\n\tprintln(cap(s))\n}\nfunc len() {}\n",
        ]);
        assert!(closure_names(&arena, &symbols, "Empty").is_empty());
        assert!(closure_names(&arena, &symbols, "Intrinsics").is_empty());
    }

    #[test]
    fn test_mutual_recursion() {
        let (arena, symbols) = index(&["package p\nfunc A() { B() }\nfunc B() { A() }\n"]);
        assert_eq!(closure_names(&arena, &symbols, "A"), ["B"]);
        assert_eq!(closure_names(&arena, &symbols, "B"), ["A"]);
    }

    #[test]
    fn test_self_recursion_is_not_included() {
        let (arena, symbols) = index(&["package p\nfunc Fact(n int) int {\n\tif n == 0 {\n\t\treturn 1\n\t}\n\treturn n * Fact(n-1)\n}\n"]);
        assert!(closure_names(&arena, &symbols, "Fact").is_empty());
    }

    #[test]
    fn test_leaves_are_not_expanded() {
        // Base only reaches Hidden through the type and the variable, which are leaves
        let (arena, symbols) = index(&[
            "package p\ntype T struct{ h Hidden }\nvar V = Hidden{}\ntype Hidden int\nfunc Base() { var t T; _ = t; _ = V }\n",
        ]);
        assert_eq!(closure_names(&arena, &symbols, "Base"), ["T", "V"]);
    }

    #[test]
    fn test_name_in_several_tables() {
        let (arena, symbols) = index(&["package p\ntype X int\nconst X2 = 1\nfunc X() {}\nfunc F() { X() }\n"]);
        assert_eq!(closure_names(&arena, &symbols, "F"), ["X", "X"]);
    }

    #[test]
    fn test_no_duplicates_and_deterministic() {
        let (arena, symbols) = index(&SCENARIO_A);
        let resolver = DependencyResolver::new(&arena, &symbols);
        let first = resolver.resolve("DoStuff").unwrap();
        let second = resolver.resolve("DoStuff").unwrap();
        assert_eq!(first, second);
        let unique: HashSet<_> = first.dependencies.iter().collect();
        assert_eq!(unique.len(), first.dependencies.len());
        assert!(!first.dependencies.contains(&first.target));
    }

    #[test]
    fn test_direct_dependencies_skip_locals_and_members() {
        let (arena, symbols) = index(&[
            "package p\nimport \"fmt\"\nfunc F(cfg Config) {\n\tresult := Compute(cfg.Size)\n\tfmt.Println(result, Limit)\n}\n",
        ]);
        let resolver = DependencyResolver::new(&arena, &symbols);
        let target = symbols.lookup(DeclKind::Function, "F").unwrap();
        assert_eq!(resolver.direct_dependencies(target), ["Compute", "Limit"]);
    }

    #[test]
    fn test_flat_and_lexical_modes() {
        // `Config` is bound in one branch and used as the package-level
        // variable in another
        let (arena, symbols) = index(&[
            "package p\nvar Config = 1\nfunc F(ok bool) int {\n\tif ok {\n\t\tConfig := 2\n\t\treturn Config\n\t}\n\treturn Config\n}\n",
        ]);
        let target = symbols.lookup(DeclKind::Function, "F").unwrap();

        let flat = DependencyResolver::new(&arena, &symbols);
        assert!(flat.closure(target).is_empty());

        let lexical = DependencyResolver::new(&arena, &symbols).with_mode(BindingMode::Lexical);
        assert_eq!(lexical.closure(target), vec![0]);
    }

    #[test]
    fn test_methods_are_requested_by_receiver() {
        let (arena, symbols) = index(&["package p\ntype T int\nfunc (t T) Double() T { return scale(t) }\nfunc scale(t T) T { return t * Factor }\nconst Factor = 2\n"]);
        // signatures are not scanned, so the receiver type only comes in
        // through a body reference
        assert_eq!(closure_names(&arena, &symbols, "T.Double"), ["scale", "Factor"]);
    }

    #[test]
    fn test_method_calls_are_not_followed() {
        // `Push` is a selector member; only the receiver type named in the
        // body joins the closure
        let (arena, symbols) = index(&["package p\ntype S struct{}\nfunc (s S) Push() {}\nfunc F() {\n\tvar s S\n\ts.Push()\n}\n"]);
        assert_eq!(closure_names(&arena, &symbols, "F"), ["S"]);
        assert!(symbols.lookup(DeclKind::Function, "S.Push").is_some());
    }
}
