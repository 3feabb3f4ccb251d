// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Rendering an extraction as a Go file or as a DOT graph

use decl_closure::{DeclArena, DeclId, DependencyGraph, Resolution};
use go_syntax::ast::{Binding, Decl, Ident, ImportSpec};
use go_syntax::visit::{walk_func_decl, walk_gen_decl, Visitor};
use itertools::Itertools;
use petgraph::dot::Dot;

pub const REQUESTED_HEADER: &str = "// --- Requested Function ---";
pub const DEPENDENCIES_HEADER: &str = "// --- Top-level Dependencies Found ---";
pub const NO_DEPENDENCIES: &str = "// No additional top-level dependencies found.";

/// The package clause, the imports the extracted declarations use, the
/// requested function and then every dependency in discovery order
pub fn render_go(package: &str, arena: &DeclArena, resolution: &Resolution) -> String {
    let mut out = format!("package {package}\n\n");

    let ids: Vec<DeclId> = std::iter::once(resolution.target)
        .chain(resolution.dependencies.iter().copied())
        .collect();
    let imports = go_syntax::render_imports(used_imports(arena, &ids));
    if !imports.is_empty() {
        out.push_str(&imports);
        out.push('\n');
    }

    out.push_str(REQUESTED_HEADER);
    out.push('\n');
    out.push_str(&arena.render(resolution.target));
    out.push('\n');

    if resolution.dependencies.is_empty() {
        out.push_str(NO_DEPENDENCIES);
        out.push('\n');
        return out;
    }

    out.push_str(DEPENDENCIES_HEADER);
    out.push('\n');
    for &id in &resolution.dependencies {
        out.push_str(&arena.render(id));
        out.push('\n');
    }
    out
}

pub fn render_graph(graph: &DependencyGraph) -> String {
    format!("{}", Dot::new(graph))
}

/// Import specs referenced by the given declarations, each taken from the
/// file the referencing declaration lives in, in first-use order
fn used_imports<'a>(arena: &'a DeclArena, ids: &[DeclId]) -> Vec<&'a ImportSpec> {
    ids.iter()
        .flat_map(|&id| {
            let (file, decl) = arena.syntax(id);
            let mut collector = ImportUses::default();
            match decl {
                Decl::Func(func) => walk_func_decl(&mut collector, func),
                Decl::Gen(gen) => walk_gen_decl(&mut collector, gen),
            }
            collector
                .names
                .into_iter()
                .filter_map(move |name| {
                    file.imports
                        .iter()
                        .find(|spec| spec.local_name() == Some(name))
                })
        })
        .unique_by(|spec| go_syntax::render_import(spec))
        .collect()
}

#[derive(Default)]
struct ImportUses<'ast> {
    names: Vec<&'ast str>,
}

impl<'ast> Visitor<'ast> for ImportUses<'ast> {
    fn visit_ident(&mut self, ident: &'ast Ident) {
        if ident.binding == Binding::Import && !self.names.contains(&ident.name.as_str()) {
            self.names.push(&ident.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decl_closure::{DependencyResolver, RedeclarationPolicy, SymbolTable};
    use std::path::Path;

    fn extract(sources: &[&str], name: &str) -> String {
        let files = sources
            .iter()
            .enumerate()
            .map(|(i, src)| go_syntax::parse_file(Path::new(&format!("f{i}.go")), src).unwrap())
            .collect();
        let arena = DeclArena::new(files);
        let symbols = SymbolTable::build(&arena, RedeclarationPolicy::LastWins).unwrap();
        let resolution = DependencyResolver::new(&arena, &symbols)
            .resolve(name)
            .unwrap();
        render_go("p", &arena, &resolution)
    }

    #[test]
    fn test_no_dependencies() {
        let out = extract(&["package p\n\nfunc Lonely() {\n\tprintln(1)\n}\n"], "Lonely");
        assert_eq!(
            out,
            "package p\n\n// --- Requested Function ---\nfunc Lonely() {\n\tprintln(1)\n}\n// No additional top-level dependencies found.\n"
        );
    }

    #[test]
    fn test_dependencies_follow_without_blank_lines() {
        let out = extract(
            &["package p\n\nfunc F() int { return G() + K }\n\n// G doubles K.\nfunc G() int { return K * 2 }\n\nconst K = 3\n"],
            "F",
        );
        assert_eq!(
            out,
            "package p\n\n// --- Requested Function ---\nfunc F() int { return G() + K }\n// --- Top-level Dependencies Found ---\n// G doubles K.\nfunc G() int { return K * 2 }\nconst K = 3\n"
        );
    }

    #[test]
    fn test_only_used_imports_are_kept() {
        let out = extract(
            &[
                "package p\n\nimport (\n\t\"fmt\"\n\t\"os\"\n)\n\nfunc F() { fmt.Println(Name) }\n\nfunc Exit() { os.Exit(1) }\n",
                "package p\n\nimport str \"strings\"\n\nvar Name = str.ToUpper(\"x\")\n",
            ],
            "F",
        );
        assert!(out.starts_with(
            "package p\n\nimport (\n\t\"fmt\"\n\tstr \"strings\"\n)\n\n// --- Requested Function ---\n"
        ));
        assert!(!out.contains("\"os\""));
    }

    #[test]
    fn test_versioned_imports_are_kept() {
        let out = extract(
            &["package p\n\nimport (\n\t\"github.com/go-chi/chi/v5\"\n\t\"gopkg.in/yaml.v3\"\n)\n\nfunc F() { _ = chi.NewRouter(); _ = yaml.Marshal }\n"],
            "F",
        );
        assert_eq!(
            out,
            "package p\n\nimport (\n\t\"github.com/go-chi/chi/v5\"\n\t\"gopkg.in/yaml.v3\"\n)\n\n// --- Requested Function ---\nfunc F() { _ = chi.NewRouter(); _ = yaml.Marshal }\n// No additional top-level dependencies found.\n"
        );
    }

    #[test]
    fn test_import_used_twice_is_listed_once() {
        let out = extract(
            &["package p\n\nimport \"fmt\"\n\nfunc F() { fmt.Println(1); G() }\n\nfunc G() { fmt.Println(2) }\n"],
            "F",
        );
        assert!(out.starts_with("package p\n\nimport \"fmt\"\n\n// --- Requested Function ---\n"));
    }
}
