// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Dependency graph of a function and its closure

use crate::analysis::resolver::DependencyResolver;
use crate::data::DeclId;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Nodes are labelled `func helperFunc`, `type MyType`, ...; an edge
/// `a -> b` is labelled with the name through which `a` references `b`
pub type DependencyGraph = DiGraph<String, String>;

/// Build the graph over `start` and its closure. Edges back to already
/// visited declarations are kept, so cycles show up as cycles.
pub fn dependency_graph(resolver: &DependencyResolver, start: DeclId) -> DependencyGraph {
    let arena = resolver.arena();
    let symbols = resolver.symbols();

    let ids: Vec<DeclId> = std::iter::once(start).chain(resolver.closure(start)).collect();

    let mut graph = DependencyGraph::new();
    let mut nodes: HashMap<DeclId, NodeIndex> = HashMap::new();
    for &id in &ids {
        nodes.insert(id, graph.add_node(arena.label(id)));
    }

    let mut seen = HashSet::new();
    for id in ids {
        let from = nodes[&id];
        for name in resolver.direct_dependencies(id) {
            for dep in symbols.lookup_all(name) {
                let Some(&to) = nodes.get(&dep) else {
                    continue;
                };
                if seen.insert((from, to)) {
                    graph.add_edge(from, to, name.to_string());
                }
            }
        }
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DeclArena, RedeclarationPolicy, SymbolTable};
    use go_syntax::parse_file;
    use std::path::Path;

    #[test]
    fn test_graph_keeps_cycles() {
        let src = "package p\nfunc A() { B(); Limit() }\nfunc B() { A() }\nfunc Limit() {}\nfunc Unused() {}\n";
        let arena = DeclArena::new(vec![parse_file(Path::new("p.go"), src).unwrap()]);
        let symbols = SymbolTable::build(&arena, RedeclarationPolicy::LastWins).unwrap();
        let resolver = DependencyResolver::new(&arena, &symbols);

        let graph = dependency_graph(&resolver, 0);
        let labels: Vec<_> = graph.node_indices().map(|n| graph[n].clone()).collect();
        assert_eq!(labels, ["func A", "func B", "func Limit"]);

        let edges: Vec<_> = graph
            .edge_indices()
            .filter_map(|e| graph.edge_endpoints(e).map(|(a, b)| (a.index(), b.index(), graph[e].clone())))
            .collect();
        assert_eq!(
            edges,
            vec![(0, 1, "B".to_string()), (0, 2, "Limit".to_string()), (1, 0, "A".to_string())]
        );
    }
}
