// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::options::{EmitFormat, ExtractOptions};
use crate::output::{render_go, render_graph};
use crate::sources::load_package;
use anyhow::{anyhow, Context};
use decl_closure::{dependency_graph, DeclArena, DependencyResolver, SymbolTable};
use std::path::PathBuf;

/// Where the result went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stdout,
}

/// Run the whole extraction and return the text to write
pub fn extract(options: &ExtractOptions) -> anyhow::Result<String> {
    let function = options
        .function
        .as_deref()
        .ok_or_else(|| anyhow!("no function name given"))?;

    let package = load_package(
        &options.directory,
        options.include_tests,
        options.package.as_deref(),
    )?;
    log::info!(
        "analyzing package {} ({} files)",
        package.name,
        package.files.len()
    );

    let arena = DeclArena::new(package.files);
    let symbols = SymbolTable::build(&arena, options.redeclaration)?;
    log::debug!(
        "indexed {} declarations under {} names",
        arena.len(),
        symbols.len()
    );

    let resolver = DependencyResolver::new(&arena, &symbols).with_mode(options.binding_mode);
    let resolution = resolver.resolve(function)?;

    Ok(match options.emit {
        EmitFormat::Go => render_go(&package.name, &arena, &resolution),
        EmitFormat::Graph => render_graph(&dependency_graph(&resolver, resolution.target)),
    })
}

/// Extract and write the result. Nothing is written when extraction fails.
pub fn execute(options: &ExtractOptions, to_stdout: bool) -> anyhow::Result<Destination> {
    let text = extract(options)?;
    if to_stdout {
        print!("{text}");
        return Ok(Destination::Stdout);
    }
    std::fs::write(&options.output, text)
        .with_context(|| format!("failed to write {}", options.output.display()))?;
    Ok(Destination::File(options.output.clone()))
}
