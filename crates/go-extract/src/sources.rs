// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Finding, parsing and grouping the Go files of a directory

use anyhow::{anyhow, bail, Context};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::{self, termcolor::Buffer};
use go_syntax::{ParseError, SourceFile};
use indexmap::IndexMap;
use itertools::Itertools;
use std::path::{Path, PathBuf};

/// The files of one Go package
#[derive(Debug)]
pub struct Package {
    pub name: String,
    pub files: Vec<SourceFile>,
}

/// `.go` files directly inside `dir`, sorted by path. Subdirectories are not
/// searched; `_test.go` files are skipped unless `include_tests` is set.
pub fn discover(dir: &Path, include_tests: bool) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if !name.ends_with(".go") || (!include_tests && name.ends_with("_test.go")) {
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    if paths.is_empty() {
        bail!("No Go files found in the directory.");
    }
    log::debug!("found {} Go files in {}", paths.len(), dir.display());
    Ok(paths)
}

/// Parse every file; the first syntax error aborts with a rendered diagnostic
pub fn parse_sources(paths: &[PathBuf]) -> anyhow::Result<Vec<SourceFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        match go_syntax::parse_file(path, &text) {
            Ok(file) => files.push(file),
            Err(err) => return Err(render_parse_error(&err, &text)),
        }
    }
    Ok(files)
}

fn render_parse_error(err: &ParseError, text: &str) -> anyhow::Error {
    let mut db = SimpleFiles::new();
    let file_id = db.add(err.path.display().to_string(), text);
    let diagnostic = err.to_diagnostic(file_id);

    let mut buffer = Buffer::no_color();
    let config = term::Config::default();
    if term::emit(&mut buffer, &config, &db, &diagnostic).is_err() {
        return anyhow!(err.clone());
    }
    anyhow!(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Group files by package clause and pick one package: `requested` if
/// given, otherwise the package of the first file
pub fn select_package(files: Vec<SourceFile>, requested: Option<&str>) -> anyhow::Result<Package> {
    let mut packages: IndexMap<String, Vec<SourceFile>> = IndexMap::new();
    for file in files {
        packages
            .entry(file.package.name.clone())
            .or_default()
            .push(file);
    }

    let name = match (requested, packages.keys().next()) {
        (Some(name), _) => name.to_string(),
        (None, Some(first)) => first.clone(),
        (None, None) => bail!("No Go files found in the directory."),
    };

    if packages.len() > 1 && requested.is_none() {
        log::warn!(
            "multiple packages found ({}), using '{}'",
            packages.keys().join(", "),
            name
        );
    }

    let found = packages.keys().join(", ");
    let files = packages
        .swap_remove(&name)
        .ok_or_else(|| anyhow!("package '{name}' not found; the directory holds: {found}"))?;
    Ok(Package { name, files })
}

/// Discover, parse and select in one go
pub fn load_package(
    dir: &Path,
    include_tests: bool,
    requested: Option<&str>,
) -> anyhow::Result<Package> {
    let paths = discover(dir, include_tests)?;
    let files = parse_sources(&paths)?;
    select_package(files, requested)
}
