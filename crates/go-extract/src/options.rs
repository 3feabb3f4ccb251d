// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use clap::ValueEnum;
use decl_closure::{BindingMode, RedeclarationPolicy};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// What the extractor writes
#[derive(ValueEnum, Serialize, Deserialize, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EmitFormat {
    /// The function and its dependencies as Go source
    #[default]
    Go,
    /// The dependency graph in Graphviz DOT format
    Graph,
}

impl Display for EmitFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EmitFormat::Go => write!(f, "go"),
            EmitFormat::Graph => write!(f, "graph"),
        }
    }
}

/// Options of one extraction. Read from a TOML file with `--config`;
/// command-line flags override individual values.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractOptions {
    /// Function to extract. Methods are named `Type.Method`.
    pub function: Option<String>,
    /// Directory holding the package sources (not searched recursively)
    pub directory: PathBuf,
    /// File the result is written to
    pub output: PathBuf,
    /// Package to use when the directory holds more than one
    pub package: Option<String>,
    /// Whether `_test.go` files are read
    pub include_tests: bool,
    /// Handling of two top-level declarations of the same kind and name
    pub redeclaration: RedeclarationPolicy,
    /// How names bound inside a function are excluded
    pub binding_mode: BindingMode,
    pub emit: EmitFormat,
    /// Verbosity level for logging.
    pub verbosity_level: LevelFilter,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            function: None,
            directory: PathBuf::from("."),
            output: PathBuf::from("output.go"),
            package: None,
            include_tests: false,
            redeclaration: RedeclarationPolicy::default(),
            binding_mode: BindingMode::default(),
            emit: EmitFormat::default(),
            verbosity_level: LevelFilter::Warn,
        }
    }
}

impl ExtractOptions {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Relative paths in a config file are taken relative to the file
    pub fn rebase(mut self, base: &Path) -> Self {
        if self.directory.is_relative() {
            self.directory = base.join(&self.directory);
        }
        if self.output.is_relative() {
            self.output = base.join(&self.output);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_interactive_defaults() {
        let options = ExtractOptions::from_toml("").unwrap();
        assert_eq!(options, ExtractOptions::default());
        assert_eq!(options.directory, Path::new("."));
        assert_eq!(options.output, Path::new("output.go"));
        assert_eq!(options.binding_mode, BindingMode::Flat);
        assert_eq!(options.redeclaration, RedeclarationPolicy::LastWins);
    }

    #[test]
    fn test_parse_all_fields() {
        let options = ExtractOptions::from_toml(
            r#"
function = "Stack.Push"
directory = "src"
output = "out.go"
package = "stack"
include_tests = true
redeclaration = "reject"
binding_mode = "lexical"
emit = "graph"
verbosity_level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(options.function.as_deref(), Some("Stack.Push"));
        assert_eq!(options.package.as_deref(), Some("stack"));
        assert!(options.include_tests);
        assert_eq!(options.redeclaration, RedeclarationPolicy::Reject);
        assert_eq!(options.binding_mode, BindingMode::Lexical);
        assert_eq!(options.emit, EmitFormat::Graph);
        assert_eq!(options.verbosity_level, LevelFilter::Debug);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(ExtractOptions::from_toml("fucntion = \"Main\"").is_err());
    }

    #[test]
    fn test_rebase() {
        let options = ExtractOptions {
            output: PathBuf::from("/abs/out.go"),
            ..Default::default()
        }
        .rebase(Path::new("fixtures/a"));
        assert_eq!(options.directory, Path::new("fixtures/a/."));
        assert_eq!(options.output, Path::new("/abs/out.go"));
    }
}
