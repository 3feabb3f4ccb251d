// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::options::{EmitFormat, ExtractOptions};
use clap::{ArgAction, Parser};
use decl_closure::{BindingMode, RedeclarationPolicy};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "go-extract",
    about = "Extract a Go function together with every top-level function, type, variable and constant it transitively depends on. Without a FUNCTION argument the tool asks for its inputs interactively.",
    rename_all = "kebab-case",
    author,
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Args {
    /// Function to extract; methods are given as `Type.Method`
    pub function: Option<String>,

    /// TOML file with extraction options; flags given here take precedence
    #[clap(long = "config", short = 'c')]
    pub config: Option<PathBuf>,

    /// Input options
    #[clap(flatten)]
    pub input_config: InputConfig,

    /// Output options
    #[clap(flatten)]
    pub output_config: OutputConfig,

    /// Analysis options
    #[clap(flatten)]
    pub analysis_config: AnalysisConfig,

    /// Logging options
    #[clap(flatten)]
    pub log_config: LogConfig,
}

#[derive(clap::Args, Debug, Default)]
#[clap(next_help_heading = "Input Options")]
pub struct InputConfig {
    /// Directory holding the package's `.go` files [default: .]
    #[clap(name = "directory", long, short = 'd')]
    pub directory: Option<PathBuf>,

    /// Package to analyze when the directory holds several
    #[clap(name = "package", long)]
    pub package: Option<String>,

    /// Also read `_test.go` files
    #[clap(name = "include-tests", long)]
    pub include_tests: bool,
}

#[derive(clap::Args, Debug, Default)]
#[clap(next_help_heading = "Output Options")]
pub struct OutputConfig {
    /// File to write [default: output.go]
    #[clap(name = "output", long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Write to standard output instead of a file
    #[clap(name = "stdout", long, conflicts_with = "output")]
    pub stdout: bool,

    /// What to write [default: go]
    #[clap(name = "emit", long, short = 'e')]
    pub emit: Option<EmitFormat>,
}

#[derive(clap::Args, Debug, Default)]
#[clap(next_help_heading = "Analysis Options")]
pub struct AnalysisConfig {
    /// Fail when a name is declared twice with the same kind instead of keeping the last one
    #[clap(name = "strict", long)]
    pub strict: bool,

    /// Exclude local names only where they are in scope
    #[clap(name = "lexical-scopes", long)]
    pub lexical_scopes: bool,
}

#[derive(clap::Args, Debug, Default)]
#[clap(next_help_heading = "Logging Options")]
pub struct LogConfig {
    /// More output on stderr; repeat for more detail
    #[clap(name = "verbose", long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Also write a debug log to this file
    #[clap(name = "log-file", long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Layer the command-line flags over `base`
    pub fn apply(&self, mut base: ExtractOptions) -> ExtractOptions {
        if let Some(function) = &self.function {
            base.function = Some(function.clone());
        }

        let input = &self.input_config;
        if let Some(directory) = &input.directory {
            base.directory = directory.clone();
        }
        if let Some(package) = &input.package {
            base.package = Some(package.clone());
        }
        base.include_tests |= input.include_tests;

        let output = &self.output_config;
        if let Some(path) = &output.output {
            base.output = path.clone();
        }
        if let Some(emit) = output.emit {
            base.emit = emit;
        }

        if self.analysis_config.strict {
            base.redeclaration = RedeclarationPolicy::Reject;
        }
        if self.analysis_config.lexical_scopes {
            base.binding_mode = BindingMode::Lexical;
        }

        base.verbosity_level = match self.log_config.verbose {
            0 => base.verbosity_level,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("go-extract").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_arguments_keeps_defaults() {
        let args = parse(&[]);
        assert!(args.function.is_none());
        assert_eq!(args.apply(ExtractOptions::default()), ExtractOptions::default());
    }

    #[test]
    fn test_flags_override_config() {
        let base = ExtractOptions {
            directory: PathBuf::from("from-config"),
            output: PathBuf::from("config.go"),
            binding_mode: BindingMode::Lexical,
            ..Default::default()
        };
        let args = parse(&["Run", "-d", "src", "--strict", "-vv", "--emit", "graph"]);
        let options = args.apply(base);

        assert_eq!(options.function.as_deref(), Some("Run"));
        assert_eq!(options.directory, Path::new("src"));
        assert_eq!(options.output, Path::new("config.go"));
        assert_eq!(options.redeclaration, RedeclarationPolicy::Reject);
        assert_eq!(options.binding_mode, BindingMode::Lexical);
        assert_eq!(options.emit, EmitFormat::Graph);
        assert_eq!(options.verbosity_level, LevelFilter::Debug);
    }

    #[test]
    fn test_stdout_conflicts_with_output() {
        let result = Args::try_parse_from(["go-extract", "Run", "--stdout", "-o", "x.go"]);
        assert!(result.is_err());
    }
}
