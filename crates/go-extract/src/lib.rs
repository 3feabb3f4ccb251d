// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Extract a Go function and its transitive top-level dependencies into a
//! standalone file

pub mod cli;
pub mod extract;
pub mod options;
pub mod output;
pub mod prompt;
pub mod sources;

pub use extract::{execute, extract, Destination};
pub use options::{EmitFormat, ExtractOptions};

use anyhow::Context;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::Path;

/// Log to stderr at `level` and, when `log_file` is given, everything down
/// to debug into that file
pub fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file));
    }
    CombinedLogger::init(loggers).context("failed to initialize logging")
}
