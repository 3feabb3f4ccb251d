// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::token::Span;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use std::fmt;
use std::path::PathBuf;

/// A lexical or syntactic error in one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub path: PathBuf,
    pub span: Span,
    pub message: String,
}

impl ParseError {
    pub fn new(path: impl Into<PathBuf>, span: Span, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            span,
            message: message.into(),
        }
    }

    /// Convert into a diagnostic against `file_id` of a codespan file database
    pub fn to_diagnostic<FileId: Copy>(&self, file_id: FileId) -> Diagnostic<FileId> {
        Diagnostic::error()
            .with_message(format!("error parsing {}", self.path.display()))
            .with_labels(vec![
                Label::primary(file_id, self.span.range()).with_message(self.message.clone())
            ])
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.path.display(),
            self.span.start,
            self.message
        )
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;
