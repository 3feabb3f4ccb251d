// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Interactive questions asked when no function is given on the command line

use crate::options::ExtractOptions;
use anyhow::bail;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Ask for the directory, the function and the output file, in that order.
/// An empty answer keeps the current value.
pub fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    options: &mut ExtractOptions,
) -> anyhow::Result<()> {
    let directory = question(input, output, "Directory to analyze [default: .]: ")?;
    if !directory.is_empty() {
        options.directory = PathBuf::from(directory);
    }

    let function = question(input, output, "Name of the function to extract: ")?;
    if function.is_empty() {
        bail!("no function name given");
    }
    options.function = Some(function);

    let file = question(input, output, "Output file [default: output.go]: ")?;
    if !file.is_empty() {
        options.output = PathBuf::from(file);
    }
    Ok(())
}

fn question<R: BufRead, W: Write>(input: &mut R, output: &mut W, text: &str) -> anyhow::Result<String> {
    write!(output, "{text}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::Path;

    #[test]
    fn test_answers_and_defaults() {
        let mut input = Cursor::new("\n  DoStuff  \n\n");
        let mut shown = Vec::new();
        let mut options = ExtractOptions::default();
        ask(&mut input, &mut shown, &mut options).unwrap();

        assert_eq!(options.directory, Path::new("."));
        assert_eq!(options.function.as_deref(), Some("DoStuff"));
        assert_eq!(options.output, Path::new("output.go"));
        assert_eq!(
            String::from_utf8(shown).unwrap(),
            "Directory to analyze [default: .]: Name of the function to extract: Output file [default: output.go]: "
        );
    }

    #[test]
    fn test_explicit_answers() {
        let mut input = Cursor::new("./pkg\nStack.Push\nstack.go\n");
        let mut options = ExtractOptions::default();
        ask(&mut input, &mut Vec::<u8>::new(), &mut options).unwrap();
        assert_eq!(options.directory, Path::new("./pkg"));
        assert_eq!(options.function.as_deref(), Some("Stack.Push"));
        assert_eq!(options.output, Path::new("stack.go"));
    }

    #[test]
    fn test_missing_function_name() {
        let mut input = Cursor::new("\n\n");
        let mut options = ExtractOptions::default();
        assert!(ask(&mut input, &mut Vec::<u8>::new(), &mut options).is_err());
    }
}
