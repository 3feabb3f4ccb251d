// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use go_extract::{execute, extract, Destination, EmitFormat, ExtractOptions};
use std::path::{Path, PathBuf};

/// Options from the fixture's `extract.toml`, with paths relative to the fixture
fn fixture_options(fixture_dir: &Path) -> ExtractOptions {
    ExtractOptions::from_file(&fixture_dir.join("extract.toml"))
        .unwrap()
        .rebase(fixture_dir)
}

/// Runs the extraction described by `extract.toml` and returns the output,
/// or the error message when extraction fails
fn run_extract(config_path: &Path) -> String {
    let fixture_dir = config_path.parent().unwrap();
    match extract(&fixture_options(fixture_dir)) {
        Ok(output) => output,
        Err(err) => format!("error: {err:#}"),
    }
}

#[test]
fn run_go_tests() {
    let mut count = 0;
    for entry in glob::glob("tests/inputs/*/extract.toml").expect("Invalid glob pattern") {
        let config_path = entry.expect("Failed to read file path");
        let output = run_extract(&config_path);
        let name = config_path
            .parent()
            .and_then(|dir| dir.file_name())
            .unwrap()
            .to_string_lossy()
            .to_string();

        insta::with_settings!({
            prepend_module_to_snapshot => false,
            snapshot_path => "snapshots",
        }, {
            insta::assert_snapshot!(name, output);
        });
        count += 1;
    }
    assert!(count > 0, "no fixtures found");
}

#[test]
fn test_output_file_is_written() {
    let out_dir = tempfile::tempdir().unwrap();
    let mut options = fixture_options(Path::new("tests/inputs/mutual_recursion"));
    options.output = out_dir.path().join("parity.go");

    let destination = execute(&options, false).unwrap();
    assert_eq!(destination, Destination::File(options.output.clone()));

    let written = std::fs::read_to_string(&options.output).unwrap();
    assert_eq!(written, extract(&options).unwrap());
    assert!(written.starts_with("package parity\n\n// --- Requested Function ---\n"));
}

#[test]
fn test_nothing_written_for_unknown_function() {
    let out_dir = tempfile::tempdir().unwrap();
    let mut options = fixture_options(Path::new("tests/inputs/unknown_function"));
    options.output = out_dir.path().join("out.go");

    let err = execute(&options, false).unwrap_err();
    assert_eq!(err.to_string(), "Function 'Missing' not found.");
    assert!(!options.output.exists());
}

#[test]
fn test_test_files_can_be_included() {
    let mut options = fixture_options(Path::new("tests/inputs/scenario_a"));
    options.include_tests = true;
    // the test file's helperFunc is read last and replaces the other one
    let output = extract(&options).unwrap();
    assert!(output.contains("from the test file"));
    assert!(!output.contains("string(rune(MyConst))"));
    assert!(!output.contains("const MyConst = 42"));
}

#[test]
fn test_graph_output() {
    let mut options = fixture_options(Path::new("tests/inputs/scenario_a"));
    options.emit = EmitFormat::Graph;
    let dot = extract(&options).unwrap();
    assert!(dot.starts_with("digraph {"));
    for label in ["func DoStuff", "func helperFunc", "var MyVar", "type MyType", "const MyConst"] {
        assert!(dot.contains(label), "{label} missing from\n{dot}");
    }
    assert!(!dot.contains("unused"));
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let options = ExtractOptions {
        function: Some("Main".to_string()),
        directory: PathBuf::from(dir.path()),
        ..Default::default()
    };
    let err = extract(&options).unwrap_err();
    assert_eq!(err.to_string(), "No Go files found in the directory.");
}
