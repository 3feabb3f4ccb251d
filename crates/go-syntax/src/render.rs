// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Rendering declarations back to Go source
//!
//! Declarations are reproduced from the original text, so formatting and
//! comments inside bodies survive unchanged.

use crate::ast::{Decl, ImportSpec, SourceFile};
use std::fmt::Write;

/// The declaration's doc comment, if any, followed by its source text
pub fn render_decl(file: &SourceFile, decl: &Decl) -> String {
    let mut out = String::new();
    if let Some(doc) = decl.doc() {
        out.push_str(file.slice(doc));
        out.push('\n');
    }
    out.push_str(file.slice(decl.span()));
    out
}

pub fn render_import(spec: &ImportSpec) -> String {
    match &spec.name {
        Some(name) => format!("{} \"{}\"", name.name, spec.path),
        None => format!("\"{}\"", spec.path),
    }
}

/// An import declaration for `specs`, grouped when there is more than one
pub fn render_imports<'a>(specs: impl IntoIterator<Item = &'a ImportSpec>) -> String {
    let specs: Vec<String> = specs.into_iter().map(render_import).collect();
    match specs.as_slice() {
        [] => String::new(),
        [single] => format!("import {single}\n"),
        many => {
            let mut out = String::from("import (\n");
            for spec in many {
                let _ = writeln!(out, "\t{spec}");
            }
            out.push_str(")\n");
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_file;
    use std::path::Path;

    const SRC: &str = "package p

import (
	\"fmt\"
	str \"strings\"
)

// Greet says hello.
func Greet(name string) {
	// inner comment survives
	fmt.Println(str.ToUpper(name))
}

var (
	a = 1
	b = 2
)
";

    #[test]
    fn test_render_decl_with_doc() {
        let file = parse_file(Path::new("p.go"), SRC).unwrap();
        let rendered = render_decl(&file, &file.decls[1]);
        assert_eq!(
            rendered,
            "// Greet says hello.\nfunc Greet(name string) {\n\t// inner comment survives\n\tfmt.Println(str.ToUpper(name))\n}"
        );
        assert_eq!(render_decl(&file, &file.decls[2]), "var (\n\ta = 1\n\tb = 2\n)");
    }

    #[test]
    fn test_render_imports() {
        let file = parse_file(Path::new("p.go"), SRC).unwrap();
        assert_eq!(render_imports(&file.imports[..1]), "import \"fmt\"\n");
        assert_eq!(
            render_imports(&file.imports),
            "import (\n\t\"fmt\"\n\tstr \"strings\"\n)\n"
        );
        assert_eq!(render_imports(&file.imports[..0]), "");
    }
}
