// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Top-level declarations and the arena that owns them

use go_syntax::ast::{Decl, DeclKeyword, FuncDecl};
use go_syntax::SourceFile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Unique identifier for a declaration in the arena
pub type DeclId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclKind {
    Function,
    Type,
    Variable,
    Constant,
}

impl DeclKind {
    /// Lookup order used when resolving a referenced name
    pub const ALL: [DeclKind; 4] = [
        DeclKind::Function,
        DeclKind::Type,
        DeclKind::Variable,
        DeclKind::Constant,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            DeclKind::Function => "func",
            DeclKind::Type => "type",
            DeclKind::Variable => "var",
            DeclKind::Constant => "const",
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeclKind::Function => "function",
            DeclKind::Type => "type",
            DeclKind::Variable => "variable",
            DeclKind::Constant => "constant",
        };
        f.write_str(name)
    }
}

/// One top-level declaration of the package
#[derive(Debug, Clone)]
pub struct Declaration {
    pub id: DeclId,
    pub kind: DeclKind,

    /// Names the declaration is registered under. A grouped `var`, `const`
    /// or `type` declaration has several; a method has one, `Recv.Name`.
    /// Blank names are left out, so this may be empty.
    pub names: Vec<String>,

    /// Index of the file in [`DeclArena::files`]
    pub file: usize,

    /// Index of the declaration within its file
    pub index: usize,
}

impl Declaration {
    /// Display name: the first registered name, or `_`
    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or("_")
    }
}

/// Owns the parsed files of one package and every top-level declaration in
/// them, in file order then source order
#[derive(Debug, Clone, Default)]
pub struct DeclArena {
    files: Vec<SourceFile>,
    decls: Vec<Declaration>,
}

impl DeclArena {
    pub fn new(files: Vec<SourceFile>) -> Self {
        let mut decls = Vec::new();
        for (file_idx, file) in files.iter().enumerate() {
            for (index, decl) in file.decls.iter().enumerate() {
                let Some((kind, names)) = classify(decl) else {
                    continue;
                };
                decls.push(Declaration {
                    id: decls.len(),
                    kind,
                    names,
                    file: file_idx,
                    index,
                });
            }
        }
        Self { files, decls }
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.decls.iter()
    }

    /// The file and syntax node of a declaration
    pub fn syntax(&self, id: DeclId) -> (&SourceFile, &Decl) {
        let decl = &self.decls[id];
        let file = &self.files[decl.file];
        (file, &file.decls[decl.index])
    }

    pub fn func_decl(&self, id: DeclId) -> Option<&FuncDecl> {
        self.syntax(id).1.as_func()
    }

    /// Source text of a declaration including its doc comment
    pub fn render(&self, id: DeclId) -> String {
        let (file, decl) = self.syntax(id);
        go_syntax::render_decl(file, decl)
    }

    /// Short label such as `func helperFunc`
    pub fn label(&self, id: DeclId) -> String {
        let decl = &self.decls[id];
        format!("{} {}", decl.kind.keyword(), decl.name())
    }
}

impl Index<DeclId> for DeclArena {
    type Output = Declaration;

    fn index(&self, id: DeclId) -> &Declaration {
        &self.decls[id]
    }
}

/// Kind and registered names of a top-level declaration; imports are not
/// declarations of the package
fn classify(decl: &Decl) -> Option<(DeclKind, Vec<String>)> {
    match decl {
        Decl::Func(func) => {
            let name = match func.receiver_type_name() {
                Some(recv) => format!("{recv}.{}", func.name.name),
                None => func.name.name.clone(),
            };
            // `init` may be declared many times and can never be referenced
            let referable = !func.name.is_blank() && (func.recv.is_some() || name != "init");
            let names = if referable { vec![name] } else { Vec::new() };
            Some((DeclKind::Function, names))
        }
        Decl::Gen(gen) => {
            let kind = match gen.keyword {
                DeclKeyword::Import => return None,
                DeclKeyword::Type => DeclKind::Type,
                DeclKeyword::Var => DeclKind::Variable,
                DeclKeyword::Const => DeclKind::Constant,
            };
            let names = gen
                .names()
                .filter(|ident| !ident.is_blank())
                .map(|ident| ident.name.clone())
                .collect();
            Some((kind, names))
        }
    }
}
