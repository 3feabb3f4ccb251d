// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Go syntax tree
//!
//! Types are represented as expressions, as in the Go grammar itself. Every
//! identifier carries a [`Binding`] filled in by the resolver after parsing.

use crate::token::Span;
use std::path::PathBuf;

/// What an identifier occurrence was resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Binding {
    /// Not bound inside the file: a package-level or predeclared name
    #[default]
    Free,
    /// Bound by the enclosing function (or a function literal inside it)
    Local(LocalKind),
    /// An imported package name
    Import,
    /// Selector member, struct field name or interface method name
    Member,
    /// Statement label
    Label,
    /// The blank identifier `_`
    Blank,
}

impl Binding {
    pub fn is_free(self) -> bool {
        self == Binding::Free
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalKind {
    Receiver,
    TypeParam,
    Param,
    Result,
    Var,
    Const,
    Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
    pub binding: Binding,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
            binding: Binding::Free,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

// ============================================================================
// Files and declarations
// ============================================================================

/// One parsed `.go` file
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Full source text; declarations are rendered by slicing it
    pub text: String,
    pub package: Ident,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
    pub comments: Vec<Span>,
}

impl SourceFile {
    pub fn slice(&self, span: Span) -> &str {
        &self.text[span.range()]
    }

    pub fn func_decls(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Func(func) => Some(func),
            Decl::Gen(_) => None,
        })
    }
}

#[derive(Debug, Clone)]
pub enum Decl {
    Func(FuncDecl),
    Gen(GenDecl),
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::Func(func) => func.span,
            Decl::Gen(gen) => gen.span,
        }
    }

    pub fn doc(&self) -> Option<Span> {
        match self {
            Decl::Func(func) => func.doc,
            Decl::Gen(gen) => gen.doc,
        }
    }

    pub fn as_func(&self) -> Option<&FuncDecl> {
        match self {
            Decl::Func(func) => Some(func),
            Decl::Gen(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub doc: Option<Span>,
    pub recv: Option<Field>,
    pub name: Ident,
    pub type_params: Vec<Field>,
    pub signature: FuncType,
    pub body: Option<Block>,
    pub span: Span,
}

impl FuncDecl {
    /// Base type name of the receiver, with pointers and type arguments removed
    pub fn receiver_type_name(&self) -> Option<&str> {
        let mut ty = &self.recv.as_ref()?.ty;
        loop {
            match ty {
                Expr::Ident(ident) => return Some(&ident.name),
                Expr::Star(inner) | Expr::Paren(inner) => ty = inner,
                Expr::Index { x, .. } => ty = x,
                _ => return None,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKeyword {
    Import,
    Const,
    Type,
    Var,
}

/// `import`, `const`, `type` or `var` declaration, possibly grouped
#[derive(Debug, Clone)]
pub struct GenDecl {
    pub doc: Option<Span>,
    pub keyword: DeclKeyword,
    pub specs: Vec<Spec>,
    pub span: Span,
}

impl GenDecl {
    /// Names declared by this declaration, in source order
    pub fn names(&self) -> impl Iterator<Item = &Ident> {
        self.specs.iter().flat_map(|spec| match spec {
            Spec::Import(_) => Vec::new(),
            Spec::Value(value) => value.names.iter().collect(),
            Spec::Type(ty) => vec![&ty.name],
        })
    }
}

#[derive(Debug, Clone)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

#[derive(Debug, Clone)]
pub struct ImportSpec {
    /// Explicit package name, `.` or `_`
    pub name: Option<Ident>,
    /// Import path without quotes
    pub path: String,
    pub span: Span,
}

impl ImportSpec {
    /// Name the import binds in the file scope, if any
    pub fn local_name(&self) -> Option<&str> {
        match &self.name {
            Some(name) if name.name == "." || name.name == "_" => None,
            Some(name) => Some(&name.name),
            None => Some(assumed_package_name(&self.path)),
        }
    }
}

/// Package name an unaliased import is assumed to bind, following goimports:
/// a trailing major version segment (`/v5`) is skipped, a `go-` prefix is
/// dropped and the name is cut at the first character that cannot appear in
/// an identifier (`yaml.v3` binds `yaml`).
pub fn assumed_package_name(path: &str) -> &str {
    let mut segments = path.rsplit('/');
    let mut base = segments.next().unwrap_or(path);
    let is_major_version = base
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()));
    if is_major_version {
        if let Some(parent) = segments.next() {
            base = parent;
        }
    }
    let base = base.strip_prefix("go-").unwrap_or(base);
    match base.find(|c: char| !(c == '_' || c.is_alphanumeric())) {
        Some(end) => &base[..end],
        None => base,
    }
}

#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub name: Ident,
    pub type_params: Vec<Field>,
    /// `type A = B`
    pub alias: bool,
    pub ty: Expr,
    pub span: Span,
}

/// Parameter, result, struct field or interface element
#[derive(Debug, Clone)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: Expr,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FuncType {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Pos,
    Neg,
    Not,
    Xor,
    Addr,
    Recv,
    Tilde,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    LOr,
    LAnd,
    Eql,
    Neq,
    Lss,
    Leq,
    Gtr,
    Geq,
    Add,
    Sub,
    Or,
    Xor,
    Mul,
    Quo,
    Rem,
    Shl,
    Shr,
    And,
    AndNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Ident(Ident),
    BasicLit { kind: LitKind, span: Span },
    CompositeLit { ty: Option<Box<Expr>>, elts: Vec<Expr>, span: Span },
    FuncLit { ty: FuncType, body: Block },
    Paren(Box<Expr>),
    Selector { x: Box<Expr>, sel: Ident },
    Index { x: Box<Expr>, indices: Vec<Expr> },
    Slice {
        x: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
        max: Option<Box<Expr>>,
    },
    /// `x.(T)`, or `x.(type)` in a type switch when `ty` is `None`
    TypeAssert { x: Box<Expr>, ty: Option<Box<Expr>> },
    Call { fun: Box<Expr>, args: Vec<Expr>, ellipsis: bool },
    Star(Box<Expr>),
    Unary { op: UnaryOp, x: Box<Expr> },
    Binary { op: BinaryOp, x: Box<Expr>, y: Box<Expr> },
    KeyValue { key: Box<Expr>, value: Box<Expr> },

    // Types
    /// `[N]T`, `[...]T` (len is `Ellipsis`) or `[]T` (len is `None`)
    ArrayType { len: Option<Box<Expr>>, elem: Box<Expr> },
    Ellipsis(Option<Box<Expr>>),
    StructType { fields: Vec<Field> },
    FuncType(FuncType),
    InterfaceType { elems: Vec<Field> },
    MapType { key: Box<Expr>, value: Box<Expr> },
    ChanType { dir: ChanDir, value: Box<Expr> },
}

impl Expr {
    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    pub fn as_ident_mut(&mut self) -> Option<&mut Ident> {
        match self {
            Expr::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    /// Unwrap any number of enclosing parentheses
    pub fn unparen(&self) -> &Expr {
        let mut expr = self;
        while let Expr::Paren(inner) = expr {
            expr = inner;
        }
        expr
    }
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `:=`
    Define,
    /// `+=`, `<<=`, ...
    Op(BinaryOp),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

#[derive(Debug, Clone)]
pub struct CaseClause {
    /// Empty for `default`
    pub list: Vec<Expr>,
    pub body: Vec<Stmt>,
    pub is_default: bool,
}

#[derive(Debug, Clone)]
pub struct CommClause {
    /// `None` for `default`
    pub comm: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Decl(GenDecl),
    Labeled { label: Ident, stmt: Box<Stmt> },
    Expr(Expr),
    Send { chan: Expr, value: Expr },
    IncDec { x: Expr, inc: bool },
    Assign { lhs: Vec<Expr>, op: AssignOp, rhs: Vec<Expr> },
    Go(Expr),
    Defer(Expr),
    Return(Vec<Expr>),
    Branch { kind: BranchKind, label: Option<Ident> },
    Block(Block),
    If {
        init: Option<Box<Stmt>>,
        cond: Expr,
        then: Block,
        els: Option<Box<Stmt>>,
    },
    Switch {
        init: Option<Box<Stmt>>,
        tag: Option<Expr>,
        clauses: Vec<CaseClause>,
    },
    /// `assign` is either `x.(type)` or `v := x.(type)`
    TypeSwitch {
        init: Option<Box<Stmt>>,
        assign: Box<Stmt>,
        clauses: Vec<CaseClause>,
    },
    Select { clauses: Vec<CommClause> },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: Block,
    },
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        define: bool,
        x: Expr,
        body: Block,
    },
    Empty,
}
