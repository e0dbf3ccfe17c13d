//! AST module for the zakkro macro engine
//!
//! This module provides the syntax tree types handed to expanders by the host
//! and produced by them in return. Every node carries a source span so that
//! diagnostics can point back at the invocation site.
//!
//! **INVARIANT:** Expanders only ever see `&` references to these types. A
//! replacement is always a freshly built tree; input trees are never mutated.

// ============================================================================
// IMPORTS
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// A byte range in the host source text.
///
/// # Examples
///
/// ```rust
/// use zakkro::ast::Span;
/// let span = Span::new(0, 5);
/// assert_eq!(span.len(), 5);
/// assert_eq!(span.line_col("hello\nworld"), Some((1, 1)));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Wrapper for carrying source span information with any value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

pub type ExprNode = Spanned<Expr>;
pub type StmtNode = Spanned<Stmt>;
pub type DeclNode = Spanned<Decl>;
pub type AttributeNode = Spanned<Attribute>;

/// Ordered `(label, expression)` pairs in source order. Labels may repeat.
pub type ArgumentList = Vec<Argument>;

/// Expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Identifier(String),
    /// Integer literal, kept as written.
    Integer(String),
    Nil,
    String(StringLiteral),
    Binary {
        lhs: Box<ExprNode>,
        op: String,
        rhs: Box<ExprNode>,
    },
    Tuple(ArgumentList),
    Call(CallExpr),
    /// `base.name`, or `.name` when `base` is absent.
    Member {
        base: Option<Box<ExprNode>>,
        name: String,
    },
    ForceUnwrap(Box<ExprNode>),
    Await(Box<ExprNode>),
    Closure(ClosureExpr),
    /// Freestanding macro invocation: `#name(arguments)`.
    MacroExpansion(MacroExpansion),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub label: Option<String>,
    pub expr: ExprNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub callee: Box<ExprNode>,
    pub arguments: ArgumentList,
    #[serde(default)]
    pub trailing_closure: Option<ClosureExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosureExpr {
    #[serde(default)]
    pub params: Vec<String>,
    pub body: Vec<StmtNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroExpansion {
    pub name: String,
    #[serde(default)]
    pub arguments: ArgumentList,
    /// Written without an argument clause, as in `#line`.
    #[serde(default)]
    pub bare: bool,
}

/// A string literal. `raw_pounds` is the number of `#` around a raw literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringLiteral {
    #[serde(default)]
    pub raw_pounds: usize,
    pub segments: Vec<StringSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StringSegment {
    Text(String),
    Interpolation(ExprNode),
}

/// Statements, including nested declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Expr(ExprNode),
    /// `let name = value` or `let (a, b) = value`.
    Let {
        names: Vec<String>,
        value: ExprNode,
    },
    Assign {
        target: ExprNode,
        value: ExprNode,
    },
    Return(Option<ExprNode>),
    Switch(SwitchStmt),
    /// `#if condition ... #endif`
    IfConfig {
        condition: String,
        body: Vec<StmtNode>,
    },
    Decl(DeclNode),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchStmt {
    pub subject: ExprNode,
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub label: CaseLabel,
    pub body: Vec<StmtNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CaseLabel {
    Patterns(Vec<ExprNode>),
    Default,
}

/// A declaration with its attributes and modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decl {
    #[serde(default)]
    pub attributes: Vec<AttributeNode>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub kind: DeclKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeclKind {
    Enum(TypeDecl),
    Struct(TypeDecl),
    Class(TypeDecl),
    Function(FunctionDecl),
    Initializer(InitializerDecl),
    EnumCase(Vec<EnumCaseElement>),
}

/// Shared shape of `enum`, `struct` and `class` declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub inherits: Vec<String>,
    #[serde(default)]
    pub members: Vec<DeclNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub signature: FunctionSignature,
    /// `None` for a body-less requirement.
    pub body: Option<Vec<StmtNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FunctionSignature {
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub effects: Effects,
    #[serde(default)]
    pub return_type: Option<TypeRef>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Effects {
    pub is_async: bool,
    pub throws: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializerDecl {
    pub failable: bool,
    pub parameters: Vec<Parameter>,
    pub body: Vec<StmtNode>,
}

/// A function parameter: `first_name second_name: Type`.
///
/// The first name is the argument label (`_` for none); the second name, when
/// present, is the local name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub first_name: String,
    #[serde(default)]
    pub second_name: Option<String>,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumCaseElement {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRef {
    Named(String),
    Optional(Box<TypeRef>),
    Function {
        params: Vec<TypeRef>,
        ret: Box<TypeRef>,
    },
    Tuple(Vec<TypeRef>),
}

/// `@name` or `@name(arguments)` attached to a declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub arguments: ArgumentList,
}

/// A whole unit handed over by the host: top-level statements in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub items: Vec<StmtNode>,
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text covered by this span, if it lies inside `source` on char boundaries.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        if self.end < self.start {
            return None;
        }
        source.get(self.start..self.end)
    }

    /// 1-based line and column of the span start.
    pub fn line_col(&self, source: &str) -> Option<(usize, usize)> {
        let before = source.get(..self.start)?;
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Some((line, column))
    }
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }
}

impl Argument {
    pub fn positional(expr: ExprNode) -> Self {
        Self { label: None, expr }
    }

    pub fn labeled(label: impl Into<String>, expr: ExprNode) -> Self {
        Self {
            label: Some(label.into()),
            expr,
        }
    }
}

impl MacroExpansion {
    /// `#name(arguments)`
    pub fn new(name: impl Into<String>, arguments: ArgumentList) -> Self {
        Self {
            name: name.into(),
            arguments,
            bare: false,
        }
    }

    /// `#name` with no parentheses.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            bare: true,
        }
    }
}

impl StringLiteral {
    /// Returns the text when the literal is a single plain text segment.
    pub fn static_text(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [StringSegment::Text(text)] => Some(text),
            _ => None,
        }
    }
}

impl Decl {
    pub fn new(kind: DeclKind) -> Self {
        Self {
            attributes: Vec::new(),
            modifiers: Vec::new(),
            kind,
        }
    }

    pub fn is_enum_case(&self) -> bool {
        matches!(self.kind, DeclKind::EnumCase(_))
    }
}

impl Parameter {
    /// Argument label used at call sites, `None` for `_`.
    pub fn label(&self) -> Option<&str> {
        match self.first_name.as_str() {
            "_" => None,
            label => Some(label),
        }
    }

    /// Name the parameter is bound to inside the function body.
    pub fn name(&self) -> &str {
        self.second_name.as_deref().unwrap_or(&self.first_name)
    }
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn is_void(&self) -> bool {
        match self {
            TypeRef::Named(name) => name == "Void",
            TypeRef::Tuple(items) => items.is_empty(),
            _ => false,
        }
    }
}

// ============================================================================
// MODULE EXPORTS
// ============================================================================

pub mod builder;
pub mod fragment;
pub mod printer;

pub use builder::Builder;
pub use fragment::{Fragment, FragmentKind};
pub use printer::{PrintOptions, Printer};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_counts_from_one() {
        let source = "let a = 1\n#stringify(a)";
        let span = Span::new(10, 23);
        assert_eq!(span.line_col(source), Some((2, 1)));
        assert_eq!(span.slice(source), Some("#stringify(a)"));
    }

    #[test]
    fn line_col_out_of_range() {
        assert_eq!(Span::new(40, 41).line_col("short"), None);
        assert_eq!(Span::new(3, 1).slice("short"), None);
    }

    #[test]
    fn parameter_label_and_name() {
        let p = Parameter {
            first_name: "_".into(),
            second_name: Some("slope".into()),
            ty: TypeRef::named("Slope"),
        };
        assert_eq!(p.label(), None);
        assert_eq!(p.name(), "slope");

        let q = Parameter {
            first_name: "arg1".into(),
            second_name: None,
            ty: TypeRef::named("String"),
        };
        assert_eq!(q.label(), Some("arg1"));
        assert_eq!(q.name(), "arg1");
    }

    #[test]
    fn void_types() {
        assert!(TypeRef::named("Void").is_void());
        assert!(TypeRef::Tuple(vec![]).is_void());
        assert!(!TypeRef::named("String").is_void());
    }
}
