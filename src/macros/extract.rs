//! Matchers that pull structural pieces out of fragments.
//!
//! Each matcher either returns a borrowed view of the piece it looks for or a
//! `ShapeMismatch` naming what it expected and what it found. Expanders map a
//! mismatch onto their own `ExpansionError`.

use std::fmt;

use thiserror::Error;

use crate::ast::printer::print_expr;
use crate::ast::{
    ArgumentList, DeclKind, DeclNode, Expr, ExprNode, Fragment, FunctionDecl, FunctionSignature,
    Parameter, StringSegment, TypeDecl, TypeRef,
};
use crate::macros::MacroContext;

/// The piece a matcher was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Argument,
    StringLiteral,
    StaticStringSegment,
    EnumDeclaration,
    FunctionDeclaration,
    ClassOrStructDeclaration,
    CompletionParameter,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct ShapeMismatch {
    pub expected: Shape,
    pub found: String,
}

/// All pieces of a signature ending in a one-argument callback.
#[derive(Debug, Clone, Copy)]
pub struct Completion<'a> {
    /// Parameters before the callback.
    pub leading: &'a [Parameter],
    pub callback: &'a Parameter,
    /// Type of the single value the callback receives.
    pub result_type: &'a TypeRef,
}

fn mismatch(expected: Shape, found: impl fmt::Display) -> ShapeMismatch {
    ShapeMismatch {
        expected,
        found: found.to_string(),
    }
}

/// First argument expression, whatever its label.
pub fn first_argument(arguments: &ArgumentList) -> Result<&ExprNode, ShapeMismatch> {
    arguments
        .first()
        .map(|argument| &argument.expr)
        .ok_or_else(|| mismatch(Shape::Argument, "an empty argument list"))
}

/// Text of a string literal made of exactly one plain segment.
pub fn static_string_literal(expr: &ExprNode) -> Result<&str, ShapeMismatch> {
    let Expr::String(literal) = &expr.value else {
        return Err(mismatch(Shape::StringLiteral, Fragment::from(expr).kind()));
    };
    if let Some(text) = literal.static_text() {
        return Ok(text);
    }
    match literal.segments.as_slice() {
        [StringSegment::Interpolation(_)] => {
            Err(mismatch(Shape::StaticStringSegment, "an interpolated segment"))
        }
        segments => Err(mismatch(
            Shape::StaticStringSegment,
            format!("{} segments", segments.len()),
        )),
    }
}

pub fn enum_decl(decl: &DeclNode) -> Result<&TypeDecl, ShapeMismatch> {
    match &decl.value.kind {
        DeclKind::Enum(t) => Ok(t),
        _ => Err(mismatch(Shape::EnumDeclaration, Fragment::from(decl).kind())),
    }
}

pub fn function_decl(decl: &DeclNode) -> Result<&FunctionDecl, ShapeMismatch> {
    match &decl.value.kind {
        DeclKind::Function(f) => Ok(f),
        _ => Err(mismatch(
            Shape::FunctionDeclaration,
            Fragment::from(decl).kind(),
        )),
    }
}

pub fn class_or_struct(decl: &DeclNode) -> Result<&TypeDecl, ShapeMismatch> {
    match &decl.value.kind {
        DeclKind::Class(t) | DeclKind::Struct(t) => Ok(t),
        _ => Err(mismatch(
            Shape::ClassOrStructDeclaration,
            Fragment::from(decl).kind(),
        )),
    }
}

/// Case names of an enum in declaration order, flattening `case a, b`.
pub fn enum_case_names(decl: &TypeDecl) -> Vec<&str> {
    decl.members
        .iter()
        .filter_map(|member| match &member.value.kind {
            DeclKind::EnumCase(elements) => Some(elements),
            _ => None,
        })
        .flatten()
        .map(|element| element.name.as_str())
        .collect()
}

/// Splits off a trailing `(T) -> Void` callback parameter.
pub fn completion_callback(signature: &FunctionSignature) -> Result<Completion<'_>, ShapeMismatch> {
    let Some((callback, leading)) = signature.parameters.split_last() else {
        return Err(mismatch(Shape::CompletionParameter, "no parameters"));
    };
    match &callback.ty {
        TypeRef::Function { params, ret } if ret.is_void() => match params.as_slice() {
            [result_type] => Ok(Completion {
                leading,
                callback,
                result_type,
            }),
            _ => Err(mismatch(
                Shape::CompletionParameter,
                format!("a callback taking {} values", params.len()),
            )),
        },
        other => Err(mismatch(Shape::CompletionParameter, format!("`{other}`"))),
    }
}

/// Source text of `expr`: verbatim from the host source when its span is
/// known, otherwise printed from the tree.
pub fn source_text(expr: &ExprNode, ctx: &MacroContext) -> String {
    ctx.source_text(expr.span)
        .map(str::to_string)
        .unwrap_or_else(|| print_expr(&expr.value))
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Shape::Argument => "an argument",
            Shape::StringLiteral => "a string literal",
            Shape::StaticStringSegment => "a single static string segment",
            Shape::EnumDeclaration => "an enum declaration",
            Shape::FunctionDeclaration => "a function declaration",
            Shape::ClassOrStructDeclaration => "a class or struct declaration",
            Shape::CompletionParameter => "a trailing one-argument callback",
        };
        f.write_str(text)
    }
}
