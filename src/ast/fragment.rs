//! Borrowed views over the nodes an expander may be handed.

use std::fmt;

use serde::Serialize;

use super::{AttributeNode, DeclKind, DeclNode, ExprNode, Span};

/// A fragment of host syntax, borrowed for the duration of one expansion call.
#[derive(Debug, Clone, Copy)]
pub enum Fragment<'a> {
    Expression(&'a ExprNode),
    Declaration(&'a DeclNode),
    Attribute(&'a AttributeNode),
}

/// Shape tag of a fragment, used in diagnostics and shape checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FragmentKind {
    Expression,
    Declaration,
    EnumDeclaration,
    FunctionDeclaration,
    ClassOrStructDeclaration,
    Attribute,
}

impl<'a> Fragment<'a> {
    pub fn kind(&self) -> FragmentKind {
        match self {
            Fragment::Expression(_) => FragmentKind::Expression,
            Fragment::Attribute(_) => FragmentKind::Attribute,
            Fragment::Declaration(decl) => match decl.value.kind {
                DeclKind::Enum(_) => FragmentKind::EnumDeclaration,
                DeclKind::Function(_) => FragmentKind::FunctionDeclaration,
                DeclKind::Struct(_) | DeclKind::Class(_) => FragmentKind::ClassOrStructDeclaration,
                DeclKind::Initializer(_) | DeclKind::EnumCase(_) => FragmentKind::Declaration,
            },
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Fragment::Expression(e) => e.span,
            Fragment::Declaration(d) => d.span,
            Fragment::Attribute(a) => a.span,
        }
    }
}

impl<'a> From<&'a ExprNode> for Fragment<'a> {
    fn from(node: &'a ExprNode) -> Self {
        Fragment::Expression(node)
    }
}

impl<'a> From<&'a DeclNode> for Fragment<'a> {
    fn from(node: &'a DeclNode) -> Self {
        Fragment::Declaration(node)
    }
}

impl<'a> From<&'a AttributeNode> for Fragment<'a> {
    fn from(node: &'a AttributeNode) -> Self {
        Fragment::Attribute(node)
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FragmentKind::Expression => "expression",
            FragmentKind::Declaration => "declaration",
            FragmentKind::EnumDeclaration => "enum declaration",
            FragmentKind::FunctionDeclaration => "function declaration",
            FragmentKind::ClassOrStructDeclaration => "class or struct declaration",
            FragmentKind::Attribute => "attribute",
        };
        f.write_str(text)
    }
}
