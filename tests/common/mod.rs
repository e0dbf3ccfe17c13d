//! Shared fixtures for building host trees in tests.

#![allow(dead_code)]

use zakkro::ast::{
    Argument, Attribute, AttributeNode, Decl, DeclKind, DeclNode, EnumCaseElement, Expr, ExprNode,
    FunctionDecl, FunctionSignature, MacroExpansion, Parameter, SourceFile, Span, Spanned, Stmt,
    StmtNode, TypeDecl, TypeRef,
};
use zakkro::macros::{expand_file, ExpansionOutcome, MacroContext, MacroRegistry};

pub fn invoke(name: &str, arguments: Vec<Argument>, span: Span) -> ExprNode {
    Spanned::new(
        Expr::MacroExpansion(MacroExpansion::new(name, arguments)),
        span,
    )
}

/// A host built-in written without parentheses, such as `#line`.
pub fn builtin(name: &str, span: Span) -> ExprNode {
    Spanned::new(Expr::MacroExpansion(MacroExpansion::bare(name)), span)
}

pub fn attribute(name: &str, span: Span) -> AttributeNode {
    Spanned::new(
        Attribute {
            name: name.to_string(),
            arguments: vec![],
        },
        span,
    )
}

pub fn enum_case(name: &str) -> DeclNode {
    Spanned::new(
        Decl::new(DeclKind::EnumCase(vec![EnumCaseElement {
            name: name.to_string(),
        }])),
        Span::default(),
    )
}

fn type_decl(name: &str, members: Vec<DeclNode>) -> TypeDecl {
    TypeDecl {
        name: name.to_string(),
        inherits: vec![],
        members,
    }
}

pub fn enum_decl(name: &str, cases: &[&str], attributes: Vec<AttributeNode>) -> DeclNode {
    let members = cases.iter().map(|case| enum_case(case)).collect();
    with_attributes(DeclKind::Enum(type_decl(name, members)), attributes)
}

pub fn struct_decl(name: &str, attributes: Vec<AttributeNode>) -> DeclNode {
    with_attributes(DeclKind::Struct(type_decl(name, vec![])), attributes)
}

pub fn class_decl(name: &str, attributes: Vec<AttributeNode>) -> DeclNode {
    with_attributes(DeclKind::Class(type_decl(name, vec![])), attributes)
}

pub fn func_decl(name: &str, parameters: Vec<Parameter>, attributes: Vec<AttributeNode>) -> DeclNode {
    with_attributes(
        DeclKind::Function(FunctionDecl {
            name: name.to_string(),
            signature: FunctionSignature {
                parameters,
                ..Default::default()
            },
            body: Some(vec![]),
        }),
        attributes,
    )
}

/// `(T) -> Void`
pub fn callback(argument: TypeRef) -> TypeRef {
    TypeRef::Function {
        params: vec![argument],
        ret: Box::new(TypeRef::named("Void")),
    }
}

fn with_attributes(kind: DeclKind, attributes: Vec<AttributeNode>) -> DeclNode {
    let mut decl = Decl::new(kind);
    decl.attributes = attributes;
    Spanned::new(decl, Span::default())
}

pub fn decl_stmt(decl: DeclNode) -> StmtNode {
    let span = decl.span;
    Spanned::new(Stmt::Decl(decl), span)
}

pub fn source_file(items: Vec<StmtNode>) -> SourceFile {
    SourceFile {
        name: "main.swift".to_string(),
        items,
    }
}

pub fn expand(items: Vec<StmtNode>) -> ExpansionOutcome {
    expand_with(items, &MacroContext::new("main.swift"))
}

pub fn expand_with(items: Vec<StmtNode>, ctx: &MacroContext) -> ExpansionOutcome {
    expand_file(source_file(items), MacroRegistry::standard(), ctx)
}
