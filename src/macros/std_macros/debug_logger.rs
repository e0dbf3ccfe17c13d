//! `@DebugLogger` adds a `log(issue:)` method that only prints in debug builds.

use crate::ast::{
    AttributeNode, Builder, DeclNode, FunctionSignature, StringSegment, TypeRef,
};
use crate::macros::extract::class_or_struct;
use crate::macros::{ExpansionError, MacroContext};

pub fn expand(
    attribute: &AttributeNode,
    declaration: &DeclNode,
    _ctx: &MacroContext,
) -> Result<Vec<DeclNode>, ExpansionError> {
    let host = class_or_struct(declaration).map_err(|_| ExpansionError::NotCorrectType)?;
    let b = Builder::at(attribute.span);

    let message = b.interpolated(vec![
        StringSegment::Text(format!("In {} - ", host.name)),
        StringSegment::Interpolation(b.ident("issue")),
    ]);
    let print = b.expr_stmt(b.call(b.ident("print"), vec![message.into()]));
    let signature = FunctionSignature {
        parameters: vec![b.param("issue", None, TypeRef::named("String"))],
        ..Default::default()
    };
    Ok(vec![b.function(
        "log",
        signature,
        vec![b.if_config("DEBUG", vec![print])],
    )])
}
