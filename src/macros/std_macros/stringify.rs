//! `#stringify(E)` expands to `(E, "<source of E>")`.

use crate::ast::{Argument, Builder, ExprNode, MacroExpansion, Span};
use crate::macros::extract::{first_argument, source_text};
use crate::macros::{ExpansionError, MacroContext};

pub fn expand(
    invocation: &MacroExpansion,
    span: Span,
    ctx: &MacroContext,
) -> Result<ExprNode, ExpansionError> {
    let argument =
        first_argument(&invocation.arguments).map_err(|_| ExpansionError::MissingArgument)?;
    let b = Builder::at(span);
    let text = source_text(argument, ctx);
    Ok(b.tuple(vec![
        Argument::positional(argument.clone()),
        Argument::positional(b.string_literal(&text)),
    ]))
}
