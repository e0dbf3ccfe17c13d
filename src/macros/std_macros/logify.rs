//! `#logify(E)` expands to a string literal holding `logger.debug("\(E)")`.

use crate::ast::{Builder, ExprNode, MacroExpansion, Span};
use crate::macros::extract::{first_argument, source_text};
use crate::macros::{ExpansionError, MacroContext};

pub fn expand(
    invocation: &MacroExpansion,
    span: Span,
    ctx: &MacroContext,
) -> Result<ExprNode, ExpansionError> {
    let argument =
        first_argument(&invocation.arguments).map_err(|_| ExpansionError::MissingArgument)?;
    let call = format!("logger.debug(\"\\({})\")", source_text(argument, ctx));
    Ok(Builder::at(span).string_literal(&call))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::printer::print_expr;

    #[test]
    fn embeds_the_expression() {
        let b = Builder::default();
        let invocation = MacroExpansion::new("logify", vec![b.ident("s").into()]);
        let out = expand(&invocation, Span::default(), &MacroContext::default()).unwrap();
        assert_eq!(print_expr(&out.value), r##"#"logger.debug("\(s)")"#"##);
    }
}
