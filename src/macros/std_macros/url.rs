//! `#URL("...")` validates a static string literal as a URL during expansion
//! and expands to `URL(string: "...")!`.

use url::Url;

use crate::ast::{Argument, Builder, ExprNode, MacroExpansion, Span};
use crate::macros::extract::{first_argument, source_text, static_string_literal};
use crate::macros::{ExpansionError, MacroContext};

pub fn expand(
    invocation: &MacroExpansion,
    span: Span,
    ctx: &MacroContext,
) -> Result<ExprNode, ExpansionError> {
    let literal = first_argument(&invocation.arguments)
        .map_err(|_| ExpansionError::RequiresStaticStringLiteral)?;
    let text =
        static_string_literal(literal).map_err(|_| ExpansionError::RequiresStaticStringLiteral)?;

    if Url::parse(text).is_err() {
        return Err(ExpansionError::MalformedUrl(source_text(literal, ctx)));
    }

    let b = Builder::at(span);
    let construct = b.call(
        b.ident("URL"),
        vec![Argument::labeled("string", literal.clone())],
    );
    Ok(b.force_unwrap(construct))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::printer::print_expr;
    use crate::ast::StringSegment;

    fn url_macro(argument: ExprNode) -> Result<ExprNode, ExpansionError> {
        let invocation = MacroExpansion::new("URL", vec![argument.into()]);
        expand(&invocation, Span::default(), &MacroContext::default())
    }

    #[test]
    fn accepts_absolute_url() {
        let b = Builder::default();
        let out = url_macro(b.string_literal("https://www.avanderlee.com")).unwrap();
        assert_eq!(
            print_expr(&out.value),
            r#"URL(string: "https://www.avanderlee.com")!"#
        );
    }

    #[test]
    fn rejects_empty_and_relative_strings() {
        let b = Builder::default();
        assert_eq!(
            url_macro(b.string_literal("")).unwrap_err(),
            ExpansionError::MalformedUrl(r#""""#.into())
        );
        assert_eq!(
            url_macro(b.string_literal("not a url")).unwrap_err(),
            ExpansionError::MalformedUrl(r#""not a url""#.into())
        );
    }

    #[test]
    fn rejects_interpolation() {
        let b = Builder::default();
        let lit = b.interpolated(vec![StringSegment::Interpolation(b.ident("host"))]);
        assert_eq!(
            url_macro(lit).unwrap_err(),
            ExpansionError::RequiresStaticStringLiteral
        );
    }

    #[test]
    fn rejects_missing_argument_and_non_literals() {
        let b = Builder::default();
        assert_eq!(
            url_macro(b.ident("address")).unwrap_err(),
            ExpansionError::RequiresStaticStringLiteral
        );
        let empty = MacroExpansion::new("URL", vec![]);
        assert_eq!(
            expand(&empty, Span::default(), &MacroContext::default()).unwrap_err(),
            ExpansionError::RequiresStaticStringLiteral
        );
    }
}
