//! `@SlopeSubset` adds `init?(_ slope: Slope)` to an enum whose cases are a
//! subset of `Slope`.
//!
//! Subset cases are trusted to exist in the reference enum. When the host
//! supplies the reference case names through the context, subset cases
//! missing from it are left out of the generated switch and fall through to
//! `default`.

use tracing::debug;

use crate::ast::{AttributeNode, Builder, DeclNode, TypeRef};
use crate::macros::extract::{enum_case_names, enum_decl};
use crate::macros::{ExpansionError, MacroContext};

pub fn expand(
    attribute: &AttributeNode,
    declaration: &DeclNode,
    ctx: &MacroContext,
) -> Result<Vec<DeclNode>, ExpansionError> {
    let subset = enum_decl(declaration).map_err(|_| ExpansionError::OnlyApplicableToEnum)?;
    let b = Builder::at(attribute.span);

    let mut cases = Vec::new();
    for name in enum_case_names(subset) {
        if let Some(reference) = ctx.reference_cases() {
            if !reference.iter().any(|case| case == name) {
                debug!(
                    case = name,
                    reference = ctx.reference_enum(),
                    "subset case not found in reference enum"
                );
                continue;
            }
        }
        cases.push(b.case(
            vec![b.implicit_member(name)],
            vec![b.assign(b.ident("self"), b.implicit_member(name))],
        ));
    }
    cases.push(b.default_case(vec![b.ret(Some(b.nil()))]));

    let slope = b.param("_", Some("slope"), TypeRef::named(ctx.reference_enum()));
    let body = vec![b.switch(b.ident("slope"), cases)];
    Ok(vec![b.initializer(true, vec![slope], body)])
}
