//! `@AddAsync` adds an `async` peer of a callback-taking function.
//!
//! ```text
//! func test(arg1: String, completion: (String) -> Void)
//! ```
//! gains
//! ```text
//! func test(arg1: String) async -> String {
//!     await withCheckedContinuation { continuation in
//!         self.test(arg1: arg1) { object in
//!             continuation.resume(returning: object)
//!         }
//!     }
//! }
//! ```
//! The peer resumes once per callback invocation; a callback that never fires
//! leaves the caller suspended.

use tracing::debug;

use crate::ast::{
    Argument, AttributeNode, Builder, DeclNode, Effects, FunctionSignature, Parameter,
};
use crate::macros::extract::{completion_callback, function_decl};
use crate::macros::{ExpansionError, MacroContext};

pub fn expand(
    attribute: &AttributeNode,
    declaration: &DeclNode,
    _ctx: &MacroContext,
) -> Result<Vec<DeclNode>, ExpansionError> {
    let function = function_decl(declaration).map_err(|_| ExpansionError::OnlyFunction)?;
    let completion = match completion_callback(&function.signature) {
        Ok(completion) => completion,
        Err(mismatch) => {
            debug!(function = %function.name, %mismatch, "no completion handler, nothing to add");
            return Ok(Vec::new());
        }
    };
    debug!(
        function = %function.name,
        callback = completion.callback.name(),
        "adding async peer"
    );
    let b = Builder::at(attribute.span);

    let resume = b.call(
        b.member(b.ident("continuation"), "resume"),
        vec![Argument::labeled("returning", b.ident("object"))],
    );
    let original_call = b.call_with_closure(
        b.member(b.ident("self"), &function.name),
        forwarded_arguments(&b, completion.leading),
        b.closure(&["object"], vec![b.expr_stmt(resume)]),
    );
    let suspend = b.call_with_closure(
        b.ident("withCheckedContinuation"),
        vec![],
        b.closure(&["continuation"], vec![b.expr_stmt(original_call)]),
    );

    let signature = FunctionSignature {
        parameters: completion.leading.to_vec(),
        effects: Effects {
            is_async: true,
            throws: false,
        },
        return_type: Some(completion.result_type.clone()),
    };
    let mut peer = b.function(
        &function.name,
        signature,
        vec![b.expr_stmt(b.await_expr(suspend))],
    );
    peer.value.modifiers = declaration.value.modifiers.clone();
    Ok(vec![peer])
}

/// `label: name` for every parameter, unlabeled where the label is `_`.
fn forwarded_arguments(b: &Builder, parameters: &[Parameter]) -> Vec<Argument> {
    parameters
        .iter()
        .map(|p| Argument {
            label: p.label().map(str::to_string),
            expr: b.ident(p.name()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::printer::print_expr;
    use crate::ast::{Attribute, Decl, DeclKind, FunctionDecl, Spanned, Span, TypeRef};

    fn attribute() -> AttributeNode {
        Spanned::new(
            Attribute {
                name: "AddAsync".into(),
                arguments: vec![],
            },
            Span::default(),
        )
    }

    fn function(parameters: Vec<Parameter>) -> DeclNode {
        Spanned::new(
            Decl::new(DeclKind::Function(FunctionDecl {
                name: "fetch".into(),
                signature: FunctionSignature {
                    parameters,
                    ..Default::default()
                },
                body: Some(vec![]),
            })),
            Span::default(),
        )
    }

    #[test]
    fn unlabeled_parameters_forward_positionally() {
        let b = Builder::default();
        let params = vec![
            b.param("_", Some("id"), TypeRef::named("Int")),
            b.param("from", Some("source"), TypeRef::named("String")),
        ];
        let args = forwarded_arguments(&b, &params);
        assert_eq!(args[0].label, None);
        assert_eq!(print_expr(&args[0].expr.value), "id");
        assert_eq!(args[1].label.as_deref(), Some("from"));
        assert_eq!(print_expr(&args[1].expr.value), "source");
    }

    #[test]
    fn without_callback_nothing_is_generated() {
        let b = Builder::default();
        let decl = function(vec![b.param("id", None, TypeRef::named("Int"))]);
        let peers = expand(&attribute(), &decl, &MacroContext::default()).unwrap();
        assert!(peers.is_empty());
    }

    #[test]
    fn callback_returning_value_is_not_a_completion() {
        let b = Builder::default();
        let decl = function(vec![b.param(
            "transform",
            None,
            TypeRef::Function {
                params: vec![TypeRef::named("Int")],
                ret: Box::new(TypeRef::named("Int")),
            },
        )]);
        let peers = expand(&attribute(), &decl, &MacroContext::default()).unwrap();
        assert!(peers.is_empty());
    }
}
