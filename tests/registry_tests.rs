use zakkro::ast::{Builder, Span};
use zakkro::macros::{
    expand_file, ExpansionRequest, MacroContext, MacroKind, MacroRegistry, MacroRole,
};

mod common;

#[test]
fn standard_names_and_roles() {
    let reg = MacroRegistry::standard();
    let table: Vec<(&str, MacroRole)> = reg
        .entries()
        .into_iter()
        .map(|(name, kind)| (name, kind.role()))
        .collect();
    assert_eq!(
        table,
        vec![
            ("AddAsync", MacroRole::Peer),
            ("DebugLogger", MacroRole::Member),
            ("SlopeSubset", MacroRole::Member),
            ("URL", MacroRole::Expression),
            ("logify", MacroRole::Expression),
            ("stringify", MacroRole::Expression),
        ]
    );
}

#[test]
fn every_macro_is_documented() {
    for kind in MacroKind::ALL {
        assert!(!kind.description().is_empty(), "{:?}", kind);
    }
}

#[test]
fn custom_registry_hides_unregistered_macros() {
    let b = Builder::default();
    let registry = MacroRegistry::from_kinds([MacroKind::Url]);
    let file = common::source_file(vec![b.expr_stmt(common::invoke(
        "stringify",
        vec![b.ident("x").into()],
        Span::default(),
    ))]);
    let outcome = expand_file(file, &registry, &MacroContext::default());
    assert!(outcome.trace.is_empty());
    assert!(outcome.is_success());
}

#[test]
fn aliases_dispatch_to_the_same_expander() {
    let b = Builder::default();
    let mut registry = MacroRegistry::new();
    registry
        .register_or_error("str", MacroKind::Stringify)
        .unwrap();
    let file = common::source_file(vec![b.expr_stmt(common::invoke(
        "str",
        vec![b.ident("x").into()],
        Span::default(),
    ))]);
    let outcome = expand_file(file, &registry, &MacroContext::default());
    assert_eq!(outcome.trace[0].macro_name, "str");
}

#[test]
fn kinds_expand_directly() {
    let b = Builder::default();
    let invocation = zakkro::ast::MacroExpansion::new("logify", vec![b.ident("x").into()]);
    let request = ExpansionRequest::Freestanding {
        invocation: &invocation,
        span: Span::default(),
    };
    assert!(MacroKind::Logify
        .expand(request, &MacroContext::default())
        .is_ok());
}
