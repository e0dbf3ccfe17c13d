//! Expansion results for every macro, checked against printed source.

mod common;

use common::*;
use zakkro::ast::printer::print_file;
use zakkro::ast::{Builder, Span, StringSegment, TypeRef};
use zakkro::macros::{MacroContext, MacroRole};

#[test]
fn stringify_pairs_value_with_source() {
    let b = Builder::default();
    let source = "#stringify(a + b)";
    let sum = Builder::at(Span::new(11, 16)).binary(b.ident("a"), "+", b.ident("b"));
    let ctx = MacroContext::new("main.swift").with_source(source);
    let outcome = expand_with(
        vec![b.expr_stmt(invoke("stringify", vec![sum.into()], Span::new(0, 17)))],
        &ctx,
    );
    assert!(outcome.is_success());
    assert_eq!(print_file(&outcome.file), r#"(a + b, "a + b")"#);
}

#[test]
fn stringify_keeps_string_literal_source_in_a_raw_literal() {
    let b = Builder::default();
    let greeting = b.interpolated(vec![
        StringSegment::Text("Hello, ".into()),
        StringSegment::Interpolation(b.ident("name")),
    ]);
    let outcome = expand(vec![b.expr_stmt(invoke(
        "stringify",
        vec![greeting.into()],
        Span::default(),
    ))]);
    assert_eq!(
        print_file(&outcome.file),
        r###"("Hello, \(name)", #""Hello, \(name)""#)"###
    );
}

#[test]
fn slope_subset_generates_failable_initializer() {
    let decl = enum_decl(
        "EasySlope",
        &["beginnersParadise", "practiceRun"],
        vec![attribute("SlopeSubset", Span::default())],
    );
    let outcome = expand(vec![decl_stmt(decl)]);
    assert!(outcome.is_success());
    let expected = "\
enum EasySlope {
    case beginnersParadise
    case practiceRun

    init?(_ slope: Slope) {
        switch slope {
        case .beginnersParadise:
            self = .beginnersParadise
        case .practiceRun:
            self = .practiceRun
        default:
            return nil
        }
    }
}";
    assert_eq!(print_file(&outcome.file), expected);
}

#[test]
fn slope_subset_on_empty_enum_only_has_default() {
    let decl = enum_decl("NoSlope", &[], vec![attribute("SlopeSubset", Span::default())]);
    let outcome = expand(vec![decl_stmt(decl)]);
    let expected = "\
enum NoSlope {
    init?(_ slope: Slope) {
        switch slope {
        default:
            return nil
        }
    }
}";
    assert_eq!(print_file(&outcome.file), expected);
}

#[test]
fn slope_subset_uses_configured_reference_enum() {
    let decl = enum_decl("Easy", &["green"], vec![attribute("SlopeSubset", Span::default())]);
    let ctx = MacroContext::new("main.swift").with_reference_enum("Piste");
    let outcome = expand_with(vec![decl_stmt(decl)], &ctx);
    assert!(print_file(&outcome.file).contains("init?(_ slope: Piste) {"));
}

/// Without reference cases the subset is trusted as written, so a case that
/// `Slope` lacks still gets a switch arm the host compiler will reject.
#[test]
fn slope_subset_trusts_unknown_cases_without_reference() {
    let decl = enum_decl(
        "EasySlope",
        &["beginnersParadise", "bunnyHill"],
        vec![attribute("SlopeSubset", Span::default())],
    );
    let outcome = expand(vec![decl_stmt(decl)]);
    assert!(outcome.is_success());
    assert!(print_file(&outcome.file).contains("case .bunnyHill:"));
}

#[test]
fn slope_subset_skips_cases_missing_from_reference() {
    let decl = enum_decl(
        "EasySlope",
        &["beginnersParadise", "bunnyHill"],
        vec![attribute("SlopeSubset", Span::default())],
    );
    let ctx = MacroContext::new("main.swift").with_reference_cases([
        "beginnersParadise",
        "practiceRun",
        "olympicRun",
    ]);
    let outcome = expand_with(vec![decl_stmt(decl)], &ctx);
    let printed = print_file(&outcome.file);
    assert!(outcome.is_success());
    assert!(printed.contains("case .beginnersParadise:"));
    assert!(!printed.contains("case .bunnyHill:"));
    // The enum itself is untouched.
    assert!(printed.contains("    case bunnyHill\n"));
}

#[test]
fn url_expands_to_force_unwrapped_initializer() {
    let b = Builder::default();
    let literal = b.string_literal("https://www.avanderlee.com");
    let outcome = expand(vec![b.expr_stmt(invoke("URL", vec![literal.into()], Span::default()))]);
    assert!(outcome.is_success());
    assert_eq!(
        print_file(&outcome.file),
        r#"URL(string: "https://www.avanderlee.com")!"#
    );
}

#[test]
fn add_async_adds_continuation_wrapper_as_peer() {
    let b = Builder::default();
    let decl = func_decl(
        "test",
        vec![
            b.param("arg1", None, TypeRef::named("String")),
            b.param(
                "completion",
                None,
                callback(TypeRef::Optional(Box::new(TypeRef::named("String")))),
            ),
        ],
        vec![attribute("AddAsync", Span::default())],
    );
    let outcome = expand(vec![decl_stmt(decl)]);
    assert!(outcome.is_success());
    let expected = "\
func test(arg1: String, completion: (String?) -> Void) {
}

func test(arg1: String) async -> String? {
    await withCheckedContinuation { continuation in
        self.test(arg1: arg1) { object in
            continuation.resume(returning: object)
        }
    }
}";
    assert_eq!(print_file(&outcome.file), expected);
    assert_eq!(outcome.trace[0].role, MacroRole::Peer);
}

#[test]
fn add_async_peer_inside_a_class_follows_its_function() {
    let b = Builder::default();
    let fetch = func_decl(
        "fetch",
        vec![b.param("completion", None, callback(TypeRef::named("Int")))],
        vec![attribute("AddAsync", Span::default())],
    );
    let other = func_decl("reset", vec![], vec![]);
    let mut client = class_decl("Client", vec![]);
    if let zakkro::ast::DeclKind::Class(ty) = &mut client.value.kind {
        ty.members = vec![fetch, other];
    }
    let outcome = expand(vec![decl_stmt(client)]);
    let printed = print_file(&outcome.file);
    let sync = printed.find("func fetch(completion: (Int) -> Void)").unwrap();
    let peer = printed.find("func fetch() async -> Int").unwrap();
    let reset = printed.find("func reset()").unwrap();
    assert!(sync < peer && peer < reset);
}

#[test]
fn logify_produces_logging_literal() {
    let b = Builder::default();
    let outcome = expand(vec![b.expr_stmt(invoke(
        "logify",
        vec![b.ident("value").into()],
        Span::default(),
    ))]);
    assert_eq!(
        print_file(&outcome.file),
        r##"#"logger.debug("\(value)")"#"##
    );
}

#[test]
fn debug_logger_adds_log_method() {
    let decl = class_decl("Foo", vec![attribute("DebugLogger", Span::default())]);
    let outcome = expand(vec![decl_stmt(decl)]);
    assert!(outcome.is_success());
    let expected = "\
class Foo {
    func log(issue: String) {
        #if DEBUG
        print(\"In Foo - \\(issue)\")
        #endif
    }
}";
    assert_eq!(print_file(&outcome.file), expected);
}

#[test]
fn debug_logger_on_struct_adds_log_method() {
    let decl = struct_decl("Ski", vec![attribute("DebugLogger", Span::default())]);
    let outcome = expand(vec![decl_stmt(decl)]);
    assert!(outcome.is_success());
    let expected = "\
struct Ski {
    func log(issue: String) {
        #if DEBUG
        print(\"In Ski - \\(issue)\")
        #endif
    }
}";
    assert_eq!(print_file(&outcome.file), expected);
}

#[test]
fn host_builtins_pass_through_untouched() {
    let b = Builder::default();
    let line = builtin("line", Span::default());
    let outcome = expand(vec![b.expr_stmt(invoke(
        "stringify",
        vec![line.into()],
        Span::default(),
    ))]);
    assert!(outcome.is_success());
    assert_eq!(print_file(&outcome.file), r##"(#line, "#line")"##);
}

#[test]
fn trace_records_each_invocation() {
    let b = Builder::default();
    let literal = b.string_literal("https://example.com");
    let outcome = expand(vec![
        b.expr_stmt(invoke("URL", vec![literal.into()], Span::default())),
        decl_stmt(class_decl("Foo", vec![attribute("DebugLogger", Span::default())])),
    ]);
    let names: Vec<&str> = outcome.trace.iter().map(|s| s.macro_name.as_str()).collect();
    assert_eq!(names, vec!["URL", "DebugLogger"]);
    assert_eq!(outcome.trace[0].input, r#"#URL("https://example.com")"#);
    assert_eq!(outcome.trace[0].output, r#"URL(string: "https://example.com")!"#);
    assert!(outcome.trace[1].input.starts_with("@DebugLogger\nclass Foo {"));
}
