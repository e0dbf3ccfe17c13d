//! Source printer: renders syntax trees back to Swift-like text.
//!
//! Output is deterministic. Blocks are indented by [`PrintOptions::indent`]
//! spaces, top-level items are separated by a blank line, and inside a member
//! block a blank line precedes every member except consecutive enum cases.

use std::fmt;

use super::{
    Argument, AttributeNode, CaseLabel, ClosureExpr, Decl, DeclKind, DeclNode, Expr, Parameter,
    SourceFile, Stmt, StmtNode, StringLiteral, StringSegment, SwitchStmt, TypeRef,
};

/// Printer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    pub indent: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self { indent: 4 }
    }
}

/// Accumulates rendered text.
#[derive(Debug, Default)]
pub struct Printer {
    out: String,
    depth: usize,
    options: PrintOptions,
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Renders a whole file.
pub fn print_file(file: &SourceFile) -> String {
    print_file_with(file, PrintOptions::default())
}

pub fn print_file_with(file: &SourceFile, options: PrintOptions) -> String {
    let mut printer = Printer::new(options);
    for (i, item) in file.items.iter().enumerate() {
        if i > 0 {
            printer.out.push('\n');
        }
        printer.stmt(item);
    }
    printer.finish()
}

pub fn print_decl(decl: &DeclNode) -> String {
    let mut printer = Printer::new(PrintOptions::default());
    printer.decl(&decl.value);
    printer.finish()
}

pub fn print_expr(expr: &Expr) -> String {
    let mut printer = Printer::new(PrintOptions::default());
    printer.expr(expr);
    printer.out
}

impl Printer {
    pub fn new(options: PrintOptions) -> Self {
        Self {
            out: String::new(),
            depth: 0,
            options,
        }
    }

    /// Returns the rendered text without the final newline.
    pub fn finish(mut self) -> String {
        while self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out
    }

    // ------------------------------------------------------------------------
    // Layout primitives
    // ------------------------------------------------------------------------

    fn pad(&mut self) {
        let width = self.depth * self.options.indent;
        self.out.extend(std::iter::repeat(' ').take(width));
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn line(&mut self, text: &str) {
        self.pad();
        self.push(text);
        self.out.push('\n');
    }

    fn indented(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    fn stmts(&mut self, stmts: &[StmtNode]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &StmtNode) {
        match &stmt.value {
            Stmt::Expr(expr) => {
                self.pad();
                self.expr(&expr.value);
                self.out.push('\n');
            }
            Stmt::Let { names, value } => {
                self.pad();
                self.push("let ");
                match names.as_slice() {
                    [single] => self.push(single),
                    _ => {
                        let joined = names.join(", ");
                        self.push(&format!("({joined})"));
                    }
                }
                self.push(" = ");
                self.expr(&value.value);
                self.out.push('\n');
            }
            Stmt::Assign { target, value } => {
                self.pad();
                self.expr(&target.value);
                self.push(" = ");
                self.expr(&value.value);
                self.out.push('\n');
            }
            Stmt::Return(value) => {
                self.pad();
                self.push("return");
                if let Some(value) = value {
                    self.push(" ");
                    self.expr(&value.value);
                }
                self.out.push('\n');
            }
            Stmt::Switch(switch) => self.switch(switch),
            Stmt::IfConfig { condition, body } => {
                self.line(&format!("#if {condition}"));
                self.stmts(body);
                self.line("#endif");
            }
            Stmt::Decl(decl) => self.decl(&decl.value),
        }
    }

    fn switch(&mut self, switch: &SwitchStmt) {
        self.pad();
        self.push("switch ");
        self.expr(&switch.subject.value);
        self.push(" {\n");
        for case in &switch.cases {
            match &case.label {
                CaseLabel::Patterns(patterns) => {
                    self.pad();
                    self.push("case ");
                    for (i, pattern) in patterns.iter().enumerate() {
                        if i > 0 {
                            self.push(", ");
                        }
                        self.expr(&pattern.value);
                    }
                    self.push(":\n");
                }
                CaseLabel::Default => self.line("default:"),
            }
            self.indented(|p| p.stmts(&case.body));
        }
        self.line("}");
    }

    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------

    fn decl(&mut self, decl: &Decl) {
        for attribute in &decl.attributes {
            self.attribute(attribute);
        }
        self.pad();
        for modifier in &decl.modifiers {
            self.push(modifier);
            self.push(" ");
        }
        match &decl.kind {
            DeclKind::Enum(t) => self.type_decl("enum", &t.name, &t.inherits, &t.members),
            DeclKind::Struct(t) => self.type_decl("struct", &t.name, &t.inherits, &t.members),
            DeclKind::Class(t) => self.type_decl("class", &t.name, &t.inherits, &t.members),
            DeclKind::EnumCase(elements) => {
                let names: Vec<&str> = elements.iter().map(|e| e.name.as_str()).collect();
                self.push("case ");
                self.push(&names.join(", "));
                self.out.push('\n');
            }
            DeclKind::Function(func) => {
                self.push("func ");
                self.push(&func.name);
                self.parameters(&func.signature.parameters);
                let effects = func.signature.effects;
                if effects.is_async {
                    self.push(" async");
                }
                if effects.throws {
                    self.push(" throws");
                }
                if let Some(ret) = &func.signature.return_type {
                    self.push(" -> ");
                    self.push(&ret.to_string());
                }
                match &func.body {
                    Some(body) => self.block(body),
                    None => self.out.push('\n'),
                }
            }
            DeclKind::Initializer(init) => {
                self.push(if init.failable { "init?" } else { "init" });
                self.parameters(&init.parameters);
                self.block(&init.body);
            }
        }
    }

    fn attribute(&mut self, attribute: &AttributeNode) {
        self.pad();
        self.push("@");
        self.push(&attribute.value.name);
        if !attribute.value.arguments.is_empty() {
            self.arguments(&attribute.value.arguments);
        }
        self.out.push('\n');
    }

    fn type_decl(&mut self, keyword: &str, name: &str, inherits: &[String], members: &[DeclNode]) {
        self.push(keyword);
        self.push(" ");
        self.push(name);
        if !inherits.is_empty() {
            self.push(": ");
            self.push(&inherits.join(", "));
        }
        self.push(" {\n");
        self.indented(|p| {
            let mut previous: Option<&Decl> = None;
            for member in members {
                if let Some(prev) = previous {
                    if !(prev.is_enum_case() && member.value.is_enum_case()) {
                        p.out.push('\n');
                    }
                }
                p.decl(&member.value);
                previous = Some(&member.value);
            }
        });
        self.line("}");
    }

    /// ` {`, the body, then the closing brace on its own line.
    fn block(&mut self, body: &[StmtNode]) {
        self.push(" {\n");
        self.indented(|p| p.stmts(body));
        self.line("}");
    }

    fn parameters(&mut self, parameters: &[Parameter]) {
        let rendered: Vec<String> = parameters.iter().map(Parameter::to_string).collect();
        self.push("(");
        self.push(&rendered.join(", "));
        self.push(")");
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Identifier(name) | Expr::Integer(name) => self.push(name),
            Expr::Nil => self.push("nil"),
            Expr::String(literal) => self.string_literal(literal),
            Expr::Binary { lhs, op, rhs } => {
                self.expr(&lhs.value);
                self.push(&format!(" {op} "));
                self.expr(&rhs.value);
            }
            Expr::Tuple(elements) => self.arguments(elements),
            Expr::Call(call) => {
                self.expr(&call.callee.value);
                if !(call.arguments.is_empty() && call.trailing_closure.is_some()) {
                    self.arguments(&call.arguments);
                }
                if let Some(closure) = &call.trailing_closure {
                    self.push(" ");
                    self.closure(closure);
                }
            }
            Expr::Member { base, name } => {
                if let Some(base) = base {
                    self.expr(&base.value);
                }
                self.push(".");
                self.push(name);
            }
            Expr::ForceUnwrap(inner) => {
                self.expr(&inner.value);
                self.push("!");
            }
            Expr::Await(inner) => {
                self.push("await ");
                self.expr(&inner.value);
            }
            Expr::Closure(closure) => self.closure(closure),
            Expr::MacroExpansion(invocation) => {
                self.push("#");
                self.push(&invocation.name);
                if !(invocation.bare && invocation.arguments.is_empty()) {
                    self.arguments(&invocation.arguments);
                }
            }
        }
    }

    fn arguments(&mut self, arguments: &[Argument]) {
        self.push("(");
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            if let Some(label) = &argument.label {
                self.push(label);
                self.push(": ");
            }
            self.expr(&argument.expr.value);
        }
        self.push(")");
    }

    fn closure(&mut self, closure: &ClosureExpr) {
        self.push("{");
        if !closure.params.is_empty() {
            self.push(" ");
            self.push(&closure.params.join(", "));
            self.push(" in");
        }
        if closure.body.is_empty() {
            self.push(" }");
            return;
        }
        self.out.push('\n');
        self.indented(|p| p.stmts(&closure.body));
        self.pad();
        self.push("}");
    }

    fn string_literal(&mut self, literal: &StringLiteral) {
        let pounds = "#".repeat(literal.raw_pounds);
        self.push(&pounds);
        self.push("\"");
        for segment in &literal.segments {
            match segment {
                StringSegment::Text(text) => {
                    let escaped = escape_text(text, literal.raw_pounds);
                    self.push(&escaped);
                }
                StringSegment::Interpolation(expr) => {
                    self.push("\\");
                    self.push(&pounds);
                    self.push("(");
                    self.expr(&expr.value);
                    self.push(")");
                }
            }
        }
        self.push("\"");
        self.push(&pounds);
    }
}

/// Escapes literal text for a string literal delimited by `raw_pounds` `#`s.
///
/// Raw literals keep quotes and backslashes verbatim; control characters are
/// still written as escapes so the literal stays on one line.
pub fn escape_text(text: &str, raw_pounds: usize) -> String {
    let pounds = "#".repeat(raw_pounds);
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let control = match c {
            '\n' => Some('n'),
            '\r' => Some('r'),
            '\t' => Some('t'),
            '\0' => Some('0'),
            _ => None,
        };
        match (control, raw_pounds) {
            (Some(letter), _) => {
                out.push('\\');
                out.push_str(&pounds);
                out.push(letter);
            }
            (None, 0) if c == '\\' || c == '"' => {
                out.push('\\');
                out.push(c);
            }
            (None, _) => out.push(c),
        }
    }
    out
}

// ============================================================================
// DISPLAY
// ============================================================================

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::Optional(inner) => match inner.as_ref() {
                TypeRef::Function { .. } => write!(f, "({inner})?"),
                _ => write!(f, "{inner}?"),
            },
            TypeRef::Function { params, ret } => {
                let params: Vec<String> = params.iter().map(TypeRef::to_string).collect();
                write!(f, "({}) -> {ret}", params.join(", "))
            }
            TypeRef::Tuple(items) => {
                let items: Vec<String> = items.iter().map(TypeRef::to_string).collect();
                write!(f, "({})", items.join(", "))
            }
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.second_name {
            Some(second) => write!(f, "{} {}: {}", self.first_name, second, self.ty),
            None => write!(f, "{}: {}", self.first_name, self.ty),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print_expr(self))
    }
}
