//! File-level macro expansion.
//!
//! Walks a [`SourceFile`] and replaces every registered macro invocation with
//! its expansion, recording a trace step per successful invocation and a
//! diagnostic per failed one.
//!
//! ## Rules
//!
//! - Freestanding macros expand outer-first: the expander sees its arguments
//!   as written, and the replacement is expanded again, up to
//!   [`MAX_MACRO_RECURSION_DEPTH`] levels.
//! - Attached macros see the declaration as written. Their attribute is
//!   consumed whether or not the expansion succeeds.
//! - Member output is appended to the member block; peer output follows the
//!   declaration.
//! - Unknown names (`#line`, `#dlogify`, `@objc`) are left in place.
//! - A failed invocation keeps its original syntax and does not stop the walk.

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::ast::printer::{print_decl, print_expr};
use crate::ast::{
    Argument, AttributeNode, CallExpr, CaseLabel, ClosureExpr, Decl, DeclKind, DeclNode, Expr,
    ExprNode, MacroExpansion, SourceFile, Span, Spanned, Stmt, StmtNode, StringLiteral,
    StringSegment, SwitchCase, SwitchStmt,
};
use crate::diagnostics::{DiagnosticReporter, MacroDiagnostic};
use crate::macros::registry::{MacroKind, MacroRegistry};
use crate::macros::types::{
    Expansion, ExpansionRequest, ExpansionStep, MacroContext, MacroRole, MAX_MACRO_RECURSION_DEPTH,
};
use crate::macros::ExpansionError;

// =============================
// Public API for macro expansion
// =============================

/// Result of expanding one file.
#[derive(Debug, Clone, Serialize)]
pub struct ExpansionOutcome {
    pub file: SourceFile,
    pub diagnostics: Vec<MacroDiagnostic>,
    pub trace: Vec<ExpansionStep>,
}

impl ExpansionOutcome {
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Expands every macro in `file` against `registry`.
///
/// # Example
/// ```rust
/// use zakkro::ast::{Builder, MacroExpansion, SourceFile, Spanned, Expr};
/// use zakkro::ast::printer::print_file;
/// use zakkro::macros::{expand_file, MacroContext, MacroRegistry};
///
/// let b = Builder::default();
/// let call = Spanned::new(
///     Expr::MacroExpansion(MacroExpansion::new("stringify", vec![b.ident("x").into()])),
///     Default::default(),
/// );
/// let file = SourceFile { name: "main.swift".into(), items: vec![b.expr_stmt(call)] };
/// let outcome = expand_file(file, MacroRegistry::standard(), &MacroContext::default());
/// assert!(outcome.is_success());
/// assert_eq!(print_file(&outcome.file), "(x, \"x\")");
/// ```
pub fn expand_file(
    file: SourceFile,
    registry: &MacroRegistry,
    ctx: &MacroContext,
) -> ExpansionOutcome {
    MacroExpander::new(registry, ctx).expand_file(file)
}

/// Expansion state for one run over one file.
pub struct MacroExpander<'r> {
    registry: &'r MacroRegistry,
    ctx: &'r MacroContext,
    reporter: DiagnosticReporter<'r>,
    diagnostics: Vec<MacroDiagnostic>,
    trace: Vec<ExpansionStep>,
}

impl<'r> MacroExpander<'r> {
    pub fn new(registry: &'r MacroRegistry, ctx: &'r MacroContext) -> Self {
        Self {
            registry,
            ctx,
            reporter: DiagnosticReporter::new(ctx),
            diagnostics: Vec::new(),
            trace: Vec::new(),
        }
    }

    pub fn expand_file(mut self, file: SourceFile) -> ExpansionOutcome {
        let items = self.expand_stmts(file.items, 0);
        debug!(
            file = %file.name,
            expanded = self.trace.len(),
            failed = self.diagnostics.len(),
            "expansion finished"
        );
        ExpansionOutcome {
            file: SourceFile {
                name: file.name,
                items,
            },
            diagnostics: self.diagnostics,
            trace: self.trace,
        }
    }

    pub fn diagnostics(&self) -> &[MacroDiagnostic] {
        &self.diagnostics
    }

    pub fn trace(&self) -> &[ExpansionStep] {
        &self.trace
    }

    // =============================
    // Statements
    // =============================

    fn expand_stmts(&mut self, stmts: Vec<StmtNode>, depth: usize) -> Vec<StmtNode> {
        let mut out = Vec::with_capacity(stmts.len());
        for stmt in stmts {
            let span = stmt.span;
            match stmt.value {
                Stmt::Decl(decl) => out.extend(
                    self.expand_decl(decl, depth)
                        .into_iter()
                        .map(|d| Spanned::new(Stmt::Decl(d), span)),
                ),
                other => out.push(Spanned::new(self.expand_stmt(other, depth), span)),
            }
        }
        out
    }

    fn expand_stmt(&mut self, stmt: Stmt, depth: usize) -> Stmt {
        match stmt {
            Stmt::Expr(expr) => Stmt::Expr(self.expand_expr(expr, depth)),
            Stmt::Let { names, value } => Stmt::Let {
                names,
                value: self.expand_expr(value, depth),
            },
            Stmt::Assign { target, value } => Stmt::Assign {
                target: self.expand_expr(target, depth),
                value: self.expand_expr(value, depth),
            },
            Stmt::Return(value) => Stmt::Return(value.map(|v| self.expand_expr(v, depth))),
            Stmt::Switch(SwitchStmt { subject, cases }) => Stmt::Switch(SwitchStmt {
                subject: self.expand_expr(subject, depth),
                cases: cases
                    .into_iter()
                    .map(|case| self.expand_case(case, depth))
                    .collect(),
            }),
            Stmt::IfConfig { condition, body } => Stmt::IfConfig {
                condition,
                body: self.expand_stmts(body, depth),
            },
            // `expand_stmts` splits declarations off before calling here.
            Stmt::Decl(decl) => Stmt::Decl(decl),
        }
    }

    fn expand_case(&mut self, case: SwitchCase, depth: usize) -> SwitchCase {
        let label = match case.label {
            CaseLabel::Patterns(patterns) => CaseLabel::Patterns(
                patterns
                    .into_iter()
                    .map(|p| self.expand_expr(p, depth))
                    .collect(),
            ),
            CaseLabel::Default => CaseLabel::Default,
        };
        SwitchCase {
            label,
            body: self.expand_stmts(case.body, depth),
        }
    }

    // =============================
    // Declarations
    // =============================

    /// Expands `decl` and returns it followed by its peers.
    fn expand_decl(&mut self, decl: DeclNode, depth: usize) -> Vec<DeclNode> {
        let (attached, kept): (Vec<AttributeNode>, Vec<AttributeNode>) = decl
            .value
            .attributes
            .iter()
            .cloned()
            .partition(|attribute| self.registry.contains(&attribute.value.name));

        let mut members = Vec::new();
        let mut peers = Vec::new();
        for attribute in &attached {
            let name = attribute.value.name.as_str();
            let Some(kind) = self.registry.lookup(name) else {
                continue;
            };
            let request = ExpansionRequest::Attached {
                attribute,
                declaration: &decl,
            };
            if let Some(Expansion::Declarations(generated)) = self.dispatch(name, kind, request) {
                match kind.role() {
                    MacroRole::Member => members.extend(generated),
                    _ => peers.extend(generated),
                }
            }
        }

        let span = decl.span;
        let Decl {
            modifiers, kind, ..
        } = decl.value;
        let mut kind = self.expand_decl_kind(kind, depth);

        if !members.is_empty() {
            let generated = self.expand_members(members, depth);
            match member_block_mut(&mut kind) {
                Some(block) => block.extend(generated),
                None => warn!(
                    count = generated.len(),
                    "declaration has no member block, generated members dropped"
                ),
            }
        }

        let mut out = vec![Spanned::new(
            Decl {
                attributes: kept,
                modifiers,
                kind,
            },
            span,
        )];
        out.extend(self.expand_members(peers, depth));
        out
    }

    fn expand_members(&mut self, members: Vec<DeclNode>, depth: usize) -> Vec<DeclNode> {
        members
            .into_iter()
            .flat_map(|member| self.expand_decl(member, depth))
            .collect()
    }

    fn expand_decl_kind(&mut self, kind: DeclKind, depth: usize) -> DeclKind {
        match kind {
            DeclKind::Enum(mut ty) => {
                ty.members = self.expand_members(ty.members, depth);
                DeclKind::Enum(ty)
            }
            DeclKind::Struct(mut ty) => {
                ty.members = self.expand_members(ty.members, depth);
                DeclKind::Struct(ty)
            }
            DeclKind::Class(mut ty) => {
                ty.members = self.expand_members(ty.members, depth);
                DeclKind::Class(ty)
            }
            DeclKind::Function(mut function) => {
                function.body = function.body.map(|body| self.expand_stmts(body, depth));
                DeclKind::Function(function)
            }
            DeclKind::Initializer(mut init) => {
                init.body = self.expand_stmts(init.body, depth);
                DeclKind::Initializer(init)
            }
            DeclKind::EnumCase(elements) => DeclKind::EnumCase(elements),
        }
    }

    // =============================
    // Expressions
    // =============================

    fn expand_expr(&mut self, expr: ExprNode, depth: usize) -> ExprNode {
        let span = expr.span;
        let value = match expr.value {
            Expr::MacroExpansion(invocation) => {
                return self.expand_invocation(invocation, span, depth);
            }
            Expr::Binary { lhs, op, rhs } => Expr::Binary {
                lhs: Box::new(self.expand_expr(*lhs, depth)),
                op,
                rhs: Box::new(self.expand_expr(*rhs, depth)),
            },
            Expr::Tuple(elements) => Expr::Tuple(self.expand_arguments(elements, depth)),
            Expr::Call(CallExpr {
                callee,
                arguments,
                trailing_closure,
            }) => Expr::Call(CallExpr {
                callee: Box::new(self.expand_expr(*callee, depth)),
                arguments: self.expand_arguments(arguments, depth),
                trailing_closure: trailing_closure.map(|c| self.expand_closure(c, depth)),
            }),
            Expr::Member { base, name } => Expr::Member {
                base: base.map(|b| Box::new(self.expand_expr(*b, depth))),
                name,
            },
            Expr::ForceUnwrap(inner) => {
                Expr::ForceUnwrap(Box::new(self.expand_expr(*inner, depth)))
            }
            Expr::Await(inner) => Expr::Await(Box::new(self.expand_expr(*inner, depth))),
            Expr::Closure(closure) => Expr::Closure(self.expand_closure(closure, depth)),
            Expr::String(StringLiteral {
                raw_pounds,
                segments,
            }) => Expr::String(StringLiteral {
                raw_pounds,
                segments: segments
                    .into_iter()
                    .map(|segment| match segment {
                        StringSegment::Interpolation(e) => {
                            StringSegment::Interpolation(self.expand_expr(e, depth))
                        }
                        text => text,
                    })
                    .collect(),
            }),
            leaf @ (Expr::Identifier(_) | Expr::Integer(_) | Expr::Nil) => leaf,
        };
        Spanned::new(value, span)
    }

    fn expand_invocation(
        &mut self,
        invocation: MacroExpansion,
        span: Span,
        depth: usize,
    ) -> ExprNode {
        let Some(kind) = self.registry.lookup(&invocation.name) else {
            trace!(name = %invocation.name, "not a registered macro, left in place");
            let MacroExpansion {
                name,
                arguments,
                bare,
            } = invocation;
            let arguments = self.expand_arguments(arguments, depth);
            let invocation = MacroExpansion {
                name,
                arguments,
                bare,
            };
            return Spanned::new(Expr::MacroExpansion(invocation), span);
        };

        if depth >= MAX_MACRO_RECURSION_DEPTH {
            let error = ExpansionError::RecursionLimit {
                name: invocation.name.clone(),
            };
            self.diagnostics
                .push(self.reporter.report(&invocation.name, error, span));
            return Spanned::new(Expr::MacroExpansion(invocation), span);
        }

        let request = ExpansionRequest::Freestanding {
            invocation: &invocation,
            span,
        };
        match self.dispatch(&invocation.name, kind, request) {
            Some(Expansion::Expression(replacement)) => self.expand_expr(replacement, depth + 1),
            _ => Spanned::new(Expr::MacroExpansion(invocation), span),
        }
    }

    fn expand_arguments(&mut self, arguments: Vec<Argument>, depth: usize) -> Vec<Argument> {
        arguments
            .into_iter()
            .map(|Argument { label, expr }| Argument {
                label,
                expr: self.expand_expr(expr, depth),
            })
            .collect()
    }

    fn expand_closure(&mut self, closure: ClosureExpr, depth: usize) -> ClosureExpr {
        ClosureExpr {
            params: closure.params,
            body: self.expand_stmts(closure.body, depth),
        }
    }

    // =============================
    // Dispatch
    // =============================

    /// Runs one expander, recording either a trace step or a diagnostic.
    fn dispatch(
        &mut self,
        name: &str,
        kind: MacroKind,
        request: ExpansionRequest<'_>,
    ) -> Option<Expansion> {
        let span = request.span();
        debug!(macro_name = name, role = %kind.role(), start = span.start, end = span.end, "expanding");
        match kind.def().call(name, request, self.ctx) {
            Ok(expansion) => {
                self.trace.push(ExpansionStep {
                    macro_name: name.to_string(),
                    role: kind.role(),
                    input: render_request(&request),
                    output: render_expansion(&expansion),
                });
                Some(expansion)
            }
            Err(error) => {
                debug!(macro_name = name, %error, "expansion failed");
                self.diagnostics.push(self.reporter.report(name, error, span));
                None
            }
        }
    }
}

fn member_block_mut(kind: &mut DeclKind) -> Option<&mut Vec<DeclNode>> {
    match kind {
        DeclKind::Enum(ty) | DeclKind::Struct(ty) | DeclKind::Class(ty) => Some(&mut ty.members),
        _ => None,
    }
}

fn render_request(request: &ExpansionRequest<'_>) -> String {
    match request {
        ExpansionRequest::Freestanding { invocation, .. } => {
            print_expr(&Expr::MacroExpansion((*invocation).clone()))
        }
        ExpansionRequest::Attached { declaration, .. } => print_decl(declaration),
    }
}

fn render_expansion(expansion: &Expansion) -> String {
    match expansion {
        Expansion::Expression(expr) => print_expr(&expr.value),
        Expansion::Declarations(decls) => decls
            .iter()
            .map(print_decl)
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}
