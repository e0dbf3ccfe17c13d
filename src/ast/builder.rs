//! # AST Builder Module
//!
//! Field-by-field constructors for synthesized syntax. Expanders build their
//! replacement trees through a [`Builder`] instead of splicing source text, so
//! every generated node is typed and carries the span of the invocation that
//! produced it.

use super::{
    Argument, ArgumentList, CallExpr, CaseLabel, ClosureExpr, Decl, DeclKind, DeclNode, Expr,
    ExprNode, FunctionDecl, FunctionSignature, InitializerDecl, Parameter, Spanned, Span, Stmt,
    StmtNode, StringLiteral, StringSegment, SwitchCase, SwitchStmt, TypeRef,
};

/// Creates nodes stamped with a single span.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builder {
    span: Span,
}

impl Builder {
    pub fn at(span: Span) -> Self {
        Self { span }
    }

    fn node<T>(&self, value: T) -> Spanned<T> {
        Spanned::new(value, self.span)
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    pub fn ident(&self, name: &str) -> ExprNode {
        self.node(Expr::Identifier(name.to_string()))
    }

    pub fn binary(&self, lhs: ExprNode, op: &str, rhs: ExprNode) -> ExprNode {
        self.node(Expr::Binary {
            lhs: Box::new(lhs),
            op: op.to_string(),
            rhs: Box::new(rhs),
        })
    }

    pub fn nil(&self) -> ExprNode {
        self.node(Expr::Nil)
    }

    /// `base.name`
    pub fn member(&self, base: ExprNode, name: &str) -> ExprNode {
        self.node(Expr::Member {
            base: Some(Box::new(base)),
            name: name.to_string(),
        })
    }

    /// `.name`
    pub fn implicit_member(&self, name: &str) -> ExprNode {
        self.node(Expr::Member {
            base: None,
            name: name.to_string(),
        })
    }

    pub fn call(&self, callee: ExprNode, arguments: ArgumentList) -> ExprNode {
        self.node(Expr::Call(CallExpr {
            callee: Box::new(callee),
            arguments,
            trailing_closure: None,
        }))
    }

    pub fn call_with_closure(
        &self,
        callee: ExprNode,
        arguments: ArgumentList,
        closure: ClosureExpr,
    ) -> ExprNode {
        self.node(Expr::Call(CallExpr {
            callee: Box::new(callee),
            arguments,
            trailing_closure: Some(closure),
        }))
    }

    pub fn tuple(&self, elements: ArgumentList) -> ExprNode {
        self.node(Expr::Tuple(elements))
    }

    pub fn force_unwrap(&self, expr: ExprNode) -> ExprNode {
        self.node(Expr::ForceUnwrap(Box::new(expr)))
    }

    pub fn await_expr(&self, expr: ExprNode) -> ExprNode {
        self.node(Expr::Await(Box::new(expr)))
    }

    /// A string literal holding `text`, delimited so that it reads back as
    /// exactly `text` with no interpolation.
    pub fn string_literal(&self, text: &str) -> ExprNode {
        self.node(Expr::String(StringLiteral {
            raw_pounds: raw_delimiter_for(text),
            segments: vec![StringSegment::Text(text.to_string())],
        }))
    }

    /// A plain literal mixing text and interpolated expressions.
    pub fn interpolated(&self, segments: Vec<StringSegment>) -> ExprNode {
        self.node(Expr::String(StringLiteral {
            raw_pounds: 0,
            segments,
        }))
    }

    pub fn closure(&self, params: &[&str], body: Vec<StmtNode>) -> ClosureExpr {
        ClosureExpr {
            params: params.iter().map(|p| p.to_string()).collect(),
            body,
        }
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    pub fn expr_stmt(&self, expr: ExprNode) -> StmtNode {
        self.node(Stmt::Expr(expr))
    }

    pub fn assign(&self, target: ExprNode, value: ExprNode) -> StmtNode {
        self.node(Stmt::Assign { target, value })
    }

    pub fn ret(&self, value: Option<ExprNode>) -> StmtNode {
        self.node(Stmt::Return(value))
    }

    pub fn switch(&self, subject: ExprNode, cases: Vec<SwitchCase>) -> StmtNode {
        self.node(Stmt::Switch(SwitchStmt { subject, cases }))
    }

    pub fn case(&self, patterns: Vec<ExprNode>, body: Vec<StmtNode>) -> SwitchCase {
        SwitchCase {
            label: CaseLabel::Patterns(patterns),
            body,
        }
    }

    pub fn default_case(&self, body: Vec<StmtNode>) -> SwitchCase {
        SwitchCase {
            label: CaseLabel::Default,
            body,
        }
    }

    pub fn if_config(&self, condition: &str, body: Vec<StmtNode>) -> StmtNode {
        self.node(Stmt::IfConfig {
            condition: condition.to_string(),
            body,
        })
    }

    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------

    pub fn param(&self, first_name: &str, second_name: Option<&str>, ty: TypeRef) -> Parameter {
        Parameter {
            first_name: first_name.to_string(),
            second_name: second_name.map(str::to_string),
            ty,
        }
    }

    pub fn initializer(
        &self,
        failable: bool,
        parameters: Vec<Parameter>,
        body: Vec<StmtNode>,
    ) -> DeclNode {
        self.node(Decl::new(DeclKind::Initializer(InitializerDecl {
            failable,
            parameters,
            body,
        })))
    }

    pub fn function(
        &self,
        name: &str,
        signature: FunctionSignature,
        body: Vec<StmtNode>,
    ) -> DeclNode {
        self.node(Decl::new(DeclKind::Function(FunctionDecl {
            name: name.to_string(),
            signature,
            body: Some(body),
        })))
    }
}

/// Number of `#` needed so that `text` can sit verbatim inside a raw literal.
///
/// Zero when the text has no quote or backslash. Otherwise one more than the
/// longest run of `#` directly after any quote or backslash.
pub fn raw_delimiter_for(text: &str) -> usize {
    if !text.contains(['"', '\\']) {
        return 0;
    }
    let mut longest = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '"' && c != '\\' {
            continue;
        }
        let mut run = 0;
        while chars.peek() == Some(&'#') {
            chars.next();
            run += 1;
        }
        longest = longest.max(run);
    }
    longest + 1
}

impl From<ExprNode> for Argument {
    fn from(expr: ExprNode) -> Self {
        Argument::positional(expr)
    }
}
