//!
//! This module defines the fundamental types used throughout the macro system.
//! It has no dependencies on other macro modules apart from the error type.
//!
//! ## Ownership and Borrowing
//!
//! - Expander functions are plain `fn` pointers, cheaply copyable and `Sync`
//! - Expanders borrow their input; every `Expansion` owns freshly built syntax
//! - `MacroContext` is shared read-only by all invocations of one run

use std::fmt;
use std::sync::Arc;

use miette::NamedSource;
use serde::{Deserialize, Serialize};

use crate::ast::{AttributeNode, DeclNode, ExprNode, MacroExpansion, Span};
use crate::diagnostics::SourceArc;
use crate::macros::ExpansionError;

/// Maximum depth of re-expanding the output of a freestanding macro.
pub const MAX_MACRO_RECURSION_DEPTH: usize = 128;

/// Name of the enum `@SlopeSubset` converts from unless configured otherwise.
pub const DEFAULT_REFERENCE_ENUM: &str = "Slope";

/// Expander for a freestanding `#name(...)` expression.
pub type ExpressionMacroFn =
    fn(&MacroExpansion, Span, &MacroContext) -> Result<ExprNode, ExpansionError>;

/// Expander for an `@Name` attribute; receives the attribute and the declaration it annotates.
pub type AttachedMacroFn =
    fn(&AttributeNode, &DeclNode, &MacroContext) -> Result<Vec<DeclNode>, ExpansionError>;

/// Where a macro's output is spliced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacroRole {
    /// Replaces the invocation expression.
    Expression,
    /// Appended to the member block of the annotated declaration.
    Member,
    /// Inserted as siblings right after the annotated declaration.
    Peer,
}

/// A macro implementation together with its role.
#[derive(Debug, Clone, Copy)]
pub enum MacroDef {
    Expression(ExpressionMacroFn),
    Member(AttachedMacroFn),
    Peer(AttachedMacroFn),
}

/// What a single invocation asks for.
#[derive(Debug, Clone, Copy)]
pub enum ExpansionRequest<'a> {
    Freestanding {
        invocation: &'a MacroExpansion,
        span: Span,
    },
    Attached {
        attribute: &'a AttributeNode,
        declaration: &'a DeclNode,
    },
}

/// Replacement syntax produced by a successful expansion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expansion {
    Expression(ExprNode),
    /// Zero or more members or peers.
    Declarations(Vec<DeclNode>),
}

/// Read-only context shared by every invocation of one expansion run.
///
/// # Examples
///
/// ```rust
/// use zakkro::ast::Span;
/// use zakkro::macros::MacroContext;
/// let ctx = MacroContext::new("main.swift").with_source("#stringify(a + b)");
/// assert_eq!(ctx.source_text(Span::new(11, 16)), Some("a + b"));
/// assert_eq!(ctx.reference_enum(), "Slope");
/// ```
#[derive(Debug, Clone)]
pub struct MacroContext {
    file_name: String,
    source: Option<SourceArc>,
    reference_enum: String,
    reference_cases: Option<Vec<String>>,
}

/// A single expansion step, for traceability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpansionStep {
    pub macro_name: String,
    pub role: MacroRole,
    /// The invocation as printed source.
    pub input: String,
    /// The replacement as printed source.
    pub output: String,
}

// ============================================================================
// IMPLEMENTATIONS
// ============================================================================

impl MacroDef {
    pub fn role(&self) -> MacroRole {
        match self {
            MacroDef::Expression(_) => MacroRole::Expression,
            MacroDef::Member(_) => MacroRole::Member,
            MacroDef::Peer(_) => MacroRole::Peer,
        }
    }

    /// Runs the expander if the request matches its role.
    pub fn call(
        &self,
        name: &str,
        request: ExpansionRequest<'_>,
        ctx: &MacroContext,
    ) -> Result<Expansion, ExpansionError> {
        match (self, request) {
            (MacroDef::Expression(f), ExpansionRequest::Freestanding { invocation, span }) => {
                f(invocation, span, ctx).map(Expansion::Expression)
            }
            (
                MacroDef::Member(f) | MacroDef::Peer(f),
                ExpansionRequest::Attached {
                    attribute,
                    declaration,
                },
            ) => f(attribute, declaration, ctx).map(Expansion::Declarations),
            (_, ExpansionRequest::Freestanding { .. }) => Err(ExpansionError::RoleMismatch {
                name: name.to_string(),
                role: self.role(),
                used: "as a freestanding expression",
            }),
            (_, ExpansionRequest::Attached { .. }) => Err(ExpansionError::RoleMismatch {
                name: name.to_string(),
                role: self.role(),
                used: "as an attribute",
            }),
        }
    }
}

impl ExpansionRequest<'_> {
    pub fn span(&self) -> Span {
        match self {
            ExpansionRequest::Freestanding { span, .. } => *span,
            ExpansionRequest::Attached { attribute, .. } => attribute.span,
        }
    }
}

impl MacroContext {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            source: None,
            reference_enum: DEFAULT_REFERENCE_ENUM.to_string(),
            reference_cases: None,
        }
    }

    /// Attaches the host source text the spans refer to.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(Arc::new(NamedSource::new(
            self.file_name.clone(),
            source.into(),
        )));
        self
    }

    pub fn with_reference_enum(mut self, name: impl Into<String>) -> Self {
        self.reference_enum = name.into();
        self
    }

    /// Declares the case names of the reference enum, when the host knows them.
    pub fn with_reference_cases<I, S>(mut self, cases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_cases = Some(cases.into_iter().map(Into::into).collect());
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn reference_enum(&self) -> &str {
        &self.reference_enum
    }

    pub fn reference_cases(&self) -> Option<&[String]> {
        self.reference_cases.as_deref()
    }

    pub fn named_source(&self) -> Option<&SourceArc> {
        self.source.as_ref()
    }

    /// Source text under `span`. Empty spans have no text.
    pub fn source_text(&self, span: Span) -> Option<&str> {
        if span.is_empty() {
            return None;
        }
        let source = self.source.as_ref()?;
        span.slice(source.inner())
    }

    /// 1-based line and column of `span`, when source text is attached.
    pub fn location(&self, span: Span) -> Option<(usize, usize)> {
        let source = self.source.as_ref()?;
        span.line_col(source.inner())
    }
}

impl Default for MacroContext {
    fn default() -> Self {
        Self::new("<fragment>")
    }
}

impl fmt::Display for MacroRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MacroRole::Expression => "expression",
            MacroRole::Member => "member",
            MacroRole::Peer => "peer",
        };
        f.write_str(text)
    }
}
