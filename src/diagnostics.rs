//! # Overview
//!
//! This module defines the `miette`-based diagnostic types for zakkro.
//!
//! - [`MacroDiagnostic`] is a failed macro invocation: the `ExpansionError` an
//!   expander returned, positioned at the invocation span.
//! - [`ZakkroError`] covers everything around expansion (reading trees,
//!   registry misuse, a run that produced diagnostics).
//!
//! # Error Construction Macros
//!
//! - **Use `err_msg!` for simple, message-only errors.**
//!   - `err_msg!(Input, "Unexpected token")`
//! - **Use `err_ctx!` for errors with a source and span.**
//!   - `err_ctx!(Input, "Invalid tree", src, span)`

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use serde::Serialize;
use thiserror::Error;

use crate::ast::Span;
use crate::macros::{ExpansionError, MacroContext};

// Type aliases for clarity and brevity
pub type SourceArc = Arc<NamedSource<String>>;

/// Minimal, composable error context for diagnostics.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The primary source for this error (if any).
    pub source: Option<SourceArc>,
    /// The primary span for this error (if any).
    pub span: Option<Span>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    /// Returns an empty error context (no source, span, or help).
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates a context with both source and span.
    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: None,
        }
    }
}

/// Errors surfaced around an expansion run.
#[derive(Debug, Error)]
pub enum ZakkroError {
    #[error("IO error: {message}")]
    Io {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Input error: {message}")]
    Input {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Registry error: {message}")]
    Registry {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Expansion failed: {message}")]
    Expansion {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl ZakkroError {
    fn get_ctx(&self) -> &ErrorContext {
        match self {
            ZakkroError::Io { ctx, .. }
            | ZakkroError::Input { ctx, .. }
            | ZakkroError::Registry { ctx, .. }
            | ZakkroError::Expansion { ctx, .. } => ctx,
        }
    }

    fn message(&self) -> &str {
        match self {
            ZakkroError::Io { message, .. }
            | ZakkroError::Input { message, .. }
            | ZakkroError::Registry { message, .. }
            | ZakkroError::Expansion { message, .. } => message,
        }
    }

    /// Attaches an underlying cause.
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(cause);
        match &mut self {
            ZakkroError::Io { source, .. }
            | ZakkroError::Input { source, .. }
            | ZakkroError::Registry { source, .. }
            | ZakkroError::Expansion { source, .. } => *source = Some(boxed),
        }
        self
    }
}

impl Diagnostic for ZakkroError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self {
            ZakkroError::Io { .. } => "zakkro::io",
            ZakkroError::Input { .. } => "zakkro::input",
            ZakkroError::Registry { .. } => "zakkro::registry",
            ZakkroError::Expansion { .. } => "zakkro::expansion",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.get_ctx().span?;
        let label = LabeledSpan::new(Some(self.message().to_string()), span.start, label_len(span));
        Some(Box::new(std::iter::once(label)))
    }
}

fn label_len(span: Span) -> usize {
    if span.end > span.start {
        span.end - span.start
    } else {
        1
    }
}

/// Converts a source string into an `Arc<NamedSource<String>>` for use in error contexts.
pub fn to_error_source<S: AsRef<str>>(name: &str, source: S) -> SourceArc {
    Arc::new(NamedSource::new(name, source.as_ref().to_string()))
}

// ============================================================================
// MACRO DIAGNOSTICS
// ============================================================================

/// A failed macro invocation, positioned at the invocation site.
#[derive(Debug, Clone, Serialize)]
pub struct MacroDiagnostic {
    pub macro_name: String,
    pub error: ExpansionError,
    pub span: Span,
    /// 1-based `(line, column)`, when the host source is known.
    pub location: Option<(usize, usize)>,
    #[serde(skip)]
    source: Option<SourceArc>,
}

impl MacroDiagnostic {
    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn line(&self) -> Option<usize> {
        self.location.map(|(line, _)| line)
    }

    pub fn column(&self) -> Option<usize> {
        self.location.map(|(_, column)| column)
    }
}

impl std::fmt::Display for MacroDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.location {
            Some((line, column)) => write!(f, "{line}:{column}: {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for MacroDiagnostic {}

impl Diagnostic for MacroDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(self.error.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.error
            .help()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.source.as_ref().map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.source.as_ref()?;
        let label = LabeledSpan::new(
            Some(format!("in expansion of '{}'", self.macro_name)),
            self.span.start,
            label_len(self.span),
        );
        Some(Box::new(std::iter::once(label)))
    }
}

/// Turns expander failures into positioned diagnostics for one run.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticReporter<'a> {
    ctx: &'a MacroContext,
}

impl<'a> DiagnosticReporter<'a> {
    pub fn new(ctx: &'a MacroContext) -> Self {
        Self { ctx }
    }

    pub fn report(&self, macro_name: &str, error: ExpansionError, span: Span) -> MacroDiagnostic {
        MacroDiagnostic {
            macro_name: macro_name.to_string(),
            error,
            span,
            location: self.ctx.location(span),
            source: self.ctx.named_source().cloned(),
        }
    }
}

// ============================================================================
// CONSTRUCTION MACROS
// ============================================================================

/// Constructs a ZakkroError variant with a formatted message and no context.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $msg:expr, $($arg:expr),+ $(,)?) => {
        $crate::ZakkroError::$variant {
            message: format!($msg, $($arg),+),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
    ($variant:ident, $msg:expr) => {
        $crate::ZakkroError::$variant {
            message: format!("{}", $msg),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
}

/// Constructs a ZakkroError variant with a message, a source and a span.
#[macro_export]
macro_rules! err_ctx {
    ($variant:ident, $msg:expr, $src:expr, $span:expr, $help:expr) => {
        $crate::ZakkroError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::diagnostics::SourceArc::clone($src)),
                span: Some($span),
                help: Some(format!("{}", $help)),
            },
            source: None,
        }
    };
    ($variant:ident, $msg:expr, $src:expr, $span:expr) => {
        $crate::ZakkroError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext::with_source_and_span(
                $crate::diagnostics::SourceArc::clone($src),
                $span,
            ),
            source: None,
        }
    };
}

#[cfg(test)]
mod diagnostics_tests {
    use miette::Report;

    use super::*;

    #[test]
    fn report_renders_label_and_help() {
        let src = to_error_source("tree.json", "{ \"items\": [ }");
        let err = err_ctx!(
            Input,
            "expected a value",
            &src,
            Span { start: 13, end: 14 },
            "check the tree emitted by the host"
        );
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("expected a value"));
        assert!(output.contains("check the tree emitted by the host"));
    }

    #[test]
    fn err_msg_formats_arguments() {
        let err = err_msg!(Registry, "Macro '{}' is already registered", "URL");
        assert_eq!(
            err.to_string(),
            "Registry error: Macro 'URL' is already registered"
        );
    }

    #[test]
    fn macro_diagnostic_position() {
        let ctx = MacroContext::new("main.swift").with_source("let a = 1\n@SlopeSubset\nstruct S {}");
        let reporter = DiagnosticReporter::new(&ctx);
        let diag = reporter.report(
            "SlopeSubset",
            ExpansionError::OnlyApplicableToEnum,
            Span::new(10, 22),
        );
        assert_eq!(diag.line(), Some(2));
        assert_eq!(diag.column(), Some(1));
        assert_eq!(
            diag.to_string(),
            "2:1: @SlopeSubset can only be applied to an enum"
        );
        let output = format!("{:?}", Report::new(diag));
        assert!(output.contains("in expansion of 'SlopeSubset'"));
    }

    #[test]
    fn diagnostic_without_source_has_no_location() {
        let ctx = MacroContext::default();
        let diag = DiagnosticReporter::new(&ctx).report(
            "URL",
            ExpansionError::RequiresStaticStringLiteral,
            Span::new(0, 4),
        );
        assert_eq!(diag.location, None);
        assert_eq!(diag.to_string(), "#URL requires a static string literal");
    }
}
