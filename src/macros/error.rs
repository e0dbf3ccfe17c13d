//! Error handling for macro operations.
//!
//! `ExpansionError` is what an expander returns when it refuses a fragment.
//! The driver turns it into a positioned `MacroDiagnostic` (see
//! `src/diagnostics.rs`); expanders themselves never see spans of failures.

use serde::Serialize;
use thiserror::Error;

use crate::macros::types::{MacroRole, MAX_MACRO_RECURSION_DEPTH};

/// Why an expansion failed.
///
/// # Examples
///
/// ```rust
/// use zakkro::macros::ExpansionError;
/// let err = ExpansionError::MalformedUrl("\"\"".to_string());
/// assert_eq!(err.to_string(), "The input URL is malformed: \"\"");
/// assert_eq!(err.code(), "zakkro::malformed_url");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ExpansionError {
    #[error("the macro does not have any arguments")]
    MissingArgument,
    #[error("@SlopeSubset can only be applied to an enum")]
    OnlyApplicableToEnum,
    #[error("#URL requires a static string literal")]
    RequiresStaticStringLiteral,
    #[error("The input URL is malformed: {0}")]
    MalformedUrl(String),
    #[error("@AddAsync only works on functions")]
    OnlyFunction,
    #[error("@DebugLogger can only be applied to a class or struct")]
    NotCorrectType,
    #[error("'{name}' is {} macro and cannot be used {used}", article(.role))]
    RoleMismatch {
        name: String,
        role: MacroRole,
        used: &'static str,
    },
    #[error("expansion of '{name}' exceeded the recursion limit ({})", MAX_MACRO_RECURSION_DEPTH)]
    RecursionLimit { name: String },
}

impl ExpansionError {
    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            ExpansionError::MissingArgument => "zakkro::missing_argument",
            ExpansionError::OnlyApplicableToEnum => "zakkro::only_applicable_to_enum",
            ExpansionError::RequiresStaticStringLiteral => "zakkro::requires_static_string_literal",
            ExpansionError::MalformedUrl(_) => "zakkro::malformed_url",
            ExpansionError::OnlyFunction => "zakkro::only_function",
            ExpansionError::NotCorrectType => "zakkro::not_correct_type",
            ExpansionError::RoleMismatch { .. } => "zakkro::role_mismatch",
            ExpansionError::RecursionLimit { .. } => "zakkro::recursion_limit",
        }
    }

    pub fn help(&self) -> Option<&'static str> {
        match self {
            ExpansionError::RequiresStaticStringLiteral => {
                Some("pass a plain string literal without interpolation")
            }
            ExpansionError::MalformedUrl(_) => Some("the literal must parse as an absolute URL"),
            ExpansionError::OnlyFunction => {
                Some("attach @AddAsync to a function whose last parameter is a completion handler")
            }
            _ => None,
        }
    }
}

fn article(role: &MacroRole) -> &'static str {
    match role {
        MacroRole::Expression => "an expression",
        MacroRole::Member => "a member",
        MacroRole::Peer => "a peer",
    }
}
