pub use crate::diagnostics::{to_error_source, ErrorContext, MacroDiagnostic, ZakkroError};

pub mod ast;
pub mod cli;
pub mod diagnostics;
pub mod macros;
pub mod runtime;
