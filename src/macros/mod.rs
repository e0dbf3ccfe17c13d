//! # Zakkro Macro Expansion
//!
//! Compile-time rewriting of host syntax trees. A macro is a pure function
//! from a syntax fragment plus a [`MacroContext`] to replacement syntax or an
//! [`ExpansionError`].
//!
//! ## Core Principles
//!
//! - **Syntactic only**: expanders see fragments, never the host's type checker.
//! - **Pure**: no I/O, no global state; every call owns its output.
//! - **Inspectable**: each expansion is recorded as an [`ExpansionStep`].
//! - **Static dispatch**: the set of macros is the closed [`MacroKind`] enum.
//!
//! ## Module Structure
//!
//! - **`types`**: roles, definitions, requests and the shared context
//! - **`registry`**: name lookup and macro metadata
//! - **`extract`**: shape checks on fragments
//! - **`std_macros`**: the expanders themselves
//! - **`expander`**: the file-level driver
//! - **`error`**: expansion failures

pub mod error;
pub mod expander;
pub mod extract;
pub mod registry;
pub mod std_macros;
pub mod types;

pub use error::ExpansionError;
pub use expander::{expand_file, ExpansionOutcome, MacroExpander};
pub use registry::{MacroKind, MacroRegistry};
pub use types::{
    AttachedMacroFn, Expansion, ExpansionRequest, ExpansionStep, ExpressionMacroFn, MacroContext,
    MacroDef, MacroRole, DEFAULT_REFERENCE_ENUM, MAX_MACRO_RECURSION_DEPTH,
};
