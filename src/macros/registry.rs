//! Macro registry for lookup of macro definitions by name.
//!
//! Every macro zakkro ships is a variant of [`MacroKind`]; its expander is
//! selected by a `match`, never through dynamic lookup. A [`MacroRegistry`]
//! only decides which names are visible to an expansion run.
//!
//! The standard registry is built once on first use and is read-only
//! afterwards, so it can be shared freely between threads.
//!
//! # Summary Table
//! | Name          | Role       | Applies to                    |
//! |---------------|------------|-------------------------------|
//! | `stringify`   | Expression | any single expression         |
//! | `URL`         | Expression | a static string literal       |
//! | `logify`      | Expression | any single expression         |
//! | `SlopeSubset` | Member     | enum declarations             |
//! | `DebugLogger` | Member     | class or struct declarations  |
//! | `AddAsync`    | Peer       | functions ending in a callback |

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::macros::std_macros::{add_async, debug_logger, logify, slope_subset, stringify, url};
use crate::macros::types::{Expansion, ExpansionRequest, MacroContext, MacroDef, MacroRole};
use crate::macros::ExpansionError;
use crate::{err_msg, ZakkroError};

/// The macros zakkro implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MacroKind {
    Stringify,
    SlopeSubset,
    Url,
    AddAsync,
    Logify,
    DebugLogger,
}

impl MacroKind {
    pub const ALL: [MacroKind; 6] = [
        MacroKind::Stringify,
        MacroKind::SlopeSubset,
        MacroKind::Url,
        MacroKind::AddAsync,
        MacroKind::Logify,
        MacroKind::DebugLogger,
    ];

    /// Name used at invocation sites (`#name` or `@Name`).
    pub fn name(self) -> &'static str {
        match self {
            MacroKind::Stringify => "stringify",
            MacroKind::SlopeSubset => "SlopeSubset",
            MacroKind::Url => "URL",
            MacroKind::AddAsync => "AddAsync",
            MacroKind::Logify => "logify",
            MacroKind::DebugLogger => "DebugLogger",
        }
    }

    pub fn def(self) -> MacroDef {
        match self {
            MacroKind::Stringify => MacroDef::Expression(stringify::expand),
            MacroKind::SlopeSubset => MacroDef::Member(slope_subset::expand),
            MacroKind::Url => MacroDef::Expression(url::expand),
            MacroKind::AddAsync => MacroDef::Peer(add_async::expand),
            MacroKind::Logify => MacroDef::Expression(logify::expand),
            MacroKind::DebugLogger => MacroDef::Member(debug_logger::expand),
        }
    }

    pub fn role(self) -> MacroRole {
        self.def().role()
    }

    pub fn description(self) -> &'static str {
        match self {
            MacroKind::Stringify => {
                "Produces a tuple of the value of an expression and its source code."
            }
            MacroKind::SlopeSubset => {
                "Generates an initializer converting a Slope to this enum, or nil when the slope is not in the subset."
            }
            MacroKind::Url => "Validates a static string literal as a URL at expansion time.",
            MacroKind::AddAsync => {
                "Adds an async variant of a function whose last parameter is a completion handler."
            }
            MacroKind::Logify => "Produces a string literal holding a logging call for an expression.",
            MacroKind::DebugLogger => {
                "Adds a log(issue:) method that prints only in debug builds."
            }
        }
    }

    /// Expands one invocation of this macro.
    pub fn expand(
        self,
        request: ExpansionRequest<'_>,
        ctx: &MacroContext,
    ) -> Result<Expansion, ExpansionError> {
        self.def().call(self.name(), request, ctx)
    }
}

static STANDARD: Lazy<MacroRegistry> = Lazy::new(|| MacroRegistry::from_kinds(MacroKind::ALL));

/// Name to macro mapping for one expansion run.
///
/// # Example
/// ```rust
/// use zakkro::macros::{MacroKind, MacroRegistry};
/// let reg = MacroRegistry::standard();
/// assert_eq!(reg.lookup("URL"), Some(MacroKind::Url));
/// assert!(reg.lookup("url").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MacroRegistry {
    macros: HashMap<String, MacroKind>,
}

impl MacroRegistry {
    /// Creates a new, empty macro registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry holding every macro under its standard name.
    pub fn standard() -> &'static MacroRegistry {
        &STANDARD
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = MacroKind>) -> Self {
        let mut registry = Self::new();
        for kind in kinds {
            registry.register(kind.name(), kind);
        }
        registry
    }

    /// Registers `kind` under `name`.
    ///
    /// # Returns
    /// The previously registered macro, if the name was taken.
    pub fn register(&mut self, name: &str, kind: MacroKind) -> Option<MacroKind> {
        self.macros.insert(name.to_string(), kind)
    }

    /// Registers `kind` under `name`, refusing to overwrite.
    ///
    /// # Errors
    /// Returns an error if a macro with this name is already registered.
    pub fn register_or_error(&mut self, name: &str, kind: MacroKind) -> Result<(), ZakkroError> {
        if self.macros.contains_key(name) {
            return Err(err_msg!(Registry, "Macro '{}' is already registered", name));
        }
        self.macros.insert(name.to_string(), kind);
        Ok(())
    }

    /// Case-sensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<MacroKind> {
        self.macros.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Registered entries sorted by name.
    pub fn entries(&self) -> Vec<(&str, MacroKind)> {
        let mut entries: Vec<(&str, MacroKind)> = self
            .macros
            .iter()
            .map(|(name, kind)| (name.as_str(), *kind))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
