//! The macros zakkro ships.
//!
//! Each submodule exposes one `expand` function matching either
//! [`ExpressionMacroFn`](crate::macros::ExpressionMacroFn) or
//! [`AttachedMacroFn`](crate::macros::AttachedMacroFn). Registration happens in
//! [`MacroKind::def`](crate::macros::MacroKind::def).

pub mod add_async;
pub mod debug_logger;
pub mod logify;
pub mod slope_subset;
pub mod stringify;
pub mod url;
