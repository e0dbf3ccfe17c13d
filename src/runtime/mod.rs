//! Runtime support for code produced by `@AddAsync`.
//!
//! The generated async peer suspends on a one-shot continuation and resumes
//! when the original callback fires. [`with_checked_continuation`] models that
//! contract for Rust callers.

pub mod continuation;

pub use continuation::{with_checked_continuation, CheckedContinuation};
