//! One-shot continuations.
//!
//! A [`CheckedContinuation`] may be resumed exactly once. Resuming twice is a
//! programming error: debug builds panic, release builds keep the first value
//! and log the second. A continuation dropped without being resumed leaves the
//! awaiting task suspended forever.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Resumption handle passed to the body of [`with_checked_continuation`].
///
/// Clones share the same one-shot slot.
pub struct CheckedContinuation<T> {
    sender: Arc<Mutex<Option<oneshot::Sender<T>>>>,
}

impl<T> Clone for CheckedContinuation<T> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<T> std::fmt::Debug for CheckedContinuation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckedContinuation")
            .field("resumed", &self.is_resumed())
            .finish()
    }
}

impl<T> CheckedContinuation<T> {
    fn new(sender: oneshot::Sender<T>) -> Self {
        Self {
            sender: Arc::new(Mutex::new(Some(sender))),
        }
    }

    /// Resumes the suspended caller with `value`.
    ///
    /// # Panics
    /// In debug builds, when the continuation was already resumed.
    pub fn resume(&self, value: T) {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match sender {
            Some(sender) => {
                if sender.send(value).is_err() {
                    debug!("continuation resumed after the awaiting task went away");
                }
            }
            None if cfg!(debug_assertions) => {
                panic!("CheckedContinuation resumed more than once");
            }
            None => warn!("continuation resumed more than once, value discarded"),
        }
    }

    pub fn is_resumed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

/// Runs `body` with a fresh continuation and waits for it to be resumed.
///
/// # Example
/// ```rust
/// use zakkro::runtime::with_checked_continuation;
///
/// fn fetch(id: u32, completion: impl FnOnce(Option<String>)) {
///     completion(Some(format!("item {id}")));
/// }
///
/// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// let value = rt.block_on(with_checked_continuation(|continuation| {
///     fetch(7, move |object| continuation.resume(object))
/// }));
/// assert_eq!(value.as_deref(), Some("item 7"));
/// ```
pub async fn with_checked_continuation<T, F>(body: F) -> T
where
    F: FnOnce(CheckedContinuation<T>),
{
    let (sender, receiver) = oneshot::channel();
    body(CheckedContinuation::new(sender));
    match receiver.await {
        Ok(value) => value,
        Err(_) => {
            warn!("continuation dropped without being resumed, caller stays suspended");
            std::future::pending().await
        }
    }
}
