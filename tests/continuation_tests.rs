//! The runtime contract behind code generated by `@AddAsync`.

use std::time::Duration;

use zakkro::runtime::{with_checked_continuation, CheckedContinuation};

/// A callback API in the shape `@AddAsync` accepts.
fn lookup(key: String, completion: impl FnOnce(Option<String>) + Send + 'static) {
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(5));
        completion(if key.is_empty() { None } else { Some(key.to_uppercase()) });
    });
}

async fn lookup_async(key: String) -> Option<String> {
    with_checked_continuation(|continuation| {
        lookup(key, move |object| continuation.resume(object));
    })
    .await
}

#[tokio::test(flavor = "multi_thread")]
async fn async_wrapper_returns_callback_value() {
    assert_eq!(lookup_async("ski".into()).await.as_deref(), Some("SKI"));
    assert_eq!(lookup_async(String::new()).await, None);
}

#[tokio::test]
async fn callback_that_never_fires_keeps_caller_suspended() {
    let waiting = with_checked_continuation(|continuation: CheckedContinuation<i32>| {
        drop(continuation);
    });
    assert!(tokio::time::timeout(Duration::from_millis(20), waiting)
        .await
        .is_err());
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "resumed more than once")]
fn second_resume_panics_in_debug_builds() {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    rt.block_on(with_checked_continuation(|continuation| {
        continuation.resume("first");
        continuation.resume("second");
    }));
}
