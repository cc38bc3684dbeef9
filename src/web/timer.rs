//! Promise-based sleep, used to put a deadline on asset loads.

use futures::future::{select, Either};
use std::future::Future;
use wasm_bindgen_futures::JsFuture;

/// Resolves after `ms` milliseconds. Never resolves without a window.
pub fn sleep(ms: u32) -> JsFuture {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(w) = web_sys::window() {
            let _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
        }
    });
    JsFuture::from(promise)
}

/// Runs `fut` against a timer. `None` when the timer won.
pub async fn with_timeout<F: Future>(fut: F, ms: u32) -> Option<F::Output> {
    match select(Box::pin(fut), Box::pin(sleep(ms))).await {
        Either::Left((out, _)) => Some(out),
        Either::Right(_) => None,
    }
}
