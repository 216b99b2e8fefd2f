//! Delay-and-collapse wrapper for a unary async callback.
//!
//! Each [`Debounced::call`] schedules the callback to run after the wait
//! has elapsed with no further call; a call during the wait window discards
//! the pending run and restarts the timer, so only the last argument of a
//! burst survives. At most one pending run is ever outstanding.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::task::JoinHandle;

type Callback<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;

pub struct Debounced<T> {
    callback: Callback<T>,
    wait: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debounced<T> {
    pub fn new<F, Fut>(wait: Duration, callback: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            callback: Arc::new(move |arg| callback(arg).boxed()),
            wait,
            pending: Mutex::new(None),
        }
    }

    /// Schedules the callback with `arg`, discarding any pending run.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call(&self, arg: T) {
        let callback = Arc::clone(&self.callback);
        let wait = self.wait;

        let mut pending = self.pending.lock().expect("debounce lock poisoned");
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            callback(arg).await;
        }));
    }

    /// Clears any pending scheduled run without invoking it. Safe to call
    /// when nothing is pending.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().expect("debounce lock poisoned").take() {
            handle.abort();
        }
    }
}
