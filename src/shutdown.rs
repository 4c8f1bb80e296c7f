//! Cooperative shutdown signalling.
//!
//! A [`ShutdownSignal`] is cloned into every component that awaits I/O. When
//! the process is asked to stop, in-flight waits resolve with
//! [`Error::Cancelled`](crate::Error::Cancelled) instead of running to
//! completion, which leaves the output file exactly as the last fully
//! written page left it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    requested: AtomicBool,
    notify: Notify,
}

/// Shared shutdown flag; clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

impl ShutdownSignal {
    /// Create a signal that has not been triggered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Wakes every current waiter exactly once.
    pub fn request_shutdown(&self) {
        if !self.inner.requested.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Whether shutdown has been requested.
    pub fn is_shutdown_requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    /// Resolve once shutdown is requested. Returns immediately if already set.
    pub async fn cancelled(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent request is not missed
        notified.as_mut().enable();
        if self.is_shutdown_requested() {
            return;
        }
        notified.await;
    }

    /// Trigger this signal when the process receives Ctrl+C.
    pub fn install_ctrl_c_handler(&self) {
        let signal = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, cancelling the current request");
                signal.request_shutdown();
            }
        });
    }
}
