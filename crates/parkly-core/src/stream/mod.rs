// ── Reactive session streams ──
//
// Subscription types for consuming identity changes from the SessionStore.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Identity;

/// Snapshot type published by the session store.
pub type IdentitySnapshot = Option<Arc<Identity>>;

/// A subscription to the current identity.
///
/// Provides point-in-time access and change notification via
/// [`changed()`](Self::changed), or a `Stream` via the `into_*` adapters.
pub struct IdentityStream {
    current: IdentitySnapshot,
    receiver: watch::Receiver<IdentitySnapshot>,
}

impl IdentityStream {
    pub(crate) fn new(receiver: watch::Receiver<IdentitySnapshot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The identity captured at creation time or at the last `changed()`.
    pub fn current(&self) -> &IdentitySnapshot {
        &self.current
    }

    /// The latest identity, which may differ from [`current()`](Self::current).
    pub fn latest(&self) -> IdentitySnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. `None` once the store is dropped.
    pub async fn changed(&mut self) -> Option<IdentitySnapshot> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current.clone_from(&snap);
        Some(snap)
    }

    /// Yields the current identity, then every change.
    pub fn into_stream(self) -> IdentityWatchStream {
        IdentityWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }

    /// Yields the derived "is authenticated" flag, then every change of it.
    pub fn into_authenticated(self) -> AuthenticatedStream {
        AuthenticatedStream {
            inner: WatchStream::new(self.receiver),
            last: None,
        }
    }
}

/// `Stream` of identity snapshots backed by a `watch::Receiver`.
pub struct IdentityWatchStream {
    inner: WatchStream<IdentitySnapshot>,
}

impl Stream for IdentityWatchStream {
    type Item = IdentitySnapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

/// `Stream` of the authenticated flag. Consecutive equal values are
/// collapsed, so replacing one identity with another yields nothing.
pub struct AuthenticatedStream {
    inner: WatchStream<IdentitySnapshot>,
    last: Option<bool>,
}

impl Stream for AuthenticatedStream {
    type Item = bool;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<bool>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(snap)) => {
                    let authenticated = snap.is_some();
                    if self.last != Some(authenticated) {
                        self.last = Some(authenticated);
                        return Poll::Ready(Some(authenticated));
                    }
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
