//! Cooperative cancellation signals
//!
//! The pool never waits, so a signal is only checked once when an operation
//! starts. Anything that can answer "has this been cancelled?" can be passed to
//! [`ResourcePool::get`](crate::ResourcePool::get) and
//! [`ResourcePool::put`](crate::ResourcePool::put). Use `()` when there is
//! nothing to cancel.

use std::{
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    task::{Context, Poll},
    time::Instant,
};

use futures_channel::oneshot::{self, Receiver, Sender};
use futures_util::FutureExt;
use parking_lot::Mutex;

/// A checkable cancellation signal
pub trait Cancel {
    /// Returns `true` once the signal is active
    fn is_cancelled(&self) -> bool;
}

/// Never cancelled
impl Cancel for () {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl Cancel for bool {
    fn is_cancelled(&self) -> bool {
        *self
    }
}

impl Cancel for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

/// A deadline. Cancelled once the current time reaches it.
impl Cancel for Instant {
    fn is_cancelled(&self) -> bool {
        Instant::now() >= *self
    }
}

impl<C: Cancel> Cancel for Option<C> {
    fn is_cancelled(&self) -> bool {
        self.as_ref().map_or(false, Cancel::is_cancelled)
    }
}

impl<C: Cancel + ?Sized> Cancel for &C {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl<C: Cancel + ?Sized> Cancel for Arc<C> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

#[derive(Debug, Default)]
struct Shared {
    cancelled: AtomicBool,

    /// One sender per pending [`Cancelled`] future
    waiters: Mutex<Vec<Sender<()>>>,
}

/// A cloneable cancellation flag
///
/// All clones observe the same state. Cancelling is permanent.
///
/// # Example
///
/// ```
/// use respool::{Cancel, CancelToken};
///
/// let token = CancelToken::new();
/// let child = token.clone();
/// assert!(!child.is_cancelled());
///
/// token.cancel();
/// assert!(child.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    shared: Arc<Shared>,
}

impl CancelToken {
    /// Creates a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates the signal and wakes every pending [`Cancelled`] future
    pub fn cancel(&self) {
        if self.shared.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }

        let waiters = std::mem::take(&mut *self.shared.waiters.lock());
        for tx in waiters {
            // The future may have been dropped already.
            let _ = tx.send(());
        }
    }

    /// Returns `true` once [`cancel`](Self::cancel) was called on any clone
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }

    /// Returns a future that resolves once the token is cancelled
    ///
    /// # Example
    ///
    /// ```
    /// use respool::CancelToken;
    ///
    /// let token = CancelToken::new();
    /// let cancelled = token.cancelled();
    /// token.cancel();
    /// futures::executor::block_on(cancelled);
    /// ```
    pub fn cancelled(&self) -> Cancelled {
        let (tx, rx) = oneshot::channel();

        {
            let mut waiters = self.shared.waiters.lock();
            // Checked under the lock so a concurrent `cancel` cannot miss us.
            if self.is_cancelled() {
                let _ = tx.send(());
            } else {
                waiters.retain(|tx| !tx.is_canceled());
                waiters.push(tx);
            }
        }

        Cancelled {
            rx,
            _token: self.clone(),
        }
    }
}

impl Cancel for CancelToken {
    fn is_cancelled(&self) -> bool {
        CancelToken::is_cancelled(self)
    }
}

/// A future that resolves when its [`CancelToken`] is cancelled
#[derive(Debug)]
pub struct Cancelled {
    rx: Receiver<()>,

    /// Keeps the senders alive for as long as the future exists
    _token: CancelToken,
}

impl Future for Cancelled {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.rx.poll_unpin(cx) {
            Poll::Ready(_) => Poll::Ready(()),
            Poll::Pending => Poll::Pending,
        }
    }
}
