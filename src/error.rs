//! Errors returned by the pool

use std::fmt;

use crate::Closeable;

/// Error returned by [`ResourcePool`](crate::ResourcePool) operations
///
/// `E` is the error type of the pooled resource. Errors raised by the factory
/// or by [`Closeable::close`] are passed through unchanged as
/// [`Error::Resource`].
#[derive(Debug, thiserror::Error)]
pub enum Error<E> {
    /// The pool was constructed with a capacity of zero
    #[error("pool capacity must be greater than zero")]
    CapacityInvalid,

    /// The warm-up count exceeds the capacity
    #[error("cannot initialise {len} resources in a pool of capacity {capacity}")]
    InitInvalid {
        /// Requested number of warm-up resources
        len: usize,
        /// Requested capacity
        capacity: usize,
    },

    /// The queue overflowed while filling the warm-up resources
    #[error("pool overflowed while initialising resources")]
    InitFailed,

    /// The pool is closed, or was closed more than once
    #[error("pool is closed")]
    Closed,

    /// The cancellation signal was active when the operation started
    #[error("operation was cancelled")]
    Cancelled,

    /// The factory failed to create a resource or a resource failed to release
    #[error(transparent)]
    Resource(E),
}

impl<E> Error<E> {
    /// Returns `true` if this is [`Error::Closed`]
    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Closed)
    }

    /// Returns `true` if this is [`Error::Cancelled`]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Returns the resource error, if any
    pub fn into_resource_error(self) -> Option<E> {
        match self {
            Error::Resource(err) => Some(err),
            _ => None,
        }
    }
}

/// Error returned by [`ResourcePool::put`](crate::ResourcePool::put)
///
/// If the put was cancelled the resource was never enqueued nor released, and
/// it is handed back through [`PutError::into_resource`]. In every other case
/// the resource has already been released.
pub struct PutError<R: Closeable> {
    error: Error<R::Error>,
    resource: Option<R>,
}

impl<R: Closeable> PutError<R> {
    pub(crate) fn cancelled(resource: R) -> Self {
        Self {
            error: Error::Cancelled,
            resource: Some(resource),
        }
    }

    pub(crate) fn closed() -> Self {
        Self {
            error: Error::Closed,
            resource: None,
        }
    }

    /// The reason the resource was not enqueued
    pub fn error(&self) -> &Error<R::Error> {
        &self.error
    }

    /// Discards the returned resource, if any, and keeps the error
    pub fn into_error(self) -> Error<R::Error> {
        self.error
    }

    /// Takes back the resource that was not enqueued
    ///
    /// Only a cancelled put returns the resource, so the caller is
    /// responsible for releasing it.
    pub fn into_resource(self) -> Option<R> {
        self.resource
    }
}

impl<R: Closeable> fmt::Debug for PutError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PutError")
            .field("error", &self.error)
            .field("returned", &self.resource.is_some())
            .finish()
    }
}

impl<R: Closeable> fmt::Display for PutError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<R: Closeable> std::error::Error for PutError<R> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}
