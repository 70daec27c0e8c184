//! A bounded pool of reusable resources

use std::fmt;

use parking_lot::Mutex;

use crate::{
    internal::BoundedQueue, Cancel, Error, Event, NoopObserver, Observer, PoolConfig, PutError,
};

/// A resource that can be managed by a [`ResourcePool`]
///
/// The pool never looks inside a resource. It only holds it and, when it has
/// no more use for it, releases it through [`close`](Closeable::close).
pub trait Closeable {
    /// Error raised when creating or releasing the resource
    type Error: std::error::Error + Send + Sync + 'static;

    /// Releases the resource
    fn close(self) -> Result<(), Self::Error>;
}

type Factory<R> = dyn Fn() -> Result<R, <R as Closeable>::Error> + Send + Sync;

/// Releases `resource` and reports a failure to the observer and the log.
fn release<R: Closeable>(resource: R, observer: &dyn Observer) -> Result<(), R::Error> {
    resource.close().map_err(|err| {
        diag!(warn, "failed to release resource: {}", err);
        observer.on_event(&Event::ReleaseFailed(&err));
        err
    })
}

/// State guarded by the pool's lock
struct State<R> {
    /// Idle resources, oldest first
    queue: BoundedQueue<R>,

    /// Once set, never cleared
    closed: bool,
}

impl<R: Closeable> State<R> {
    /// Marks the state closed and releases every idle resource.
    ///
    /// Every resource is released even if an earlier release failed. The first
    /// failure is returned and the rest are only logged.
    fn shut_down(&mut self, observer: &dyn Observer) -> Result<(), R::Error> {
        self.closed = true;

        let mut first_err = None;
        let mut drained = 0;
        for resource in self.queue.drain() {
            drained += 1;
            if let Err(err) = release(resource, observer) {
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }

        diag!(debug, "pool closed, released {} idle resources", drained);
        observer.on_event(&Event::Closed { drained });

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// A bounded, thread-safe pool of reusable resources
///
/// [`get`](Self::get) hands out an idle resource or creates a new one, and
/// [`put`](Self::put) takes it back. The capacity bounds the number of *idle*
/// resources only: the pool never waits for a resource to be returned. When a
/// resource is returned to a full pool, the one that has been idle the longest
/// is released to make room.
///
/// Every operation except [`cap`](Self::cap) runs under a single lock. Share
/// the pool between threads by wrapping it in an [`Arc`](std::sync::Arc).
///
/// # Example
///
/// ```
/// use std::convert::Infallible;
/// use respool::{Closeable, ResourcePool};
///
/// struct Conn(u32);
///
/// impl Closeable for Conn {
///     type Error = Infallible;
///
///     fn close(self) -> Result<(), Infallible> {
///         Ok(())
///     }
/// }
///
/// let pool = ResourcePool::new(|| Ok(Conn(0)), 2, 4).unwrap();
/// assert_eq!(pool.len(), 2);
///
/// let conn = pool.get(()).unwrap();
/// assert_eq!(pool.len(), 1);
///
/// pool.put(conn, ()).unwrap();
/// assert_eq!(pool.len(), 2);
///
/// pool.close().unwrap();
/// assert!(pool.is_closed());
/// ```
pub struct ResourcePool<R: Closeable> {
    /// Same as the queue's capacity, readable without the lock
    capacity: usize,

    factory: Box<Factory<R>>,

    observer: Box<dyn Observer>,

    state: Mutex<State<R>>,
}

impl<R: Closeable> ResourcePool<R> {
    /// Creates a pool that holds up to `capacity` idle resources and fills it
    /// with `initial_len` resources made by `factory`.
    ///
    /// Fails with [`Error::CapacityInvalid`] if `capacity` is zero and with
    /// [`Error::InitInvalid`] if `initial_len` is larger than `capacity`. If the
    /// factory fails while filling the pool, the resources created so far are
    /// released and the factory's error is returned.
    pub fn new<F>(factory: F, initial_len: usize, capacity: usize) -> Result<Self, Error<R::Error>>
    where
        F: Fn() -> Result<R, R::Error> + Send + Sync + 'static,
    {
        Self::with_config(factory, PoolConfig::new(initial_len, capacity))
    }

    /// Same as [`new`](Self::new) but takes the sizing as a [`PoolConfig`]
    pub fn with_config<F>(factory: F, config: PoolConfig) -> Result<Self, Error<R::Error>>
    where
        F: Fn() -> Result<R, R::Error> + Send + Sync + 'static,
    {
        Self::build(Box::new(factory), config, Box::new(NoopObserver))
    }

    /// Returns a [`Builder`] for a pool that also needs an [`Observer`]
    pub fn builder<F>(factory: F) -> Builder<R>
    where
        F: Fn() -> Result<R, R::Error> + Send + Sync + 'static,
    {
        Builder {
            factory: Box::new(factory),
            config: PoolConfig::new(0, 0),
            observer: Box::new(NoopObserver),
        }
    }

    fn build(
        factory: Box<Factory<R>>,
        config: PoolConfig,
        observer: Box<dyn Observer>,
    ) -> Result<Self, Error<R::Error>> {
        if let Err(err) = config.validate() {
            diag!(error, "invalid pool config {:?}: {}", config, err);
            return Err(err);
        }

        let mut queue = BoundedQueue::with_capacity(config.capacity);

        diag!(
            debug,
            "initialising {} of {} pool resources",
            config.initial_len,
            config.capacity
        );
        for _ in 0..config.initial_len {
            let resource = match factory() {
                Ok(resource) => resource,
                Err(err) => {
                    diag!(error, "failed to create initial resource: {}", err);
                    observer.on_event(&Event::CreateFailed(&err));
                    for resource in queue.drain() {
                        let _ = release(resource, &*observer);
                    }
                    return Err(Error::Resource(err));
                }
            };
            observer.on_event(&Event::Created);

            if let Err(resource) = queue.try_push(resource) {
                // `validate` guarantees the warm-up fits, so this is a bookkeeping bug.
                diag!(error, "pool overflowed while initialising resources");
                let _ = release(resource, &*observer);
                for resource in queue.drain() {
                    let _ = release(resource, &*observer);
                }
                return Err(Error::InitFailed);
            }
        }

        Ok(Self {
            capacity: queue.capacity(),
            factory,
            observer,
            state: Mutex::new(State {
                queue,
                closed: false,
            }),
        })
    }

    /// Returns the maximum number of idle resources
    pub fn cap(&self) -> usize {
        self.capacity
    }

    /// Returns the number of idle resources
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Returns `true` if there are no idle resources
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once the pool has been closed
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Takes a resource out of the pool.
    ///
    /// Returns the resource that has been idle the longest, or a new one from
    /// the factory if there are no idle resources. This never waits.
    ///
    /// Fails with [`Error::Cancelled`] if `cancel` is already active, with
    /// [`Error::Closed`] if the pool is closed, and with [`Error::Resource`] if
    /// the factory fails.
    pub fn get(&self, cancel: impl Cancel) -> Result<R, Error<R::Error>> {
        let mut state = self.state.lock();

        if cancel.is_cancelled() {
            diag!(debug, "get: cancelled");
            self.observer.on_event(&Event::Cancelled);
            return Err(Error::Cancelled);
        }

        if state.closed {
            diag!(debug, "get: pool is closed");
            return Err(Error::Closed);
        }

        if let Some(resource) = state.queue.pop() {
            diag!(trace, "get: reusing idle resource, {} left", state.queue.len());
            self.observer.on_event(&Event::Reused);
            return Ok(resource);
        }

        // The lock is still held so a concurrent `close` cannot interleave.
        match (self.factory)() {
            Ok(resource) => {
                diag!(trace, "get: created new resource");
                self.observer.on_event(&Event::Created);
                Ok(resource)
            }
            Err(err) => {
                diag!(warn, "get: failed to create resource: {}", err);
                self.observer.on_event(&Event::CreateFailed(&err));
                Err(Error::Resource(err))
            }
        }
    }

    /// Returns a resource to the pool.
    ///
    /// If the pool is full, the resource that has been idle the longest is
    /// released to make room. A returned resource is always either enqueued or
    /// released, except when `cancel` is already active: then the resource is
    /// handed back in the error and the caller stays responsible for it.
    ///
    /// If the pool is closed the resource is released and [`Error::Closed`] is
    /// returned. Release failures inside `put` are reported to the observer and
    /// the log only.
    pub fn put(&self, resource: R, cancel: impl Cancel) -> Result<(), PutError<R>> {
        let mut state = self.state.lock();

        if cancel.is_cancelled() {
            diag!(debug, "put: cancelled");
            self.observer.on_event(&Event::Cancelled);
            return Err(PutError::cancelled(resource));
        }

        if state.closed {
            diag!(debug, "put: pool is closed, releasing resource");
            self.observer.on_event(&Event::Discarded);
            let _ = release(resource, &*self.observer);
            return Err(PutError::closed());
        }

        let resource = match state.queue.try_push(resource) {
            Ok(()) => {
                diag!(trace, "put: enqueued, {} idle", state.queue.len());
                self.observer.on_event(&Event::Returned);
                return Ok(());
            }
            Err(resource) => resource,
        };

        if let Some(oldest) = state.queue.pop() {
            diag!(debug, "put: pool is full, releasing oldest idle resource");
            self.observer.on_event(&Event::Evicted);
            let _ = release(oldest, &*self.observer);
        }

        match state.queue.try_push(resource) {
            Ok(()) => {
                self.observer.on_event(&Event::Returned);
            }
            Err(resource) => {
                diag!(debug, "put: no room after eviction, releasing resource");
                self.observer.on_event(&Event::Discarded);
                let _ = release(resource, &*self.observer);
            }
        }
        Ok(())
    }

    /// Closes the pool and releases every idle resource.
    ///
    /// All idle resources are released even if some fail; the first failure is
    /// returned. Closing an already closed pool fails with [`Error::Closed`]
    /// and releases nothing. Either way the pool stays closed.
    pub fn close(&self) -> Result<(), Error<R::Error>> {
        let mut state = self.state.lock();

        if state.closed {
            diag!(debug, "close: pool already closed");
            return Err(Error::Closed);
        }

        state.shut_down(&*self.observer).map_err(Error::Resource)
    }
}

impl<R: Closeable> Drop for ResourcePool<R> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if !state.closed {
            // Failures were already reported by `release`.
            let _ = state.shut_down(&*self.observer);
        }
    }
}

impl<R: Closeable> fmt::Debug for ResourcePool<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ResourcePool")
            .field("capacity", &self.capacity)
            .field("len", &state.queue.len())
            .field("closed", &state.closed)
            .finish()
    }
}

/// Builds a [`ResourcePool`] with an [`Observer`]
///
/// Created by [`ResourcePool::builder`]. The capacity must be set before
/// [`build`](Builder::build), otherwise it fails with
/// [`Error::CapacityInvalid`].
///
/// # Example
///
/// ```
/// use std::io;
/// use respool::{Closeable, Event, ResourcePool};
///
/// struct Conn;
///
/// impl Closeable for Conn {
///     type Error = io::Error;
///
///     fn close(self) -> io::Result<()> {
///         Ok(())
///     }
/// }
///
/// let pool = ResourcePool::builder(|| Ok(Conn))
///     .initial_len(1)
///     .capacity(8)
///     .observer(|event: &Event<'_>| println!("{event}"))
///     .build()
///     .unwrap();
/// assert_eq!(pool.len(), 1);
/// ```
pub struct Builder<R: Closeable> {
    factory: Box<Factory<R>>,
    config: PoolConfig,
    observer: Box<dyn Observer>,
}

impl<R: Closeable> Builder<R> {
    /// Sets the number of resources created up front
    pub fn initial_len(mut self, initial_len: usize) -> Self {
        self.config.initial_len = initial_len;
        self
    }

    /// Sets the maximum number of idle resources
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Replaces both sizes with `config`
    pub fn config(mut self, config: PoolConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the observer that is notified of every [`Event`]
    pub fn observer<O>(mut self, observer: O) -> Self
    where
        O: Observer + 'static,
    {
        self.observer = Box::new(observer);
        self
    }

    /// Creates the pool, see [`ResourcePool::new`]
    pub fn build(self) -> Result<ResourcePool<R>, Error<R::Error>> {
        ResourcePool::build(self.factory, self.config, self.observer)
    }
}

impl<R: Closeable> fmt::Debug for Builder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
