//! Hooks for watching what a pool does with its resources

use std::{error::Error, fmt};

/// Something that happened inside a [`ResourcePool`](crate::ResourcePool)
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub enum Event<'a> {
    /// The factory created a new resource
    Created,

    /// The factory failed to create a resource
    CreateFailed(&'a (dyn Error + 'static)),

    /// An idle resource was handed out
    Reused,

    /// A returned resource was enqueued
    Returned,

    /// The oldest idle resource was released to make room for a returned one
    Evicted,

    /// A returned resource was released instead of enqueued
    Discarded,

    /// An operation observed an active cancellation signal
    Cancelled,

    /// Releasing a resource failed
    ReleaseFailed(&'a (dyn Error + 'static)),

    /// The pool was closed and its idle resources released
    Closed {
        /// Number of idle resources that were released
        drained: usize,
    },
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Created => f.write_str("created resource"),
            Event::CreateFailed(err) => write!(f, "failed to create resource: {err}"),
            Event::Reused => f.write_str("reused idle resource"),
            Event::Returned => f.write_str("returned resource to pool"),
            Event::Evicted => f.write_str("evicted oldest idle resource"),
            Event::Discarded => f.write_str("discarded returned resource"),
            Event::Cancelled => f.write_str("operation cancelled"),
            Event::ReleaseFailed(err) => write!(f, "failed to release resource: {err}"),
            Event::Closed { drained } => write!(f, "closed pool, released {drained} resources"),
        }
    }
}

/// Receives [`Event`]s from a pool
///
/// Events are delivered while the pool's lock is held, so an observer must not
/// call back into the pool that notifies it.
pub trait Observer: Send + Sync {
    /// Called for every event
    fn on_event(&self, event: &Event<'_>);
}

/// An observer that ignores everything. This is the default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn on_event(&self, _event: &Event<'_>) {}
}

impl<F> Observer for F
where
    F: Fn(&Event<'_>) + Send + Sync,
{
    fn on_event(&self, event: &Event<'_>) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;

    fn recorder(seen: &Mutex<Vec<String>>) -> impl Fn(&Event<'_>) + Send + Sync + '_ {
        move |event| seen.lock().push(event.to_string())
    }

    #[test]
    fn closures_are_observers() {
        let seen = Mutex::new(Vec::new());
        let observer = recorder(&seen);

        observer.on_event(&Event::Created);
        observer.on_event(&Event::Closed { drained: 2 });

        assert_eq!(
            *seen.lock(),
            ["created resource", "closed pool, released 2 resources"]
        );
    }

    #[test]
    fn release_failure_displays_cause() {
        let err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe");
        let event = Event::ReleaseFailed(&err);
        assert_eq!(event.to_string(), "failed to release resource: broken pipe");
    }
}
