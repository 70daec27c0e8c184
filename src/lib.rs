//! A bounded, thread-safe pool of reusable resources
//!
//! A [`ResourcePool`] keeps up to a fixed number of idle resources, such as
//! database connections, and hands them out again instead of creating new
//! ones. It never waits: [`ResourcePool::get`] returns an idle resource or asks
//! the factory for a new one, and [`ResourcePool::put`] makes room for a
//! returned resource by releasing the one that has been idle the longest.
//!
//! Resources only need to implement [`Closeable`].
//!
//! # Example
//!
//! ```
//! use std::{io, sync::Arc, thread};
//! use respool::{Closeable, ResourcePool};
//!
//! struct Conn;
//!
//! impl Closeable for Conn {
//!     type Error = io::Error;
//!
//!     fn close(self) -> io::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let pool = Arc::new(ResourcePool::new(|| Ok(Conn), 2, 4).unwrap());
//!
//! let workers: Vec<_> = (0..4)
//!     .map(|_| {
//!         let pool = pool.clone();
//!         thread::spawn(move || {
//!             let conn = pool.get(()).unwrap();
//!             pool.put(conn, ()).unwrap();
//!         })
//!     })
//!     .collect();
//! for worker in workers {
//!     worker.join().unwrap();
//! }
//!
//! assert!(pool.len() <= pool.cap());
//! pool.close().unwrap();
//! ```
//!
//! # Features
//!
//! - `log`: report pool activity through the `log` crate
//! - `tracing`: report pool activity through the `tracing` crate
//! - `serde`: (de)serialize [`PoolConfig`]

#[macro_use]
mod cfg;

mod cancel;
mod config;
mod error;
mod internal;
mod observer;
mod pool;

#[cfg(test)]
mod test_util;

pub use cancel::{Cancel, CancelToken, Cancelled};
pub use config::PoolConfig;
pub use error::{Error, PutError};
pub use observer::{Event, NoopObserver, Observer};
pub use pool::{Builder, Closeable, ResourcePool};
