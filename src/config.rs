//! Construction parameters

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Error;

/// Sizing of a [`ResourcePool`](crate::ResourcePool)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoolConfig {
    /// Number of resources created up front
    #[cfg_attr(feature = "serde", serde(default))]
    pub initial_len: usize,

    /// Maximum number of idle resources the pool holds
    pub capacity: usize,
}

impl PoolConfig {
    /// Creates a config with `initial_len` warm resources and room for `capacity` idle ones
    pub fn new(initial_len: usize, capacity: usize) -> Self {
        Self {
            initial_len,
            capacity,
        }
    }

    /// Checks that the capacity is positive and the warm-up count fits in it
    pub fn validate<E>(&self) -> Result<(), Error<E>> {
        if self.capacity == 0 {
            return Err(Error::CapacityInvalid);
        }
        if self.initial_len > self.capacity {
            return Err(Error::InitInvalid {
                len: self.initial_len,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}
