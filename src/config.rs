//! Construction-time configuration for ring buffers.
//!
//! Capacity is the only tunable: the buffer never resizes, so everything else
//! follows from it. The config is serde-described so it can be embedded in a
//! larger pipeline configuration file.

use serde::{Deserialize, Serialize};

use crate::stdx::{Filter, RingBuffer, RingFilter};

/// Capacity used when a non-positive capacity is requested.
pub const DEFAULT_CAPACITY: usize = 256;

/// Maximum number of consecutive `Ok(0)` reads `read_from` tolerates from a
/// producer before failing with `NoProgress`.
pub const MAX_CONSECUTIVE_EMPTY_READS: usize = 100;

/// Replaces a zero capacity with [`DEFAULT_CAPACITY`].
#[inline]
pub const fn coerce_capacity(capacity: usize) -> usize {
    if capacity == 0 {
        DEFAULT_CAPACITY
    } else {
        capacity
    }
}

/// Ring buffer configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Number of item slots. `0` means [`DEFAULT_CAPACITY`].
    pub capacity: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl RingConfig {
    pub const fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Builds a config from a signed request; `<= 0` selects the default.
    pub fn from_signed(capacity: i64) -> Self {
        let capacity = usize::try_from(capacity).unwrap_or(0);
        Self {
            capacity: coerce_capacity(capacity),
        }
    }

    /// Capacity after coercion; always `> 0`.
    #[inline]
    pub const fn effective_capacity(&self) -> usize {
        coerce_capacity(self.capacity)
    }

    pub fn build<T: Clone + Default>(&self) -> RingBuffer<T> {
        RingBuffer::new(self.effective_capacity())
    }

    pub fn build_filter<T, F>(&self, filter: F) -> RingFilter<T, F>
    where
        T: Clone + Default,
        F: Filter<T>,
    {
        RingFilter::with_filter(self.effective_capacity(), filter)
    }
}
