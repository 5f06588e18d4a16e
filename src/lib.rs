//! Fixed-capacity ring buffer with overwrite-on-full eviction, and a filtering
//! variant that turns it into a bounded pipeline stage.
//!
//! ## Scope
//! [`RingBuffer`] accepts a continuous stream of items and retains at most
//! `capacity` unread items, silently evicting the oldest ones when new writes
//! would overrun them. [`RingFilter`] adds a caller-supplied [`Filter`] that
//! is invoked with every contiguous run of newly stored items, so a window of
//! live input can be transformed (for example fixed-point samples decoded to
//! floating point) without retaining more than `capacity` raw items.
//!
//! ## Key invariants
//! - Capacity is fixed at construction; a capacity of zero selects
//!   [`DEFAULT_CAPACITY`].
//! - Writes never fail on a plain ring buffer; eviction is a policy, not a
//!   fault.
//! - The unread region is always one or two contiguous storage runs, and
//!   every bulk copy is done in at most two contiguous passes.
//! - Malformed cursor operations (`seek`, `unread_item`) leave the buffer
//!   exactly as it was.
//!
//! ## Notable entry points
//! - [`RingBuffer`]: read / write / seek / scan surface.
//! - [`RingFilter`], [`Filter`], [`Passthrough`]: filtering pipeline stage.
//! - [`ItemRead`] / [`ItemWrite`]: producer and consumer contracts used by
//!   `read_from` / `write_to`, with [`IoSource`] / [`IoSink`] bridging
//!   `std::io` byte streams.
//! - [`RingConfig`]: serde-described construction settings.
//! - [`RingError`]: error taxonomy; [`RingError::EndOfData`] is the
//!   end-of-data sentinel.
//!
//! ## Threading
//! Nothing here is synchronized. Callers that share a buffer across threads
//! must serialize access themselves.
//!
//! ```
//! use ringstage::RingBuffer;
//!
//! let mut ring = RingBuffer::<u8>::new(5);
//! ring.write(b"some string");
//! assert_eq!(ring.len(), 5);
//! assert_eq!(ring.value(), b"tring");
//! ```

pub mod config;
pub mod error;
pub mod stdx;
pub mod stream;

pub use config::{RingConfig, DEFAULT_CAPACITY, MAX_CONSECUTIVE_EMPTY_READS};
pub use error::{BoxError, RingError};
pub use stdx::{Filter, Passthrough, RingBuffer, RingFilter};
pub use stream::{IoSink, IoSource, ItemRead, ItemWrite, Whence};
