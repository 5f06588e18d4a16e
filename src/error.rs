//! Error taxonomy for ring buffer operations.
//!
//! A single enum covers the buffer surface because every operation shares the
//! same cursor state; the variants map one-to-one onto the failure modes the
//! buffer can observe. The enum is `#[non_exhaustive]`, so consumers should
//! include a fallback match arm.
//!
//! # Design Notes
//! - `EndOfData` is a sentinel, not a fault. `read_from` and `write_to` swallow
//!   it; the single-shot reads return it on an empty buffer.
//! - Errors raised by external collaborators (filters, producers, consumers)
//!   are boxed and kept as the `source()`, so callers can downcast to the
//!   original type.
//! - Cursor-validation errors (`InvalidCursorOperation`, `InvalidWhence`,
//!   `NegativePosition`) are returned before any state is touched.

use std::error::Error as StdError;
use std::io;

/// Boxed error produced by a filter, producer or consumer.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors from ring buffer and ring filter operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RingError {
    /// Natural end of the data stream.
    #[error("no more data")]
    EndOfData,
    /// `unread_item` called without a preceding successful consumption.
    #[error("invalid cursor operation: nothing to unread")]
    InvalidCursorOperation,
    /// Integer whence value outside `0..=2`.
    #[error("invalid whence value: {0}")]
    InvalidWhence(i32),
    /// Seek target is negative before wrapping.
    #[error("negative seek position: {position}")]
    NegativePosition { position: i64 },
    /// A producer or consumer reported more items than it was offered.
    #[error("item count out of range: reported {count}, offered {len}")]
    ItemCountOutOfRange { count: usize, len: usize },
    /// A producer kept returning zero items without signalling end of data.
    #[error("producer made no progress after {attempts} consecutive empty reads")]
    NoProgress { attempts: usize },
    /// The ring filter callback rejected a run of items.
    #[error("filter rejected items: {0}")]
    FilterRejected(#[source] BoxError),
    /// An external producer or consumer failed.
    #[error("stream error: {0}")]
    Stream(#[source] BoxError),
    /// I/O failure inside one of the `std::io` adapters.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RingError {
    /// Wraps a filter failure, keeping the original error as the source.
    pub fn filter<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::FilterRejected(err.into())
    }

    /// Wraps a producer or consumer failure.
    pub fn stream<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Stream(err.into())
    }

    /// Returns true for the end-of-data sentinel.
    #[inline]
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, Self::EndOfData)
    }
}

impl From<RingError> for io::Error {
    fn from(err: RingError) -> Self {
        match err {
            RingError::EndOfData => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            RingError::NegativePosition { .. } | RingError::InvalidWhence(_) => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
            RingError::Io(inner) => inner,
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}
