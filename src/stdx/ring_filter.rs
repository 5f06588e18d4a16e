//! Ring buffer that feeds every newly stored run of items through a filter.
//!
//! `RingFilter` turns a [`RingBuffer`] into a pipeline stage with bounded,
//! reusable working memory: input is committed to storage one lap at a time
//! and each committed run is handed to the filter before the write returns.
//! The filter usually transforms the run and forwards the result to a
//! downstream buffer the caller owns, so the stage itself never retains more
//! than `capacity` items of raw input.
//!
//! # Invariants
//! - Every item written through `write`, `write_item` or `read_from` reaches
//!   the filter exactly once, in input order, as part of a contiguous slice
//!   of storage.
//! - The filter sees a run only after it is committed: cursors and eviction
//!   already reflect it.
//! - A filter error aborts the operation at that run. Runs already handed to
//!   the filter (including the rejected one) stay committed.
//! - Read-side behaviour is exactly that of [`RingBuffer`].

use std::fmt;

use tracing::{trace, warn};

use super::ring_buffer::RingBuffer;
use crate::error::{BoxError, RingError};
use crate::stream::{ItemRead, ItemWrite, Whence};

/// Transform applied to each committed run of items.
///
/// Implemented for every `FnMut(&[T]) -> Result<(), E>` whose error converts
/// into a [`BoxError`].
pub trait Filter<T> {
    fn apply(&mut self, items: &[T]) -> Result<(), BoxError>;
}

impl<T, F, E> Filter<T> for F
where
    F: FnMut(&[T]) -> Result<(), E>,
    E: Into<BoxError>,
{
    #[inline]
    fn apply(&mut self, items: &[T]) -> Result<(), BoxError> {
        self(items).map_err(Into::into)
    }
}

/// Filter that accepts every run unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Passthrough;

impl<T> Filter<T> for Passthrough {
    #[inline]
    fn apply(&mut self, _items: &[T]) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Fixed-capacity ring buffer with a per-write filter callback.
pub struct RingFilter<T, F = Passthrough> {
    ring: RingBuffer<T>,
    filter: F,
}

impl<T: Clone + Default> RingFilter<T, Passthrough> {
    /// Creates a filter stage with the no-op [`Passthrough`] filter.
    pub fn new(capacity: usize) -> Self {
        Self::with_filter(capacity, Passthrough)
    }
}

impl<T, F> RingFilter<T, F>
where
    T: Clone + Default,
    F: Filter<T>,
{
    /// Creates a filter stage; a capacity of zero selects the default.
    pub fn with_filter(capacity: usize, filter: F) -> Self {
        Self {
            ring: RingBuffer::new(capacity),
            filter,
        }
    }

    /// Appends `items` lap by lap, filtering each committed run.
    ///
    /// Returns `items.len()` on success. Unlike [`RingBuffer::write`], input
    /// longer than the capacity is not shortcut to its suffix: every item is
    /// stored in turn so that the filter observes it.
    pub fn write(&mut self, items: &[T]) -> Result<usize, RingError> {
        let Self { ring, filter } = self;
        ring.write_laps(items, |run| dispatch(filter, run))
    }

    /// Appends a single item and filters it.
    pub fn write_item(&mut self, item: T) -> Result<(), RingError> {
        self.write(std::slice::from_ref(&item)).map(|_| ())
    }

    /// Pulls items from `src` until end of data, filtering each committed run.
    pub fn read_from<R>(&mut self, src: &mut R) -> Result<usize, RingError>
    where
        R: ItemRead<T> + ?Sized,
    {
        let Self { ring, filter } = self;
        ring.read_from_with(src, |run| dispatch(filter, run))
    }

    pub fn read(&mut self, dest: &mut [T]) -> Result<usize, RingError> {
        self.ring.read(dest)
    }

    pub fn read_item(&mut self) -> Result<T, RingError> {
        self.ring.read_item()
    }

    pub fn value(&mut self) -> Vec<T> {
        self.ring.value()
    }

    pub fn next(&mut self, n: usize) -> Vec<T> {
        self.ring.next(n)
    }

    pub fn unread_item(&mut self) -> Result<(), RingError> {
        self.ring.unread_item()
    }

    pub fn truncate(&mut self, n: usize) {
        self.ring.truncate(n);
    }

    pub fn reset(&mut self) {
        self.ring.reset();
    }

    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64, RingError> {
        self.ring.seek(offset, whence)
    }

    pub fn seek_raw(&mut self, offset: i64, whence: i32) -> Result<u64, RingError> {
        self.ring.seek_raw(offset, whence)
    }

    pub fn read_items<P>(&mut self, predicate: P) -> Result<Vec<T>, RingError>
    where
        P: FnMut(&T) -> bool,
    {
        self.ring.read_items(predicate)
    }

    pub fn write_to<W>(&mut self, dst: &mut W) -> Result<usize, RingError>
    where
        W: ItemWrite<T> + ?Sized,
    {
        self.ring.write_to(dst)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    #[inline]
    pub fn cap(&self) -> usize {
        self.ring.cap()
    }

    pub fn segments(&self) -> (&[T], &[T]) {
        self.ring.segments()
    }

    pub fn read_position(&self) -> usize {
        self.ring.read_position()
    }

    pub fn write_position(&self) -> usize {
        self.ring.write_position()
    }

    /// Read-only view of the underlying ring.
    pub fn as_ring(&self) -> &RingBuffer<T> {
        &self.ring
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut F {
        &mut self.filter
    }

    pub fn into_parts(self) -> (RingBuffer<T>, F) {
        (self.ring, self.filter)
    }
}

fn dispatch<T, F>(filter: &mut F, run: &[T]) -> Result<(), RingError>
where
    F: Filter<T>,
{
    trace!(items = run.len(), "ring filter dispatching committed run");
    filter.apply(run).map_err(|err| {
        warn!(items = run.len(), error = %err, "ring filter rejected run");
        RingError::FilterRejected(err)
    })
}

impl<T: fmt::Debug, F> fmt::Debug for RingFilter<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingFilter")
            .field("ring", &self.ring)
            .finish_non_exhaustive()
    }
}

impl<T, F> ItemRead<T> for RingFilter<T, F>
where
    T: Clone + Default,
    F: Filter<T>,
{
    #[inline]
    fn read_chunk(&mut self, buf: &mut [T]) -> Result<usize, RingError> {
        self.read(buf)
    }
}

impl<T, F> ItemWrite<T> for RingFilter<T, F>
where
    T: Clone + Default,
    F: Filter<T>,
{
    #[inline]
    fn write_chunk(&mut self, items: &[T]) -> Result<usize, RingError> {
        self.write(items)
    }
}
