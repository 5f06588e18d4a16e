//! Fixed-capacity ring buffer with overwrite-on-full eviction.
//!
//! The buffer accepts an unbounded stream of items and retains at most
//! `capacity` unread items. Writes never fail: when new items would overrun
//! unread data, the oldest unread items are discarded and the read cursor
//! slides forward with the write cursor.
//!
//! # Invariants
//! - `buf.len() == capacity > 0`; capacity never changes.
//! - `head < capacity` and `len <= capacity`.
//! - The unread region is `[head, head + len)` modulo capacity. The write
//!   cursor is derived as `(head + len) % capacity`, so `len == capacity` is
//!   the explicit "full" state and `read == write` is never ambiguous.
//! - `can_unread` is true only directly after an operation that consumed at
//!   least one item; every other mutation clears it. When it is true,
//!   `len < capacity` and the slot before `head` still holds the last
//!   consumed item.
//!
//! # Layout
//! Items live in a circular `Vec<T>`. The unread items are contiguous in
//! logical order but may wrap in storage; `segments()` exposes up to two
//! slices that, when concatenated, yield them in order. Every bulk copy in
//! and out of storage is done in at most two contiguous runs.
//!
//! # Edge cases
//! - A capacity of zero is replaced by [`DEFAULT_CAPACITY`].
//! - Writing `n >= capacity` items keeps only the last `capacity` of them,
//!   laid out starting at the current write cursor.
//! - Reading from an empty buffer yields [`RingError::EndOfData`] unless the
//!   destination is empty.
//!
//! # Threading
//! This type is not synchronized; it assumes a single owner.

use std::io;
use std::ops::Range;

use tracing::{debug, trace};

use crate::config::{coerce_capacity, DEFAULT_CAPACITY, MAX_CONSECUTIVE_EMPTY_READS};
use crate::error::RingError;
use crate::stream::{ItemRead, ItemWrite, Whence};

/// Fixed-capacity circular buffer that evicts the oldest unread items.
#[derive(Clone, Debug)]
pub struct RingBuffer<T> {
    buf: Vec<T>,
    // Read cursor.
    head: usize,
    // Unread item count; `len == buf.len()` means full.
    len: usize,
    can_unread: bool,
}

impl<T: Clone + Default> RingBuffer<T> {
    /// Creates an empty buffer with `capacity` zero-valued slots.
    ///
    /// A capacity of zero is replaced by [`DEFAULT_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = coerce_capacity(capacity);
        Self {
            buf: vec![T::default(); capacity],
            head: 0,
            len: 0,
            can_unread: false,
        }
    }

    /// Returns the fixed number of slots.
    #[inline]
    pub fn cap(&self) -> usize {
        self.buf.len()
    }

    /// Returns the number of unread items.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.buf.len()
    }

    /// Storage index of the next unread item.
    #[inline]
    pub fn read_position(&self) -> usize {
        self.head
    }

    /// Storage index of the next write slot.
    #[inline]
    pub fn write_position(&self) -> usize {
        (self.head + self.len) % self.buf.len()
    }

    /// Returns the unread items as up to two slices in logical order.
    ///
    /// The second slice is non-empty only when the unread region wraps. The
    /// slices are valid until the buffer is mutated.
    pub fn segments(&self) -> (&[T], &[T]) {
        if self.len == 0 {
            return (&[], &[]);
        }
        let cap = self.buf.len();
        let start = self.head;
        if self.len <= cap - start {
            (&self.buf[start..start + self.len], &[])
        } else {
            let first = cap - start;
            (&self.buf[start..], &self.buf[..(self.len - first)])
        }
    }

    /// Appends `items`, evicting the oldest unread items on overflow.
    ///
    /// Always accepts the whole input and returns `items.len()`. If
    /// `items.len() >= capacity`, only the last `capacity` items are retained
    /// and the buffer ends up full with `read == write`.
    ///
    /// Complexity: O(n) for `n = items.len()`.
    pub fn write(&mut self, items: &[T]) -> usize {
        let n = items.len();
        if n == 0 {
            return 0;
        }
        self.can_unread = false;

        let cap = self.buf.len();
        let tail = self.write_position();

        if n >= cap {
            // Only the suffix fits; lay it out from the write cursor so the
            // cursor itself does not move.
            let suffix = &items[n - cap..];
            let first = cap - tail;
            self.buf[tail..].clone_from_slice(&suffix[..first]);
            self.buf[..tail].clone_from_slice(&suffix[first..]);
            if self.len > 0 {
                trace!(evicted = self.len, capacity = cap, "ring buffer replaced all unread items");
            }
            self.head = tail;
            self.len = cap;
            return n;
        }

        let first = (cap - tail).min(n);
        self.buf[tail..tail + first].clone_from_slice(&items[..first]);
        if n > first {
            self.buf[..(n - first)].clone_from_slice(&items[first..]);
        }
        self.advance_write(n);
        n
    }

    /// Appends a single item; when full, the oldest unread item is evicted.
    pub fn write_item(&mut self, item: T) {
        self.can_unread = false;
        let tail = self.write_position();
        self.buf[tail] = item;
        self.advance_write(1);
    }

    /// Copies up to `dest.len()` unread items into `dest`.
    ///
    /// Returns [`RingError::EndOfData`] when the buffer is empty and `dest` is
    /// not.
    pub fn read(&mut self, dest: &mut [T]) -> Result<usize, RingError> {
        if dest.is_empty() {
            self.can_unread = false;
            return Ok(0);
        }
        if self.len == 0 {
            self.can_unread = false;
            return Err(RingError::EndOfData);
        }

        let n = dest.len().min(self.len);
        let (a, b) = self.segments();
        let first = a.len().min(n);
        dest[..first].clone_from_slice(&a[..first]);
        if n > first {
            dest[first..n].clone_from_slice(&b[..(n - first)]);
        }
        self.consume(n);
        Ok(n)
    }

    /// Removes and returns the next unread item.
    pub fn read_item(&mut self) -> Result<T, RingError> {
        if self.len == 0 {
            self.can_unread = false;
            return Err(RingError::EndOfData);
        }
        let item = self.buf[self.head].clone();
        self.consume(1);
        Ok(item)
    }

    /// Drains the whole unread region into a new `Vec`.
    pub fn value(&mut self) -> Vec<T> {
        self.take(self.len)
    }

    /// Drains the next `n` unread items, or all of them when `n >= len()`.
    pub fn next(&mut self, n: usize) -> Vec<T> {
        self.take(n.min(self.len))
    }

    /// Steps the read cursor back over the last consumed item.
    ///
    /// Fails with [`RingError::InvalidCursorOperation`] unless the previous
    /// operation consumed at least one item. A read that returns nothing
    /// counts as an operation and clears the marker. Only one step back is allowed
    /// per consumption.
    pub fn unread_item(&mut self) -> Result<(), RingError> {
        if !self.can_unread {
            return Err(RingError::InvalidCursorOperation);
        }
        debug_assert!(self.len < self.buf.len());

        let cap = self.buf.len();
        self.head = (self.head + cap - 1) % cap;
        self.len += 1;
        self.can_unread = false;
        Ok(())
    }

    /// Discards the next `n` unread items and zeroes their slots.
    ///
    /// `n == 0` or `n > len()` resets the whole buffer instead.
    pub fn truncate(&mut self, n: usize) {
        if n == 0 || n > self.len {
            self.reset();
            return;
        }

        let cap = self.buf.len();
        let first = (cap - self.head).min(n);
        self.buf[self.head..self.head + first].fill(T::default());
        if n > first {
            self.buf[..(n - first)].fill(T::default());
        }
        self.head = (self.head + n) % cap;
        self.len -= n;
        self.can_unread = false;
    }

    /// Clears both cursors and zeroes every slot. Capacity is retained.
    pub fn reset(&mut self) {
        self.buf.fill(T::default());
        self.head = 0;
        self.len = 0;
        self.can_unread = false;
    }

    /// Moves the read cursor and returns its new storage index.
    ///
    /// The target is `base + offset` where `base` is 0, the read cursor or the
    /// write cursor for `Start`, `Current` and `End`. A negative target fails
    /// with [`RingError::NegativePosition`] and leaves the buffer untouched;
    /// otherwise the target wraps modulo capacity. The unread region then
    /// runs from the new read cursor up to the write cursor; landing on the
    /// write cursor from anywhere but the current position empties it.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64, RingError> {
        let cap = self.buf.len();
        let base = match whence {
            Whence::Start => 0,
            Whence::Current => self.head as i64,
            Whence::End => self.write_position() as i64,
        };
        let position = base.saturating_add(offset);
        if position < 0 {
            return Err(RingError::NegativePosition { position });
        }

        let pos = (position as u64 % cap as u64) as usize;
        if pos != self.head {
            let tail = self.write_position();
            self.len = (tail + cap - pos) % cap;
            self.head = pos;
        }
        self.can_unread = false;
        Ok(pos as u64)
    }

    /// [`seek`](Self::seek) with a raw integer whence (`0`, `1` or `2`).
    pub fn seek_raw(&mut self, offset: i64, whence: i32) -> Result<u64, RingError> {
        let whence = Whence::try_from(whence)?;
        self.seek(offset, whence)
    }

    /// Consumes items up to the first one matching `predicate`.
    ///
    /// The matching item is consumed but not returned. Without a match, the
    /// whole unread region is returned. The scan walks the pre-wrap and
    /// post-wrap segments in turn.
    pub fn read_items<P>(&mut self, mut predicate: P) -> Result<Vec<T>, RingError>
    where
        P: FnMut(&T) -> bool,
    {
        if self.len == 0 {
            self.can_unread = false;
            return Err(RingError::EndOfData);
        }

        let mut out = Vec::new();
        let mut consumed = 0;
        let (a, b) = self.segments();
        for segment in [a, b] {
            match segment.iter().position(|item| predicate(item)) {
                Some(idx) => {
                    out.extend_from_slice(&segment[..idx]);
                    consumed += idx + 1;
                    break;
                }
                None => {
                    out.extend_from_slice(segment);
                    consumed += segment.len();
                }
            }
        }
        self.consume(consumed);
        Ok(out)
    }

    /// Pulls items from `src` until it signals end of data.
    ///
    /// Each accepted chunk is committed with the same eviction rule as
    /// [`write`](Self::write). A producer error leaves the unread items as
    /// they were after the last accepted chunk. Returns the total number of
    /// items committed.
    pub fn read_from<R>(&mut self, src: &mut R) -> Result<usize, RingError>
    where
        R: ItemRead<T> + ?Sized,
    {
        self.read_from_with(src, |_| Ok(()))
    }

    /// Pushes the unread region to `dst`, advancing the read cursor by what
    /// `dst` accepted.
    ///
    /// A wrapped region is pushed in two calls. End of data from `dst` or a
    /// short write stops the push without error.
    pub fn write_to<W>(&mut self, dst: &mut W) -> Result<usize, RingError>
    where
        W: ItemWrite<T> + ?Sized,
    {
        let mut total = 0;
        self.can_unread = false;
        while self.len > 0 {
            let (run, _) = self.segments();
            let offered = run.len();
            let accepted = match dst.write_chunk(run) {
                Ok(n) => n,
                Err(RingError::EndOfData) => {
                    debug!(total, "write_to stopped: consumer signalled end of data");
                    break;
                }
                Err(err) => return Err(err),
            };
            if accepted > offered {
                return Err(RingError::ItemCountOutOfRange {
                    count: accepted,
                    len: offered,
                });
            }

            self.consume(accepted);
            total += accepted;
            if accepted < offered {
                debug!(total, offered, accepted, "write_to stopped on short write");
                break;
            }
        }
        Ok(total)
    }

    /// Shared `read_from` loop; `on_commit` sees each committed run.
    ///
    /// With free space the producer fills it in place. A full buffer has no
    /// slot it may scribble on, so the chunk is staged and committed through
    /// `write_laps`; unread storage changes only once a chunk is accepted.
    pub(crate) fn read_from_with<R, H>(&mut self, src: &mut R, mut on_commit: H) -> Result<usize, RingError>
    where
        R: ItemRead<T> + ?Sized,
        H: FnMut(&[T]) -> Result<(), RingError>,
    {
        let mut total = 0;
        let mut empty_reads = 0;
        let mut staging: Vec<T> = Vec::new();
        loop {
            let pulled = if self.is_full() {
                if staging.is_empty() {
                    staging.resize(self.buf.len(), T::default());
                }
                let pulled = pull(src, staging.as_mut_slice())?;
                if let Some(n) = pulled.filter(|&n| n > 0) {
                    self.write_laps(&staging[..n], &mut on_commit)?;
                }
                pulled
            } else {
                let run = self.writable_run();
                let start = run.start;
                let pulled = pull(src, &mut self.buf[run])?;
                if let Some(n) = pulled.filter(|&n| n > 0) {
                    self.can_unread = false;
                    self.advance_write(n);
                    on_commit(&self.buf[start..start + n])?;
                }
                pulled
            };

            match pulled {
                None => {
                    debug!(total, "read_from finished: producer signalled end of data");
                    return Ok(total);
                }
                Some(0) => {
                    empty_reads += 1;
                    if empty_reads >= MAX_CONSECUTIVE_EMPTY_READS {
                        return Err(RingError::NoProgress { attempts: empty_reads });
                    }
                }
                Some(n) => {
                    empty_reads = 0;
                    total += n;
                }
            }
        }
    }

    /// Writes `items` one storage lap at a time, calling `on_commit` with
    /// each committed run.
    ///
    /// Unlike [`write`](Self::write), every input item is stored (and seen by
    /// `on_commit`) even when the input is longer than the capacity.
    pub(crate) fn write_laps<H>(&mut self, items: &[T], mut on_commit: H) -> Result<usize, RingError>
    where
        H: FnMut(&[T]) -> Result<(), RingError>,
    {
        let cap = self.buf.len();
        let mut rest = items;
        while !rest.is_empty() {
            let tail = self.write_position();
            let lap = (cap - tail).min(rest.len());
            let (chunk, remaining) = rest.split_at(lap);
            self.buf[tail..tail + lap].clone_from_slice(chunk);
            self.can_unread = false;
            self.advance_write(lap);
            on_commit(&self.buf[tail..tail + lap])?;
            rest = remaining;
        }
        Ok(items.len())
    }

    /// Free storage from the write cursor up to the read cursor or the end
    /// of storage, whichever comes first. Never empty; requires `!is_full()`.
    fn writable_run(&self) -> Range<usize> {
        debug_assert!(!self.is_full());
        let tail = self.write_position();
        let end = if self.head > tail { self.head } else { self.buf.len() };
        tail..end
    }

    /// Accounts for `n <= capacity` items just stored at the write cursor.
    fn advance_write(&mut self, n: usize) {
        let cap = self.buf.len();
        let total = self.len + n;
        if total > cap {
            let evicted = total - cap;
            self.head = (self.head + evicted) % cap;
            self.len = cap;
            trace!(evicted, capacity = cap, "ring buffer overwrote unread items");
        } else {
            self.len = total;
        }
    }

    fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.len);
        self.head = (self.head + n) % self.buf.len();
        self.len -= n;
        self.can_unread = n > 0;
    }

    fn take(&mut self, n: usize) -> Vec<T> {
        if n == 0 {
            self.can_unread = false;
            return Vec::new();
        }
        let mut out = Vec::with_capacity(n);
        let (a, b) = self.segments();
        let first = a.len().min(n);
        out.extend_from_slice(&a[..first]);
        if n > first {
            out.extend_from_slice(&b[..(n - first)]);
        }
        self.consume(n);
        out
    }
}

/// One producer call into `buf`; `None` is end of data.
fn pull<T, R>(src: &mut R, buf: &mut [T]) -> Result<Option<usize>, RingError>
where
    R: ItemRead<T> + ?Sized,
{
    let offered = buf.len();
    match src.read_chunk(buf) {
        Ok(count) if count > offered => Err(RingError::ItemCountOutOfRange { count, len: offered }),
        Ok(count) => Ok(Some(count)),
        Err(RingError::EndOfData) => Ok(None),
        Err(err) => Err(err),
    }
}

impl<T: Clone + Default> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<T: Clone + Default> ItemRead<T> for RingBuffer<T> {
    #[inline]
    fn read_chunk(&mut self, buf: &mut [T]) -> Result<usize, RingError> {
        self.read(buf)
    }
}

impl<T: Clone + Default> ItemWrite<T> for RingBuffer<T> {
    #[inline]
    fn write_chunk(&mut self, items: &[T]) -> Result<usize, RingError> {
        Ok(self.write(items))
    }
}

impl io::Read for RingBuffer<u8> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match RingBuffer::read(self, buf) {
            Ok(n) => Ok(n),
            Err(RingError::EndOfData) => Ok(0),
            Err(err) => Err(err.into()),
        }
    }
}

impl io::Write for RingBuffer<u8> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(RingBuffer::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Seek for RingBuffer<u8> {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let (offset, whence) = match pos {
            io::SeekFrom::Start(n) => {
                let offset = i64::try_from(n).map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidInput, "seek offset exceeds i64::MAX")
                })?;
                (offset, Whence::Start)
            }
            io::SeekFrom::Current(n) => (n, Whence::Current),
            io::SeekFrom::End(n) => (n, Whence::End),
        };
        RingBuffer::seek(self, offset, whence).map_err(Into::into)
    }
}

// ---------------------------------------------------------------------------
// Test module includes
// ---------------------------------------------------------------------------

#[cfg(test)]
#[path = "ring_buffer_tests.rs"]
mod ring_buffer_tests;
