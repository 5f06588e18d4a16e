//! Producer and consumer contracts the ring buffers both implement and consume.
//!
//! The contracts are generic over the item type, unlike `std::io::Read` /
//! `std::io::Write`, and use an explicit sentinel for natural completion:
//! `Err(RingError::EndOfData)` means "no more items", delivered in a call
//! that transfers nothing. Any other error is a genuine failure.
//!
//! Adapters are provided for slices, `Vec`, `VecDeque` and, for bytes, any
//! `std::io` reader or writer.

use std::collections::VecDeque;
use std::io;

use crate::error::RingError;

/// Reference point for a seek.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Whence {
    /// Index 0 of the underlying storage.
    Start = 0,
    /// The current read cursor.
    Current = 1,
    /// The write cursor.
    End = 2,
}

impl TryFrom<i32> for Whence {
    type Error = RingError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Start),
            1 => Ok(Self::Current),
            2 => Ok(Self::End),
            other => Err(RingError::InvalidWhence(other)),
        }
    }
}

/// A producer of items.
pub trait ItemRead<T> {
    /// Fills a prefix of `buf` and returns how many items were written.
    ///
    /// Returns `Err(RingError::EndOfData)` once the producer is exhausted.
    /// Implementations must never report more than `buf.len()` items.
    fn read_chunk(&mut self, buf: &mut [T]) -> Result<usize, RingError>;
}

/// A consumer of items.
pub trait ItemWrite<T> {
    /// Accepts a prefix of `items` and returns its length.
    ///
    /// `Err(RingError::EndOfData)` means the consumer takes no more items.
    fn write_chunk(&mut self, items: &[T]) -> Result<usize, RingError>;
}

impl<R, T> ItemRead<T> for &mut R
where
    R: ItemRead<T> + ?Sized,
{
    #[inline]
    fn read_chunk(&mut self, buf: &mut [T]) -> Result<usize, RingError> {
        (**self).read_chunk(buf)
    }
}

impl<W, T> ItemWrite<T> for &mut W
where
    W: ItemWrite<T> + ?Sized,
{
    #[inline]
    fn write_chunk(&mut self, items: &[T]) -> Result<usize, RingError> {
        (**self).write_chunk(items)
    }
}

/// Reading from a slice advances it past the items handed out.
impl<T: Clone> ItemRead<T> for &[T] {
    fn read_chunk(&mut self, buf: &mut [T]) -> Result<usize, RingError> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.is_empty() {
            return Err(RingError::EndOfData);
        }
        let n = buf.len().min(self.len());
        let (head, tail) = self.split_at(n);
        buf[..n].clone_from_slice(head);
        *self = tail;
        Ok(n)
    }
}

impl<T> ItemRead<T> for VecDeque<T> {
    fn read_chunk(&mut self, buf: &mut [T]) -> Result<usize, RingError> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.is_empty() {
            return Err(RingError::EndOfData);
        }
        let n = buf.len().min(self.len());
        for (slot, item) in buf.iter_mut().zip(self.drain(..n)) {
            *slot = item;
        }
        Ok(n)
    }
}

impl<T: Clone> ItemWrite<T> for Vec<T> {
    #[inline]
    fn write_chunk(&mut self, items: &[T]) -> Result<usize, RingError> {
        self.extend_from_slice(items);
        Ok(items.len())
    }
}

impl<T: Clone> ItemWrite<T> for VecDeque<T> {
    #[inline]
    fn write_chunk(&mut self, items: &[T]) -> Result<usize, RingError> {
        self.extend(items.iter().cloned());
        Ok(items.len())
    }
}

/// Byte producer backed by a `std::io::Read`.
///
/// `Ok(0)` from the reader on a non-empty buffer is reported as end of data;
/// `Interrupted` reads are retried.
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

impl<R: io::Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: io::Read> ItemRead<u8> for IoSource<R> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, RingError> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            match self.inner.read(buf) {
                Ok(0) => return Err(RingError::EndOfData),
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(RingError::Io(err)),
            }
        }
    }
}

/// Byte consumer backed by a `std::io::Write`.
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
}

impl<W: io::Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> ItemWrite<u8> for IoSink<W> {
    fn write_chunk(&mut self, items: &[u8]) -> Result<usize, RingError> {
        loop {
            match self.inner.write(items) {
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(RingError::Io(err)),
            }
        }
    }
}
