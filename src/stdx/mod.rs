//! Fixed-capacity ring buffers used as bounded pipeline stages.

pub mod ring_buffer;
pub mod ring_filter;

pub use ring_buffer::RingBuffer;
pub use ring_filter::{Filter, Passthrough, RingFilter};
