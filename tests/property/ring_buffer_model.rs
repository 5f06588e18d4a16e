//! Property tests for overwrite-on-full retention.
//!
//! Whatever the mix of bulk writes, item writes and producer pulls, the
//! unread region must equal the last `min(len, capacity)` items of the
//! stream written since the last drain.

use proptest::prelude::*;

use ringstage::{ItemRead, RingBuffer, RingError, Whence};

#[derive(Debug, Clone)]
enum Feed {
    Bulk(Vec<u8>),
    Item(u8),
    Pull { data: Vec<u8>, step: usize },
}

fn feed_strategy() -> impl Strategy<Value = Feed> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..48).prop_map(Feed::Bulk),
        any::<u8>().prop_map(Feed::Item),
        (prop::collection::vec(any::<u8>(), 0..48), 1usize..9)
            .prop_map(|(data, step)| Feed::Pull { data, step }),
    ]
}

struct Stepped<'a> {
    data: &'a [u8],
    step: usize,
}

impl ItemRead<u8> for Stepped<'_> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, RingError> {
        if self.data.is_empty() {
            return Err(RingError::EndOfData);
        }
        let n = self.step.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn retains_stream_suffix(
        cap in 1usize..24,
        feeds in prop::collection::vec(feed_strategy(), 0..12),
    ) {
        let mut ring = RingBuffer::<u8>::new(cap);
        let mut stream = Vec::new();

        for feed in &feeds {
            match feed {
                Feed::Bulk(items) => {
                    prop_assert_eq!(ring.write(items), items.len());
                    stream.extend_from_slice(items);
                }
                Feed::Item(item) => {
                    ring.write_item(*item);
                    stream.push(*item);
                }
                Feed::Pull { data, step } => {
                    let mut src = Stepped { data, step: *step };
                    prop_assert_eq!(ring.read_from(&mut src).unwrap(), data.len());
                    stream.extend_from_slice(data);
                }
            }
            prop_assert!(ring.len() <= cap);
            prop_assert!(ring.read_position() < cap);
        }

        let keep = stream.len().min(cap);
        prop_assert_eq!(ring.len(), keep);
        prop_assert_eq!(ring.value(), stream[stream.len() - keep..].to_vec());
    }

    #[test]
    fn write_to_drains_in_logical_order(
        cap in 1usize..24,
        head in prop::collection::vec(any::<u8>(), 0..24),
        skip in 0usize..24,
        tail in prop::collection::vec(any::<u8>(), 0..24),
    ) {
        let mut ring = RingBuffer::<u8>::new(cap);
        ring.write(&head);
        ring.next(skip);
        ring.write(&tail);

        let (a, b) = ring.segments();
        let want: Vec<u8> = a.iter().chain(b).copied().collect();
        prop_assert_eq!(want.len(), ring.len());

        let mut out = Vec::new();
        prop_assert_eq!(ring.write_to(&mut out).unwrap(), want.len());
        prop_assert_eq!(out, want);
        prop_assert!(ring.is_empty());
    }

    #[test]
    fn seek_keeps_cursors_in_range(
        cap in 1usize..16,
        input in prop::collection::vec(any::<u8>(), 0..32),
        offset in -40i64..40,
        whence in 0i32..3,
    ) {
        let mut ring = RingBuffer::<u8>::new(cap);
        ring.write(&input);
        let before = (ring.read_position(), ring.len());
        let write_pos = ring.write_position();

        match ring.seek_raw(offset, whence) {
            Ok(pos) => {
                prop_assert!((pos as usize) < cap);
                prop_assert_eq!(ring.read_position(), pos as usize);
                prop_assert!(ring.len() <= cap);
                // The write cursor never moves on a seek.
                prop_assert_eq!(ring.write_position(), write_pos);
            }
            Err(err) => {
                let whence = Whence::try_from(whence).unwrap();
                prop_assert!(matches!(err, RingError::NegativePosition { .. }), "{whence:?}");
                prop_assert_eq!((ring.read_position(), ring.len()), before);
            }
        }
    }
}
