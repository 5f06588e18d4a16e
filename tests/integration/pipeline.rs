//! End-to-end pipeline scenarios built from ring filters.
//!
//! Each stage keeps at most `capacity` raw items while its filter forwards
//! transformed runs into a downstream buffer owned by the test.

use std::error::Error as _;
use std::io;

use ringstage::{ItemRead, RingBuffer, RingError, RingFilter};

use crate::init_tracing;

/// Producer that hands out `data` in fixed-size chunks.
struct Chunks<'a, T> {
    data: &'a [T],
    step: usize,
}

impl<T: Clone> ItemRead<T> for Chunks<'_, T> {
    fn read_chunk(&mut self, buf: &mut [T]) -> Result<usize, RingError> {
        if self.data.is_empty() {
            return Err(RingError::EndOfData);
        }
        let n = self.step.min(buf.len()).min(self.data.len());
        buf[..n].clone_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

fn decode(sample: i8) -> f32 {
    f32::from(sample) / 127.0
}

#[test]
fn decode_stage_feeds_bounded_downstream() {
    init_tracing();
    let samples: Vec<i8> = (0..1000).map(|i| (i % 200 - 100) as i8).collect();
    let mut decoded = RingBuffer::<f32>::new(16);
    let mut decoded_total = 0usize;

    {
        let mut stage: RingFilter<i8, _> = RingFilter::with_filter(64, |run: &[i8]| {
            let floats: Vec<f32> = run.iter().copied().map(decode).collect();
            decoded_total += decoded.write(&floats);
            Ok::<(), RingError>(())
        });
        let mut src = Chunks {
            data: &samples,
            step: 37,
        };
        assert_eq!(stage.read_from(&mut src).unwrap(), samples.len());
        assert_eq!(stage.len(), 64);
    }

    assert_eq!(decoded_total, samples.len());
    let want: Vec<f32> = samples[samples.len() - 16..].iter().copied().map(decode).collect();
    assert_eq!(decoded.value(), want);
}

#[test]
fn stages_chain_through_filters() {
    let mut downstream: RingFilter<u8> = RingFilter::new(8);
    {
        let mut upstream: RingFilter<u8, _> = RingFilter::with_filter(3, |run: &[u8]| {
            let upper = run.to_ascii_uppercase();
            downstream.write(&upper).map(|_| ())
        });
        upstream.write(b"ring buffered").unwrap();
        assert_eq!(upstream.value(), b"red");
    }
    assert_eq!(downstream.value(), b"BUFFERED");
}

#[test]
fn ring_drains_into_filter_stage() {
    let mut seen = Vec::new();
    let mut upstream = RingBuffer::<u8>::new(6);
    upstream.write(b"abcdefgh");
    {
        let mut stage: RingFilter<u8, _> = RingFilter::with_filter(4, |run: &[u8]| {
            seen.extend_from_slice(run);
            Ok::<(), RingError>(())
        });
        assert_eq!(upstream.write_to(&mut stage).unwrap(), 6);
        assert_eq!(stage.value(), b"efgh");
    }
    assert_eq!(seen, b"cdefgh");
    assert!(upstream.is_empty());
}

#[test]
fn rejection_surfaces_original_error() {
    init_tracing();
    let mut stage: RingFilter<i8, _> = RingFilter::with_filter(4, |run: &[i8]| {
        if run.contains(&i8::MIN) {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "clipped sample"));
        }
        Ok(())
    });

    stage.write(&[1, 2, 3]).unwrap();
    let err = stage.write(&[4, i8::MIN, 5]).unwrap_err();
    assert!(matches!(err, RingError::FilterRejected(_)));

    let source = err.source().expect("filter error kept as source");
    let io_err = source.downcast_ref::<io::Error>().expect("io::Error source");
    assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);

    // [4] fills the end of storage and passes; the wrapped lap [MIN, 5] is
    // committed before the filter rejects it.
    assert_eq!(stage.value(), vec![3, 4, i8::MIN, 5]);
}

#[test]
fn delimited_records_from_a_stream() {
    let mut ring = RingBuffer::<u8>::new(32);
    let mut src: &[u8] = b"alpha\nbeta\n\ngamma";
    ring.read_from(&mut src).unwrap();

    let mut records = Vec::new();
    loop {
        match ring.read_items(|&b| b == b'\n') {
            Ok(record) => records.push(String::from_utf8(record).unwrap()),
            Err(RingError::EndOfData) => break,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }
    assert_eq!(records, ["alpha", "beta", "", "gamma"]);
}
