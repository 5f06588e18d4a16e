#![no_main]

use std::collections::VecDeque;

use libfuzzer_sys::fuzz_target;

use ringstage::{RingBuffer, RingError, Whence};

// Interprets a byte stream as an operation sequence against `RingBuffer`,
// checking every result against a bounded `VecDeque` model.
//
// Byte layout:
// - Byte 0 -> capacity (clamped to 1..=255)
// - Remaining bytes as `(opcode, operand)` pairs:
//   - 0 -> `write(operand bytes of a counter pattern)`
//   - 1 -> `write_item(operand)`
//   - 2 -> `read(operand)`
//   - 3 -> `unread_item()`
//   - 4 -> `truncate(operand)`
//   - 5 -> `read_items(== operand)`
//   - 6 -> `seek(0, Current)` (must be a no-op on contents)
//   - 7 -> `reset()`
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let cap = (data[0] as usize).max(1);
    let mut ring = RingBuffer::<u8>::new(cap);
    let mut model: VecDeque<u8> = VecDeque::new();
    let mut last: Option<u8> = None;
    let mut counter = 0u8;

    let ops = &data[1..];
    let mut i = 0;
    while i + 1 < ops.len() {
        let opcode = ops[i];
        let operand = ops[i + 1];
        i += 2;

        match opcode % 8 {
            0 => {
                let items: Vec<u8> = (0..operand)
                    .map(|_| {
                        counter = counter.wrapping_add(1);
                        counter
                    })
                    .collect();
                assert_eq!(ring.write(&items), items.len());
                for &item in &items {
                    if model.len() == cap {
                        model.pop_front();
                    }
                    model.push_back(item);
                }
                if !items.is_empty() {
                    last = None;
                }
            }
            1 => {
                ring.write_item(operand);
                if model.len() == cap {
                    model.pop_front();
                }
                model.push_back(operand);
                last = None;
            }
            2 => {
                let mut out = vec![0u8; operand as usize];
                match ring.read(&mut out) {
                    Ok(n) => {
                        let want: Vec<u8> = model.drain(..n).collect();
                        assert_eq!(&out[..n], &want[..], "read({operand}) mismatch");
                        last = want.last().copied();
                    }
                    Err(err) => {
                        assert!(err.is_end_of_data());
                        assert!(model.is_empty());
                        last = None;
                    }
                }
            }
            3 => match (ring.unread_item(), last.take()) {
                (Ok(()), Some(item)) => model.push_front(item),
                (Err(RingError::InvalidCursorOperation), None) => {}
                (got, want) => panic!("unread mismatch: ring={got:?}, model={want:?}"),
            },
            4 => {
                let n = operand as usize;
                ring.truncate(n);
                if n == 0 || n > model.len() {
                    model.clear();
                } else {
                    model.drain(..n);
                }
                last = None;
            }
            5 => match ring.read_items(|&b| b == operand) {
                Ok(items) => {
                    let stop = model.iter().position(|&b| b == operand);
                    let take = stop.map_or(model.len(), |idx| idx + 1);
                    let mut want: Vec<u8> = model.drain(..take).collect();
                    if stop.is_some() {
                        last = want.pop();
                    } else {
                        last = want.last().copied();
                    }
                    assert_eq!(items, want, "read_items({operand}) mismatch");
                }
                Err(err) => {
                    assert!(err.is_end_of_data());
                    assert!(model.is_empty());
                    last = None;
                }
            },
            6 => {
                let pos = ring.read_position();
                assert_eq!(ring.seek(0, Whence::Current).ok(), Some(pos as u64));
                last = None;
            }
            _ => {
                ring.reset();
                model.clear();
                last = None;
            }
        }

        assert_eq!(ring.len(), model.len());
        assert_eq!(ring.is_full(), model.len() == cap);
        let (a, b) = ring.segments();
        assert!(a.iter().chain(b).eq(model.iter()));
    }
});
