//! Tests for serde-described ring configuration.

use ringstage::{RingBuffer, RingConfig, RingError, DEFAULT_CAPACITY};

#[test]
fn config_round_trips_through_json() {
    let cfg = RingConfig::with_capacity(64);
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(json, r#"{"capacity":64}"#);

    let back: RingConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn missing_capacity_falls_back_to_default() {
    let cfg: RingConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg.capacity, DEFAULT_CAPACITY);

    let cfg: RingConfig = serde_json::from_str(r#"{"capacity":0}"#).unwrap();
    assert_eq!(cfg.effective_capacity(), DEFAULT_CAPACITY);
    assert_eq!(cfg.build::<u8>().cap(), DEFAULT_CAPACITY);
}

#[test]
fn negative_capacity_is_rejected_by_the_deserializer() {
    assert!(serde_json::from_str::<RingConfig>(r#"{"capacity":-3}"#).is_err());
    // Signed requests go through the coercing constructor instead.
    assert_eq!(RingConfig::from_signed(-3).effective_capacity(), DEFAULT_CAPACITY);
}

#[test]
fn built_filter_uses_configured_capacity() {
    let cfg: RingConfig = serde_json::from_str(r#"{"capacity":3}"#).unwrap();
    let mut seen = 0usize;
    {
        let mut stage = cfg.build_filter(|run: &[u16]| {
            seen += run.len();
            Ok::<(), RingError>(())
        });
        stage.write(&[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(stage.cap(), 3);
        assert_eq!(stage.value(), vec![3, 4, 5]);
    }
    assert_eq!(seen, 5);

    let ring: RingBuffer<u16> = cfg.build();
    assert_eq!(ring.cap(), 3);
}

#[test]
fn default_ring_matches_default_config() {
    let ring = RingBuffer::<u32>::default();
    assert_eq!(ring.cap(), RingConfig::default().capacity);
}
