//! Integer and string primitives against encodings produced by rmpv

use crate::common::{bin, encode, text, uint};
use algo_tx_review::decoder::reader::Reader;
use algo_tx_review::decoder::ParserError;

/// Values on both sides of every width tier, with the expected encoded size
const TIER_BOUNDARIES: &[(u64, usize)] = &[
    (0, 1),
    (1, 1),
    (127, 1),
    (128, 2),
    (255, 2),
    (256, 3),
    (65_535, 3),
    (65_536, 5),
    (u32::MAX as u64, 5),
    (u32::MAX as u64 + 1, 9),
    (u64::MAX, 9),
];

#[test]
fn test_integer_round_trip_across_tiers() {
    for &(value, encoded_len) in TIER_BOUNDARIES {
        let bytes = encode(&uint(value));
        assert_eq!(bytes.len(), encoded_len, "encoded size of {}", value);

        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.read_integer().unwrap(), value);
        assert!(reader.is_exhausted());
    }
    println!("✅ Integers round trip across all width tiers");
}

#[test]
fn test_integer_spread_round_trip() {
    // Powers of two and their neighbours cover every tier many times over
    for shift in 0..64 {
        for value in [(1u64 << shift) - 1, 1u64 << shift, (1u64 << shift) + 1] {
            let bytes = encode(&uint(value));
            assert_eq!(Reader::new(&bytes).read_integer().unwrap(), value);
        }
    }
}

#[test]
fn test_string_bound() {
    let max_len = 32;
    for len in 0..=40 {
        let s = "x".repeat(len);
        let bytes = encode(&text(&s));
        let result = Reader::new(&bytes).read_string(max_len);
        if len < max_len {
            assert_eq!(result.unwrap(), s.as_bytes(), "length {}", len);
        } else {
            assert_eq!(result, Err(ParserError::StrTooBig), "length {}", len);
        }
    }
    println!("✅ Strings below the bound decode, the rest are refused");
}

#[test]
fn test_bin_widths_from_rmpv() {
    // bin8 and bin16 are accepted; the reader reports the actual length
    for len in [0usize, 32, 255, 256, 2048] {
        let payload = vec![0xab; len];
        let bytes = encode(&bin(&payload));
        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.read_bin(4096).unwrap(), payload.as_slice());
    }
}

#[test]
fn test_wrong_type_leaves_cursor() {
    let bytes = encode(&text("pay"));
    let mut reader = Reader::new(&bytes);
    assert_eq!(reader.read_integer(), Err(ParserError::IntTypeExpected));
    assert_eq!(reader.offset(), 0);
    assert_eq!(reader.read_string(10).unwrap(), b"pay");
}
