//! Field lookup is independent of wire order

use crate::common::{encode, map, text, uint, TxBuilder};
use algo_tx_review::decoder::reader::Reader;
use algo_tx_review::decoder::{decode_transaction, ParserError};
use rmpv::Value;

const KEYS: [&str; 6] = ["a", "bb", "ccc", "nest", "list", "z"];

fn value_for(key: &str) -> Value {
    match key {
        "nest" => map(vec![("inner", uint(7)), ("deeper", map(vec![("x", text("y"))]))]),
        "list" => Value::Array(vec![uint(1), text("two"), Value::Boolean(true)]),
        _ => uint(key.len() as u64 * 100),
    }
}

#[test]
fn test_seek_any_position() {
    let n = KEYS.len();
    for rotation in 0..n {
        let entries: Vec<_> = (0..n)
            .map(|i| {
                let key = KEYS[(i + rotation) % n];
                (key, value_for(key))
            })
            .collect();
        let bytes = encode(&map(entries));
        let mut reader = Reader::new(&bytes);

        for key in ["a", "bb", "ccc", "z"] {
            reader.find_key(key).unwrap();
            assert_eq!(
                reader.read_integer().unwrap(),
                key.len() as u64 * 100,
                "key {} with rotation {}",
                key,
                rotation
            );
        }
    }
    println!("✅ Every key is found at every position");
}

#[test]
fn test_absent_key() {
    let bytes = encode(&map(vec![("a", uint(1)), ("nest", value_for("nest"))]));
    let mut reader = Reader::new(&bytes);
    assert_eq!(reader.find_key("missing"), Err(ParserError::NoData));
    // Exact match only: a prefix of a present key is not that key
    assert_eq!(reader.find_key("nes"), Err(ParserError::NoData));
    reader.find_key("a").unwrap();
    assert_eq!(reader.read_integer().unwrap(), 1);
}

#[test]
fn test_transaction_independent_of_field_order() {
    let builder = TxBuilder::payment().with("note", Value::Binary(b"hello".to_vec()));
    let inserted = decode_transaction(&builder.build(), false).unwrap();
    let sorted = decode_transaction(&builder.clone().sorted().build(), false).unwrap();
    let reversed = decode_transaction(&builder.reversed().build(), false).unwrap();

    assert_eq!(inserted, sorted);
    assert_eq!(inserted, reversed);
}

#[test]
fn test_unknown_fields_are_ignored() {
    let plain = TxBuilder::payment();
    let extended = plain
        .clone()
        .with("xyz", map(vec![("deep", Value::Array(vec![uint(1), uint(2)]))]))
        .with("hb", Value::Boolean(true));

    let a = decode_transaction(&plain.build(), false).unwrap();
    let b = decode_transaction(&extended.build(), false).unwrap();
    assert_eq!(a, b);
}
