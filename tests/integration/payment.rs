//! Payment review, end to end

use crate::common::*;
use algo_tx_review::crypto::{address, base64};
use algo_tx_review::decoder::ParserError;
use algo_tx_review::session::{SigningPayload, TX_SIGN_PREFIX};
use rmpv::Value;

#[test]
fn test_payment_end_to_end() {
    let mut session = new_session();
    parse_tx(&mut session, &TxBuilder::payment().build()).unwrap();

    // Tx type + sender, fee, genesis id, genesis hash + receiver, amount
    assert_eq!(session.tx_get_num_items().unwrap(), 7);

    let first = session.tx_get_item(0, 0).unwrap();
    assert_eq!(first.key, "Tx type");
    assert_eq!(first.value, "Payment");
    assert_eq!(first.page_count, 1);

    assert_eq!(
        review_keys(&session),
        vec![
            "Tx type",
            "Sender",
            "Fee",
            "Genesis ID",
            "Genesis hash",
            "Receiver",
            "Amount"
        ]
    );
    assert_eq!(value_of(&session, "Amount").unwrap(), "0.500000");
    assert_eq!(value_of(&session, "Fee").unwrap(), "0.001000");
    assert_eq!(value_of(&session, "Genesis ID").unwrap(), GENESIS_ID);
    assert_eq!(
        value_of(&session, "Genesis hash").unwrap(),
        base64(&GENESIS_HASH)
    );
    assert_eq!(
        value_of(&session, "Sender").unwrap(),
        address::encode(&SENDER)
    );
    println!("✅ Payment reviewed with 7 rows");
}

#[test]
fn test_close_to_adds_a_row() {
    let mut session = new_session();
    let tx = TxBuilder::payment().with("close", bin(&[0u8; 32]));
    parse_tx(&mut session, &tx.build()).unwrap();

    assert_eq!(session.tx_get_num_items().unwrap(), 8);
    let last = session.tx_get_item(7, 0).unwrap();
    assert_eq!(last.key, "Close to");
    assert_eq!(last.value, "Zero");
}

#[test]
fn test_optional_header_rows_in_read_order() {
    let mut session = new_session();
    let tx = TxBuilder::payment()
        .with("note", bin(b"hello"))
        .with("grp", bin(&GROUP_ID))
        .with("rekey", bin(&RECEIVER))
        .with("lx", bin(&[0x77; 32]));
    parse_tx(&mut session, &tx.build()).unwrap();

    assert_eq!(
        review_keys(&session),
        vec![
            "Tx type",
            "Sender",
            "Lease",
            "Rekey to",
            "Fee",
            "Genesis ID",
            "Genesis hash",
            "Group ID",
            "Note",
            "Receiver",
            "Amount"
        ]
    );
    assert_eq!(value_of(&session, "Note").unwrap(), "5 bytes");
    assert_eq!(value_of(&session, "Lease").unwrap(), base64(&[0x77; 32]));
}

#[test]
fn test_address_spans_two_pages() {
    let mut session = new_session();
    parse_tx(&mut session, &TxBuilder::payment().build()).unwrap();

    let first = session.tx_get_item(1, 0).unwrap();
    assert_eq!(first.key, "Sender");
    assert_eq!(first.page_count, 2);
    assert_eq!(first.value.len(), 38);
    let second = session.tx_get_item(1, 1).unwrap();
    assert_eq!(second.value.len(), 20);
    assert_eq!(
        session.tx_get_item(1, 2),
        Err(ParserError::DisplayPageOutOfRange)
    );
}

#[test]
fn test_signing_payload_is_prefixed_buffer() {
    let mut session = new_session();
    let message = TxBuilder::payment().build();
    parse_tx(&mut session, &message).unwrap();

    let mut expected = TX_SIGN_PREFIX.to_vec();
    expected.extend_from_slice(&message);
    assert_eq!(
        session.signing_payload(),
        Some(SigningPayload::Transaction(expected))
    );
}

#[test]
fn test_defaults_when_fee_and_amount_absent() {
    let mut session = new_session();
    let tx = TxBuilder::payment().without("fee").without("amt");
    parse_tx(&mut session, &tx.build()).unwrap();
    assert_eq!(value_of(&session, "Fee").unwrap(), "0.000000");
    assert_eq!(value_of(&session, "Amount").unwrap(), "0.000000");
}

#[test]
fn test_rejected_payments() {
    let cases: Vec<(TxBuilder, ParserError)> = vec![
        (
            TxBuilder::payment().without("snd"),
            ParserError::MissingField("snd"),
        ),
        (
            TxBuilder::payment().without("gh"),
            ParserError::MissingField("gh"),
        ),
        (
            TxBuilder::payment().without("lv"),
            ParserError::MissingField("lv"),
        ),
        (
            TxBuilder::payment().without("type"),
            ParserError::MissingField("type"),
        ),
        (
            TxBuilder::payment().with("type", text("stpf")),
            ParserError::UnknownTransaction,
        ),
        (
            TxBuilder::payment().with("note", bin(&[0u8; 513])),
            ParserError::UnexpectedValue,
        ),
        (
            TxBuilder::payment().with("fv", uint(3000)),
            ParserError::ValueOutOfRange,
        ),
        (
            TxBuilder::payment().with("gen", text(&"g".repeat(32))),
            ParserError::StrTooBig,
        ),
        (
            TxBuilder::payment().with("snd", bin(&[0u8; 31])),
            ParserError::BinUnexpectedSize,
        ),
        (
            TxBuilder::payment().with("amt", Value::from(-1i64)),
            ParserError::IntTypeExpected,
        ),
    ];

    for (tx, expected) in cases {
        let mut session = new_session();
        assert_eq!(parse_tx(&mut session, &tx.build()), Err(expected));
        assert_eq!(session.tx_get_num_items(), Err(ParserError::NoData));
        assert_eq!(session.signing_payload(), None);
    }
    println!("✅ Malformed payments rejected with nothing to review");
}

#[test]
fn test_note_at_limit_accepted() {
    let mut session = new_session();
    let tx = TxBuilder::payment().with("note", bin(&[0xee; 512]));
    parse_tx(&mut session, &tx.build()).unwrap();
    assert_eq!(value_of(&session, "Note").unwrap(), "512 bytes");
}
