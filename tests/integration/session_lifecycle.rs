//! Buffering, re-initialisation and paging across whole messages

use crate::common::*;
use algo_tx_review::config::{BufferingConfig, ReviewConfig};
use algo_tx_review::crypto::{address, base64, sha256};
use algo_tx_review::decoder::ParserError;
use algo_tx_review::session::buffering::{Buffering, Region};
use algo_tx_review::session::{ContentKind, DecoderSession, SigningPayload, TX_SIGN_PREFIX};

fn large_app_create() -> Vec<u8> {
    TxBuilder::new("appl")
        .with("apap", bin(&[0x06; 8000]))
        .with("apsu", bin(&[0x06; 192]))
        .with("apep", uint(3))
        .build()
}

#[test]
fn test_large_message_spills_to_flash() {
    let mut session = new_session();
    let message = large_app_create();
    assert!(message.len() > BufferingConfig::default().ram_capacity);

    parse_tx(&mut session, &message).unwrap();
    assert_eq!(session.tx_get_buffer(), &message[..]);
    assert_eq!(
        value_of(&session, "Apprv (sha256)").unwrap(),
        base64(&sha256(&[0x06; 8000]))
    );
    assert_eq!(value_of(&session, "Extra pages").unwrap(), "3");

    let payload = session.signing_payload().unwrap();
    assert_eq!(&payload.as_bytes()[..2], TX_SIGN_PREFIX);
    assert_eq!(&payload.as_bytes()[2..], &message[..]);
    println!("✅ {} byte message parsed from flash", message.len());
}

#[test]
fn test_buffer_region_follows_length() {
    let mut session = new_session();
    session.tx_initialize();
    session.tx_append(&[0u8; 100]);
    assert_eq!(session.tx_get_buffer().len(), 100);

    let mut buffering = Buffering::new();
    buffering.init(8, 16);
    buffering.append(&[1; 8]);
    assert_eq!(buffering.region(), Region::Ram);
    buffering.append(&[2; 1]);
    assert_eq!(buffering.region(), Region::Flash);
    assert_eq!(buffering.length(), 9);
}

#[test]
fn test_oversized_message_is_dropped() {
    let mut session = new_session();
    session.tx_initialize();
    let capacity = BufferingConfig::default().flash_capacity;
    assert_eq!(session.tx_append(&vec![0u8; capacity]), capacity);
    assert_eq!(session.tx_append(&[0u8; 1]), 0);
    assert!(session.tx_get_buffer().is_empty());
    assert_eq!(
        session.tx_parse(ContentKind::Transaction),
        Err(ParserError::InitContextEmpty)
    );
}

#[test]
fn test_initialize_discards_review() {
    let mut session = new_session();
    parse_tx(&mut session, &TxBuilder::payment().build()).unwrap();
    assert!(session.tx_get_num_items().is_ok());

    session.tx_initialize();
    assert_eq!(session.tx_get_num_items(), Err(ParserError::NoData));
    assert!(session.tx_get_buffer().is_empty());
    assert_eq!(session.signing_payload(), None);
}

#[test]
fn test_recovers_after_failed_parse() {
    let mut session = new_session();
    assert_eq!(
        parse_tx(&mut session, &TxBuilder::payment().without("rcv").build()),
        Err(ParserError::MissingField("rcv"))
    );
    assert!(session.transaction().is_none());

    parse_tx(&mut session, &TxBuilder::payment().build()).unwrap();
    assert_eq!(value_of(&session, "Tx type").unwrap(), "Payment");
}

#[test]
fn test_failed_parse_drops_previous_review() {
    let mut session = new_session();
    parse_tx(&mut session, &TxBuilder::payment().build()).unwrap();
    assert!(parse_tx(&mut session, &TxBuilder::new("bogus").build()).is_err());
    assert_eq!(session.tx_get_item(0, 0), Err(ParserError::NoData));
}

#[test]
fn test_out_of_range_requests() {
    let mut session = new_session();
    parse_tx(&mut session, &TxBuilder::payment().build()).unwrap();
    let count = session.tx_get_num_items().unwrap();

    let err = session.tx_get_item(count, 0).unwrap_err();
    assert_eq!(err, ParserError::NoData);
    assert_eq!(err.reply().message, None);

    let err = session.tx_get_item(0, 1).unwrap_err();
    assert_eq!(err, ParserError::DisplayPageOutOfRange);
    assert_eq!(err.reply().message, None);
}

#[test]
fn test_custom_page_width() {
    let review = ReviewConfig {
        page_width: 20,
        ..Default::default()
    };
    let mut session = DecoderSession::new(review, BufferingConfig::default());
    parse_tx(&mut session, &TxBuilder::payment().build()).unwrap();

    let first = session.tx_get_item(1, 0).unwrap();
    assert_eq!(first.key, "Sender");
    assert_eq!(first.page_count, 3);
    assert_eq!(first.value.chars().count(), 20);

    let last = session.tx_get_item(1, 2).unwrap();
    assert_eq!(last.value.chars().count(), 18);
    assert_eq!(
        value_of(&session, "Sender").unwrap(),
        address::encode(&SENDER)
    );
}

#[test]
fn test_arbitrary_after_transaction() {
    let mut session = arbitrary_session();
    parse_tx(&mut session, &TxBuilder::payment().build()).unwrap();

    load(&mut session, &ArbitraryRequest::default().encode());
    session.tx_parse(ContentKind::ArbitraryData).unwrap();
    assert!(session.transaction().is_none());
    assert!(matches!(
        session.signing_payload(),
        Some(SigningPayload::ArbitraryData(_))
    ));
}
