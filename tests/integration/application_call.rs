//! Application call review, limits and blind signing

use crate::common::*;
use algo_tx_review::crypto::{base64, sha256};
use algo_tx_review::decoder::ParserError;
use rmpv::Value;

fn array(values: Vec<Value>) -> Value {
    Value::Array(values)
}

fn ids(values: &[u64]) -> Value {
    array(values.iter().map(|v| uint(*v)).collect())
}

fn accounts(n: usize) -> Value {
    array((0..n).map(|i| bin(&[i as u8 + 1; 32])).collect())
}

fn app_call() -> TxBuilder {
    TxBuilder::new("appl")
        .with("apid", uint(123))
        .with("apan", uint(1))
        .with("apfa", ids(&[5]))
        .with("apas", ids(&[10]))
        .with("apat", accounts(1))
        .with("apaa", array(vec![bin(b"hello")]))
}

#[test]
fn test_app_call_rows() {
    let mut session = new_session();
    parse_tx(&mut session, &app_call().build()).unwrap();

    assert_eq!(value_of(&session, "Tx type").unwrap(), "Application");
    assert_eq!(
        review_keys(&session)[5..],
        [
            "App ID",
            "On completion",
            "Foreign app 0",
            "Foreign asset 0",
            "App account 0",
            "App arg 0 (sha256)"
        ]
    );
    assert_eq!(value_of(&session, "App ID").unwrap(), "123");
    assert_eq!(value_of(&session, "On completion").unwrap(), "OptIn");
    assert_eq!(value_of(&session, "Foreign app 0").unwrap(), "5");
    assert_eq!(
        value_of(&session, "App arg 0 (sha256)").unwrap(),
        base64(&sha256(b"hello"))
    );
}

#[test]
fn test_app_create_with_programs_and_schemas() {
    let mut session = new_session();
    let create = TxBuilder::new("appl")
        .with("apap", bin(&[0x06; 100]))
        .with("apsu", bin(&[0x06, 0x81, 0x01]))
        .with("apgs", map(vec![("nui", uint(1)), ("nbs", uint(2))]))
        .with("apls", map(vec![("nbs", uint(4))]))
        .with("apep", uint(1));
    parse_tx(&mut session, &create.build()).unwrap();

    assert_eq!(
        review_keys(&session)[5..],
        [
            "App ID",
            "On completion",
            "Global schema",
            "Local schema",
            "Extra pages",
            "Apprv (sha256)",
            "Clear (sha256)"
        ]
    );
    assert_eq!(value_of(&session, "App ID").unwrap(), "0");
    assert_eq!(value_of(&session, "On completion").unwrap(), "NoOp");
    assert_eq!(
        value_of(&session, "Global schema").unwrap(),
        "uint: 1, byte: 2"
    );
    assert_eq!(
        value_of(&session, "Local schema").unwrap(),
        "uint: 0, byte: 4"
    );
    assert_eq!(
        value_of(&session, "Apprv (sha256)").unwrap(),
        base64(&sha256(&[0x06; 100]))
    );
}

#[test]
fn test_box_references() {
    let mut session = new_session();
    let boxes = array(vec![
        map(vec![("i", uint(0)), ("n", bin(b"counter"))]),
        map(vec![("n", bin(b"other")), ("i", uint(1))]),
    ]);
    parse_tx(&mut session, &app_call().with("apbx", boxes).build()).unwrap();

    assert_eq!(value_of(&session, "Box 0").unwrap(), "0: counter");
    assert_eq!(value_of(&session, "Box 1").unwrap(), "1: other");
}

#[test]
fn test_box_reference_errors() {
    let mut session = new_session();

    let unknown_key = array(vec![map(vec![("i", uint(0)), ("x", bin(b"a"))])]);
    assert_eq!(
        parse_tx(&mut session, &app_call().with("apbx", unknown_key).build()),
        Err(ParserError::UnexpectedKey)
    );

    // Only one foreign app, so index 2 points nowhere
    let dangling = array(vec![map(vec![("i", uint(2)), ("n", bin(b"a"))])]);
    assert_eq!(
        parse_tx(&mut session, &app_call().with("apbx", dangling).build()),
        Err(ParserError::ValueOutOfRange)
    );
}

#[test]
fn test_combined_reference_limit() {
    let mut session = new_session();

    // 4 accounts + 2 apps + 2 assets is exactly the limit
    let at_limit = app_call()
        .with("apat", accounts(4))
        .with("apfa", ids(&[1, 2]))
        .with("apas", ids(&[3, 4]));
    parse_tx(&mut session, &at_limit.build()).unwrap();
    assert_eq!(value_of(&session, "App account 3").unwrap().len(), 58);

    let over = app_call()
        .with("apat", accounts(4))
        .with("apfa", ids(&[1, 2, 3]))
        .with("apas", ids(&[4, 5]));
    assert_eq!(
        parse_tx(&mut session, &over.build()),
        Err(ParserError::UnexpectedNumberItems)
    );
    assert_eq!(session.tx_get_num_items(), Err(ParserError::NoData));
    assert!(session.transaction().is_none());
    println!("✅ Over-limit references rejected with no partial account list");
}

#[test]
fn test_per_array_limits() {
    let mut session = new_session();
    assert_eq!(
        parse_tx(&mut session, &app_call().with("apat", accounts(5)).build()),
        Err(ParserError::UnexpectedNumberItems)
    );
    let args = array((0..17).map(|_| bin(b"a")).collect());
    assert_eq!(
        parse_tx(&mut session, &app_call().with("apaa", args).build()),
        Err(ParserError::UnexpectedNumberItems)
    );
}

#[test]
fn test_argument_bytes_limit() {
    let mut session = new_session();
    let args = array(vec![bin(&[0u8; 1024]), bin(&[0u8; 1024])]);
    parse_tx(&mut session, &app_call().with("apaa", args).build()).unwrap();

    let args = array(vec![bin(&[0u8; 1500]), bin(&[0u8; 1500])]);
    assert_eq!(
        parse_tx(&mut session, &app_call().with("apaa", args).build()),
        Err(ParserError::UnexpectedNumberItems)
    );
}

#[test]
fn test_on_completion_and_extra_pages_range() {
    let mut session = new_session();
    assert_eq!(
        parse_tx(&mut session, &app_call().with("apan", uint(6)).build()),
        Err(ParserError::ValueOutOfRange)
    );
    assert_eq!(
        parse_tx(&mut session, &app_call().with("apep", uint(4)).build()),
        Err(ParserError::TooManyExtraPages)
    );
    assert_eq!(
        parse_tx(
            &mut session,
            &app_call()
                .with("apgs", map(vec![("nui", uint(1)), ("bad", uint(1))]))
                .build()
        ),
        Err(ParserError::UnexpectedKey)
    );
}

#[test]
fn test_program_length_on_create() {
    let mut session = new_session();
    let base = TxBuilder::new("appl")
        .with("apap", bin(&[0u8; 2048]))
        .with("apsu", bin(&[0u8; 1]));
    assert_eq!(
        parse_tx(&mut session, &base.build()),
        Err(ParserError::ProgramFieldsTooLong)
    );

    // One extra page makes room
    parse_tx(&mut session, &base.clone().with("apep", uint(1)).build()).unwrap();

    // Updates of an existing app are not bound by the create limit
    parse_tx(&mut session, &base.with("apid", uint(9)).build()).unwrap();
}

#[test]
fn test_blind_signing_hides_app_detail() {
    let mut session = new_session();
    session.set_blind_signing(true);
    parse_tx(&mut session, &app_call().build()).unwrap();
    assert_eq!(review_keys(&session), vec!["Tx type", "Sender"]);

    parse_tx(&mut session, &app_call().with("rekey", bin(&RECEIVER)).build()).unwrap();
    assert_eq!(
        review_keys(&session),
        vec!["Tx type", "Sender", "Rekey to"]
    );

    // Other kinds keep their detail
    parse_tx(&mut session, &TxBuilder::payment().build()).unwrap();
    assert_eq!(session.tx_get_num_items().unwrap(), 7);
}

#[test]
fn test_blind_signing_still_validates() {
    let mut session = new_session();
    session.set_blind_signing(true);
    assert_eq!(
        parse_tx(&mut session, &app_call().with("apan", uint(9)).build()),
        Err(ParserError::ValueOutOfRange)
    );
}
