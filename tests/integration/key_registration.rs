//! Key registration review

use crate::common::*;
use algo_tx_review::crypto::base64;
use algo_tx_review::decoder::ParserError;
use rmpv::Value;

fn online() -> TxBuilder {
    TxBuilder::new("keyreg")
        .with("votekey", bin(&[0x01; 32]))
        .with("selkey", bin(&[0x02; 32]))
        .with("sprfkey", bin(&[0x03; 64]))
        .with("votefst", uint(1000))
        .with("votelst", uint(3_000_000))
        .with("votekd", uint(1733))
}

#[test]
fn test_online_registration() {
    let mut session = new_session();
    parse_tx(&mut session, &online().build()).unwrap();

    assert_eq!(value_of(&session, "Tx type").unwrap(), "Key Registration");
    assert_eq!(
        review_keys(&session)[5..],
        [
            "Vote PK",
            "VRF PK",
            "Stateproof PK",
            "Vote first",
            "Vote last",
            "Key dilution",
            "Participating"
        ]
    );
    assert_eq!(value_of(&session, "Vote PK").unwrap(), base64(&[0x01; 32]));
    assert_eq!(
        value_of(&session, "Stateproof PK").unwrap(),
        base64(&[0x03; 64])
    );
    assert_eq!(value_of(&session, "Vote last").unwrap(), "3000000");
    assert_eq!(value_of(&session, "Participating").unwrap(), "Yes");
}

#[test]
fn test_offline_registration() {
    let mut session = new_session();
    let offline = TxBuilder::new("keyreg").with("nonpart", Value::Boolean(true));
    parse_tx(&mut session, &offline.build()).unwrap();

    assert_eq!(session.tx_get_num_items().unwrap(), 6);
    assert_eq!(value_of(&session, "Participating").unwrap(), "No");
}

#[test]
fn test_vote_window_needs_both_ends() {
    let mut session = new_session();
    assert_eq!(
        parse_tx(&mut session, &online().without("votelst").build()),
        Err(ParserError::MissingField("votelst"))
    );
}

#[test]
fn test_state_proof_key_size() {
    let mut session = new_session();
    let short = online().with("sprfkey", bin(&[0x03; 32]));
    assert_eq!(
        parse_tx(&mut session, &short.build()),
        Err(ParserError::BinUnexpectedSize)
    );
}
