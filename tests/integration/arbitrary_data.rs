//! Arbitrary-data authentication requests, end to end

use crate::common::*;
use algo_tx_review::crypto::{address, hd_path::HdPath, sha256};
use algo_tx_review::decoder::{ParserError, ParserResult};
use algo_tx_review::session::{ContentKind, DecoderSession, SigningPayload};

fn parse(session: &mut DecoderSession, request: &ArbitraryRequest) -> ParserResult<()> {
    load(session, &request.encode());
    session.tx_parse(ContentKind::ArbitraryData)
}

#[test]
fn test_request_review_rows() {
    let mut session = arbitrary_session();
    let request = ArbitraryRequest::default();
    parse(&mut session, &request).unwrap();

    // Domain, signer, HD path, auth data + three JSON members
    assert_eq!(session.tx_get_num_items().unwrap(), 7);
    assert_eq!(
        review_keys(&session),
        vec![
            "Domain",
            "Signer",
            "HD Path",
            "Auth Data",
            "type",
            "challenge",
            "origin"
        ]
    );
    assert_eq!(value_of(&session, "Domain").unwrap(), "arc60.io");
    assert_eq!(
        value_of(&session, "Signer").unwrap(),
        address::encode(&SIGNER)
    );
    assert_eq!(value_of(&session, "HD Path").unwrap(), "m/44'/283'/0'/0/0");
    assert_eq!(
        value_of(&session, "Auth Data").unwrap(),
        hex::encode(&request.auth_data)
    );
    assert_eq!(value_of(&session, "type").unwrap(), "arc60.create");
    assert_eq!(value_of(&session, "origin").unwrap(), "https://arc60.io");
    println!("✅ Arbitrary-data request reviewed");
}

#[test]
fn test_request_id_row() {
    let mut session = arbitrary_session();
    let request = ArbitraryRequest {
        request_id: b"0A1B2C3D".to_vec(),
        ..Default::default()
    };
    parse(&mut session, &request).unwrap();

    assert_eq!(session.tx_get_num_items().unwrap(), 8);
    let row = session.tx_get_item(2, 0).unwrap();
    assert_eq!(row.key, "Request ID");
    assert_eq!(row.value, "0A1B2C3D");

    let lowercase = ArbitraryRequest {
        request_id: b"0a1b".to_vec(),
        ..Default::default()
    };
    assert_eq!(
        parse(&mut session, &lowercase),
        Err(ParserError::InvalidRequestId)
    );
}

#[test]
fn test_signing_message() {
    let mut session = arbitrary_session();
    let request = ArbitraryRequest::default();
    parse(&mut session, &request).unwrap();

    let mut expected = [0u8; 64];
    expected[..32].copy_from_slice(&sha256(&request.data));
    expected[32..].copy_from_slice(&sha256(&request.auth_data));
    assert_eq!(
        session.signing_payload(),
        Some(SigningPayload::ArbitraryData(expected))
    );
}

#[test]
fn test_domain_auth_failure_exposes_nothing() {
    let mut session = arbitrary_session();
    let request = ArbitraryRequest {
        auth_data: auth_data_for(b"phishing.example"),
        ..Default::default()
    };
    let err = parse(&mut session, &request).unwrap_err();
    assert_eq!(err, ParserError::FailedDomainAuth);
    assert_eq!(err.status_code(), 0x698E);
    assert_eq!(
        err.reply().message.as_deref(),
        Some("Failed Domain Auth")
    );
    assert_eq!(session.tx_get_num_items(), Err(ParserError::NoData));
    assert_eq!(session.tx_get_item(0, 0), Err(ParserError::NoData));
    assert_eq!(session.signing_payload(), None);
}

#[test]
fn test_json_values_are_unescaped() {
    let mut session = arbitrary_session();
    let request = ArbitraryRequest {
        data: br#"{"msg":"say \"hi\"","nested":{"a":[1,2]},"n":42}"#.to_vec(),
        ..Default::default()
    };
    parse(&mut session, &request).unwrap();

    assert_eq!(value_of(&session, "msg").unwrap(), r#"say "hi""#);
    assert_eq!(value_of(&session, "nested").unwrap(), r#"{"a":[1,2]}"#);
    assert_eq!(value_of(&session, "n").unwrap(), "42");
}

#[test]
fn test_signer_and_path_checks() {
    let request = ArbitraryRequest::default();

    let mut session = new_session();
    session.set_hd_path(HdPath::from_account(0));
    assert_eq!(parse(&mut session, &request), Err(ParserError::InvalidSigner));

    session.set_active_public_key([0x99; 32]);
    assert_eq!(parse(&mut session, &request), Err(ParserError::InvalidSigner));

    let mut session = new_session();
    session.set_active_public_key(SIGNER);
    assert_eq!(parse(&mut session, &request), Err(ParserError::FailedHdPath));
}

#[test]
fn test_rejected_requests() {
    let cases = vec![
        (
            ArbitraryRequest {
                scope: 2,
                ..Default::default()
            },
            ParserError::InvalidScope,
        ),
        (
            ArbitraryRequest {
                encoding: 3,
                ..Default::default()
            },
            ParserError::InvalidEncoding,
        ),
        (
            ArbitraryRequest {
                data: b"not json".to_vec(),
                ..Default::default()
            },
            ParserError::BadJson,
        ),
        (
            ArbitraryRequest {
                data: br#"["array"]"#.to_vec(),
                ..Default::default()
            },
            ParserError::BadJson,
        ),
        (
            ArbitraryRequest {
                domain: Vec::new(),
                auth_data: auth_data_for(b""),
                ..Default::default()
            },
            ParserError::MissingDomain,
        ),
        (
            ArbitraryRequest {
                domain: b"tab\tdomain".to_vec(),
                auth_data: auth_data_for(b"tab\tdomain"),
                ..Default::default()
            },
            ParserError::InvalidDomain,
        ),
        (
            ArbitraryRequest {
                auth_data: Vec::new(),
                ..Default::default()
            },
            ParserError::MissingAuthenticatedData,
        ),
    ];

    for (request, expected) in cases {
        let mut session = arbitrary_session();
        assert_eq!(parse(&mut session, &request), Err(expected));
        assert_eq!(session.tx_get_num_items(), Err(ParserError::NoData));
    }
}

#[test]
fn test_truncated_request() {
    let mut session = arbitrary_session();
    let encoded = ArbitraryRequest::default().encode();
    load(&mut session, &encoded[..encoded.len() - 1]);
    assert_eq!(
        session.tx_parse(ContentKind::ArbitraryData),
        Err(ParserError::UnexpectedBufferEnd)
    );
}
