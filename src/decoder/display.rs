//! Projection of decoded records onto paged review screens
//!
//! Every function returns one page of one row. Rows are produced on demand
//! from the decoded record; nothing is rendered ahead of time.

use super::error::{ParserError, ParserResult};
use super::json_index::{strip_backslashes, token_text};
use crate::crypto::{self, address, hd_path::HdPath};
use crate::session::group::GroupSession;
use crate::types::arbitrary::ArbitraryData;
use crate::types::assets::find_asset;
use crate::types::display::{
    AppField, AssetConfigField, AssetFreezeField, AssetTransferField, CommonField, DisplayField,
    DisplayIndex, DisplayItem, KeyRegField, PaymentField,
};
use crate::types::transaction::*;
use crate::utils::currency::{format_amount, format_microalgos};
use crate::utils::paging::page_string;
use std::ops::Range;

/// Rows in a group summary
pub const GROUP_ITEM_COUNT: u8 = 3;

/// Fixed arbitrary-data rows: domain, signer, auth data
const ARBITRARY_FIXED_ROWS: usize = 3;

fn paged(
    key: impl Into<String>,
    value: &str,
    page_idx: usize,
    width: usize,
) -> ParserResult<DisplayField> {
    let (value, page_count) = page_string(value, width, page_idx)?;
    Ok(DisplayField {
        key: key.into(),
        value,
        page_count,
    })
}

/// Row `display_idx` of a single transaction; row 0 is the transaction type
pub fn transaction_field(
    tx: &Transaction,
    display: &DisplayIndex,
    display_idx: usize,
    page_idx: usize,
    page_width: usize,
) -> ParserResult<DisplayField> {
    if display_idx == 0 {
        return paged("Tx type", tx.kind().label(), page_idx, page_width);
    }
    let item = display.get(display_idx - 1).ok_or(ParserError::NoData)?;
    let (key, value) = render_item(tx, item)?;
    paged(key, &value, page_idx, page_width)
}

/// Row `display_idx` of a group summary
pub fn group_field(
    group: &GroupSession,
    display_idx: usize,
    page_idx: usize,
    page_width: usize,
) -> ParserResult<DisplayField> {
    match display_idx {
        0 => {
            let group_id = group.group_id().ok_or(ParserError::NoData)?;
            paged("Group ID", &crypto::base64(&group_id), page_idx, page_width)
        }
        1 => match group.digest() {
            Some(digest) => paged("Group hash", &crypto::base64(&digest), page_idx, page_width),
            None => {
                let progress = format!("{} of {}", group.processed(), group.expected());
                paged("Group txn", &progress, page_idx, page_width)
            }
        },
        2 => paged(
            "Total fee",
            &format_microalgos(group.fee_total()),
            page_idx,
            page_width,
        ),
        _ => Err(ParserError::NoData),
    }
}

/// Number of review rows for an arbitrary-data request
pub fn arbitrary_item_count(request: &ArbitraryData, hd_path: Option<&HdPath>) -> usize {
    ARBITRARY_FIXED_ROWS
        + usize::from(request.request_id.is_some())
        + usize::from(hd_path.is_some())
        + request.json.member_count()
}

/// Row `display_idx` of an arbitrary-data request held in `buf`
pub fn arbitrary_field(
    buf: &[u8],
    request: &ArbitraryData,
    hd_path: Option<&HdPath>,
    display_idx: usize,
    page_idx: usize,
    page_width: usize,
) -> ParserResult<DisplayField> {
    let text = |range: &Range<usize>| text(request.slice(buf, range));

    let mut header: Vec<(&str, String)> = vec![
        ("Domain", text(&request.domain)),
        ("Signer", address::display(&request.signer)),
    ];
    if let Some(request_id) = &request.request_id {
        header.push(("Request ID", text(request_id)));
    }
    if let Some(path) = hd_path {
        header.push(("HD Path", path.to_string()));
    }
    header.push(("Auth Data", hex::encode(request.slice(buf, &request.auth_data))));

    if let Some((key, value)) = header.get(display_idx) {
        return paged(*key, value, page_idx, page_width);
    }

    let data = request.slice(buf, &request.data);
    let (key, value) = request.json.member(display_idx - header.len())?;
    paged(
        String::from_utf8_lossy(token_text(&key, data)),
        &strip_backslashes(token_text(&value, data)),
        page_idx,
        page_width,
    )
}

fn asset_label(asset_id: u64) -> String {
    match find_asset(asset_id) {
        Some(asset) => format!("{} (#{})", asset.name, asset_id),
        None => format!("#{}", asset_id),
    }
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn frozen(flag: bool) -> String {
    let label = if flag { "Frozen" } else { "Unfrozen" };
    label.to_string()
}

fn render_item(tx: &Transaction, item: DisplayItem) -> ParserResult<(String, String)> {
    let row = |key: &str, value: String| -> ParserResult<(String, String)> {
        Ok((key.to_string(), value))
    };

    match (item, &tx.payload) {
        (DisplayItem::Common(field), _) => render_common(&tx.header, field),

        (DisplayItem::Payment(field), TxPayload::Payment(pay)) => match field {
            PaymentField::Receiver => row("Receiver", address::display(&pay.receiver)),
            PaymentField::Amount => row("Amount", format_microalgos(pay.amount)),
            PaymentField::CloseTo => row("Close to", address::display(&pay.close_to)),
        },

        (DisplayItem::KeyReg(field), TxPayload::KeyRegistration(keyreg)) => match field {
            KeyRegField::VotePk => row("Vote PK", crypto::base64(&keyreg.vote_pk)),
            KeyRegField::VrfPk => row("VRF PK", crypto::base64(&keyreg.vrf_pk)),
            KeyRegField::StateProofPk => {
                row("Stateproof PK", crypto::base64(&keyreg.state_proof_pk))
            }
            KeyRegField::VoteFirst => row("Vote first", keyreg.vote_first.to_string()),
            KeyRegField::VoteLast => row("Vote last", keyreg.vote_last.to_string()),
            KeyRegField::KeyDilution => row("Key dilution", keyreg.key_dilution.to_string()),
            KeyRegField::Participating => row(
                "Participating",
                if keyreg.non_participation { "No" } else { "Yes" }.to_string(),
            ),
        },

        (DisplayItem::AssetTransfer(field), TxPayload::AssetTransfer(xfer)) => match field {
            AssetTransferField::AssetId => row("Asset ID", asset_label(xfer.asset_id)),
            AssetTransferField::Amount => match find_asset(xfer.asset_id) {
                Some(asset) => Ok((
                    format!("Amount ({})", asset.unit),
                    format_amount(xfer.amount, asset.decimals),
                )),
                None => row("Amount (base unit)", xfer.amount.to_string()),
            },
            AssetTransferField::Receiver => row("Asset dst", address::display(&xfer.receiver)),
            AssetTransferField::Sender => row("Asset src", address::display(&xfer.sender)),
            AssetTransferField::CloseTo => row("Asset close", address::display(&xfer.close_to)),
        },

        (DisplayItem::AssetFreeze(field), TxPayload::AssetFreeze(freeze)) => match field {
            AssetFreezeField::AssetId => row("Asset ID", asset_label(freeze.asset_id)),
            AssetFreezeField::Account => row("Asset account", address::display(&freeze.account)),
            AssetFreezeField::Flag => row("Freeze flag", frozen(freeze.frozen)),
        },

        (DisplayItem::AssetConfig(field), TxPayload::AssetConfig(config)) => {
            let params = &config.params;
            match field {
                AssetConfigField::AssetId if config.asset_id == 0 => {
                    row("Asset ID", "Create".to_string())
                }
                AssetConfigField::AssetId => row("Asset ID", asset_label(config.asset_id)),
                AssetConfigField::Total => row("Total units", params.total.to_string()),
                AssetConfigField::DefaultFrozen => {
                    row("Default frozen", frozen(params.default_frozen))
                }
                AssetConfigField::UnitName => row("Unit name", text(&params.unit_name)),
                AssetConfigField::Decimals => row("Decimals", params.decimals.to_string()),
                AssetConfigField::AssetName => row("Asset name", text(&params.asset_name)),
                AssetConfigField::Url => row("URL", text(&params.url)),
                AssetConfigField::MetadataHash => {
                    row("Metadata hash", crypto::base64(&params.metadata_hash))
                }
                AssetConfigField::Manager => row("Manager", address::display(&params.manager)),
                AssetConfigField::Reserve => row("Reserve", address::display(&params.reserve)),
                AssetConfigField::Freezer => row("Freezer", address::display(&params.freeze)),
                AssetConfigField::Clawback => row("Clawback", address::display(&params.clawback)),
            }
        }

        (DisplayItem::App(field), TxPayload::ApplicationCall(app)) => render_app(app, field),

        _ => Err(ParserError::UnexpectedError),
    }
}

fn render_common(header: &TxHeader, field: CommonField) -> ParserResult<(String, String)> {
    let (key, value) = match field {
        CommonField::Sender => ("Sender", address::display(&header.sender)),
        CommonField::Lease => {
            let lease = header.lease.ok_or(ParserError::UnexpectedError)?;
            ("Lease", crypto::base64(&lease))
        }
        CommonField::RekeyTo => {
            let rekey = header.rekey.ok_or(ParserError::UnexpectedError)?;
            ("Rekey to", address::display(&rekey))
        }
        CommonField::Fee => ("Fee", format_microalgos(header.fee)),
        CommonField::GenesisId => {
            let id = header.genesis_id.as_ref().ok_or(ParserError::UnexpectedError)?;
            ("Genesis ID", text(id))
        }
        CommonField::GenesisHash => ("Genesis hash", crypto::base64(&header.genesis_hash)),
        CommonField::GroupId => {
            let group_id = header.group_id.ok_or(ParserError::UnexpectedError)?;
            ("Group ID", crypto::base64(&group_id))
        }
        CommonField::Note => {
            let note = header.note.as_ref().ok_or(ParserError::UnexpectedError)?;
            ("Note", format!("{} bytes", note.len()))
        }
    };
    Ok((key.to_string(), value))
}

fn render_app(app: &ApplicationCall, field: AppField) -> ParserResult<(String, String)> {
    fn nth<T>(items: &[T], i: u8) -> ParserResult<&T> {
        items.get(usize::from(i)).ok_or(ParserError::UnexpectedError)
    }
    let schema = |s: &StateSchema| format!("uint: {}, byte: {}", s.num_uint, s.num_byteslice);

    let row = match field {
        AppField::AppId => ("App ID".to_string(), app.app_id.to_string()),
        AppField::OnCompletion => (
            "On completion".to_string(),
            app.on_completion.label().to_string(),
        ),
        AppField::Box(i) => {
            let box_ref = nth(&app.boxes, i)?;
            (
                format!("Box {}", i),
                format!("{}: {}", box_ref.app_index, text(&box_ref.name)),
            )
        }
        AppField::ForeignApp(i) => (
            format!("Foreign app {}", i),
            nth(&app.foreign_apps, i)?.to_string(),
        ),
        AppField::ForeignAsset(i) => (
            format!("Foreign asset {}", i),
            nth(&app.foreign_assets, i)?.to_string(),
        ),
        AppField::Account(i) => (
            format!("App account {}", i),
            address::display(nth(&app.accounts, i)?),
        ),
        AppField::Arg(i) => (
            format!("App arg {} (sha256)", i),
            crypto::base64(&nth(&app.args, i)?.sha256),
        ),
        AppField::GlobalSchema => ("Global schema".to_string(), schema(&app.global_schema)),
        AppField::LocalSchema => ("Local schema".to_string(), schema(&app.local_schema)),
        AppField::ExtraPages => ("Extra pages".to_string(), app.extra_pages.to_string()),
        AppField::ApprovalProgram => (
            "Apprv (sha256)".to_string(),
            crypto::base64(&app.approval_program.sha256),
        ),
        AppField::ClearProgram => (
            "Clear (sha256)".to_string(),
            crypto::base64(&app.clear_program.sha256),
        ),
    };
    Ok(row)
}
