//! Algorand transaction decoder
//!
//! Fields may arrive in any order, so every field is located with a key seek
//! from the start of the top-level map followed by a typed read. Unknown keys
//! are ignored. Each field that should be reviewed is appended to the display
//! index as soon as it has been read, which keeps the review order identical
//! to the read order below.
//!
//! Decoding moves through Start -> TypeRead -> CommonFieldsRead ->
//! KindFieldsRead -> Done; a step taken out of order is refused.

use super::error::{ParserError, ParserResult};
use super::reader::{Reader, MAX_KEY_LEN};
use crate::crypto;
use crate::types::display::{
    AppField, AssetConfigField, AssetFreezeField, AssetTransferField, CommonField, DisplayIndex,
    DisplayItem, KeyRegField, PaymentField,
};
use crate::types::transaction::*;
use arrayvec::ArrayVec;
use tracing::debug;

// Common keys
const KEY_TYPE: &str = "type";
const KEY_SENDER: &str = "snd";
const KEY_LEASE: &str = "lx";
const KEY_REKEY: &str = "rekey";
const KEY_FEE: &str = "fee";
const KEY_GENESIS_ID: &str = "gen";
const KEY_GENESIS_HASH: &str = "gh";
const KEY_GROUP_ID: &str = "grp";
const KEY_NOTE: &str = "note";
const KEY_FIRST_VALID: &str = "fv";
const KEY_LAST_VALID: &str = "lv";

// Payment
const KEY_PAY_RECEIVER: &str = "rcv";
const KEY_PAY_AMOUNT: &str = "amt";
const KEY_PAY_CLOSE: &str = "close";

// Key registration
const KEY_VOTE_PK: &str = "votekey";
const KEY_VRF_PK: &str = "selkey";
const KEY_STATE_PROOF_PK: &str = "sprfkey";
const KEY_VOTE_FIRST: &str = "votefst";
const KEY_VOTE_LAST: &str = "votelst";
const KEY_VOTE_KEY_DILUTION: &str = "votekd";
const KEY_NON_PARTICIPATION: &str = "nonpart";

// Asset transfer
const KEY_XFER_ID: &str = "xaid";
const KEY_XFER_AMOUNT: &str = "aamt";
const KEY_XFER_RECEIVER: &str = "arcv";
const KEY_XFER_SENDER: &str = "asnd";
const KEY_XFER_CLOSE: &str = "aclose";

// Asset freeze
const KEY_FREEZE_ID: &str = "faid";
const KEY_FREEZE_ACCOUNT: &str = "fadd";
const KEY_FREEZE_FLAG: &str = "afrz";

// Asset config
const KEY_CONFIG_ID: &str = "caid";
const KEY_CONFIG_PARAMS: &str = "apar";

// Application call
const KEY_APP_ID: &str = "apid";
const KEY_APP_ON_COMPLETION: &str = "apan";
const KEY_APP_BOXES: &str = "apbx";
const KEY_APP_FOREIGN_APPS: &str = "apfa";
const KEY_APP_FOREIGN_ASSETS: &str = "apas";
const KEY_APP_ACCOUNTS: &str = "apat";
const KEY_APP_ARGS: &str = "apaa";
const KEY_APP_GLOBAL_SCHEMA: &str = "apgs";
const KEY_APP_LOCAL_SCHEMA: &str = "apls";
const KEY_APP_EXTRA_PAGES: &str = "apep";
const KEY_APP_APPROVAL: &str = "apap";
const KEY_APP_CLEAR: &str = "apsu";

/// `type` values are short; anything longer is not a known kind
const MAX_TYPE_LEN: usize = 10;

/// Presentation order of asset parameters, independent of wire order
const ASSET_PARAM_ORDER: [AssetConfigField; 11] = [
    AssetConfigField::Total,
    AssetConfigField::DefaultFrozen,
    AssetConfigField::UnitName,
    AssetConfigField::Decimals,
    AssetConfigField::AssetName,
    AssetConfigField::Url,
    AssetConfigField::MetadataHash,
    AssetConfigField::Manager,
    AssetConfigField::Reserve,
    AssetConfigField::Freezer,
    AssetConfigField::Clawback,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    Start,
    TypeRead,
    CommonFieldsRead,
    KindFieldsRead,
    Done,
}

/// A decoded transaction together with the fields to review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTransaction {
    pub tx: Transaction,
    pub display: DisplayIndex,
}

/// Decode a msgpack-encoded transaction
///
/// With `blind_signing` set, application calls only list sender and rekey
/// for review. Without it every field is listed, so a single transaction
/// never needs blind signing; the one review that cannot show per-field
/// detail is a group summary, which the session refuses with
/// [`ParserError::BlindsignModeRequired`] before calling this.
pub fn decode_transaction(buf: &[u8], blind_signing: bool) -> ParserResult<DecodedTransaction> {
    TransactionDecoder::new(buf, blind_signing).decode()
}

pub struct TransactionDecoder<'a> {
    reader: Reader<'a>,
    blind_signing: bool,
    stage: DecodeStage,
    kind: Option<TxKind>,
    display: DisplayIndex,
}

impl<'a> TransactionDecoder<'a> {
    pub fn new(buf: &'a [u8], blind_signing: bool) -> Self {
        Self {
            reader: Reader::new(buf),
            blind_signing,
            stage: DecodeStage::Start,
            kind: None,
            display: DisplayIndex::new(),
        }
    }

    pub fn stage(&self) -> DecodeStage {
        self.stage
    }

    pub fn decode(mut self) -> ParserResult<DecodedTransaction> {
        if self.reader.is_buffer_empty() {
            return Err(ParserError::InitContextEmpty);
        }
        let entries = self.reader.read_map_size()?;
        if entries > u16::from(u8::MAX) {
            return Err(ParserError::UnexpectedNumberItems);
        }

        let kind = self.read_type()?;
        let header = self.read_header()?;
        let payload = self.read_payload()?;
        self.advance(DecodeStage::KindFieldsRead, DecodeStage::Done)?;

        debug!(
            "Decoded {} transaction: {} map entries, {} display items ({} common)",
            kind.label(),
            entries,
            self.display.len(),
            self.display.common_count()
        );

        Ok(DecodedTransaction {
            tx: Transaction { header, payload },
            display: self.display,
        })
    }

    fn expect_stage(&self, expected: DecodeStage) -> ParserResult<()> {
        if self.stage != expected {
            return Err(ParserError::FieldOutOfOrder);
        }
        Ok(())
    }

    fn advance(&mut self, from: DecodeStage, to: DecodeStage) -> ParserResult<()> {
        self.expect_stage(from)?;
        self.stage = to;
        Ok(())
    }

    /// Seek an optional key; `false` when it is absent
    fn seek(&mut self, key: &str) -> ParserResult<bool> {
        match self.reader.find_key(key) {
            Ok(()) => Ok(true),
            Err(ParserError::NoData) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Seek a mandatory key
    fn require(&mut self, key: &'static str) -> ParserResult<()> {
        if self.seek(key)? {
            Ok(())
        } else {
            Err(ParserError::MissingField(key))
        }
    }

    fn show(&mut self, item: DisplayItem) -> ParserResult<()> {
        self.display.push(item)
    }

    fn show_common(&mut self, field: CommonField) -> ParserResult<()> {
        let hidden = self.blind_signing
            && self.kind == Some(TxKind::ApplicationCall)
            && !matches!(field, CommonField::Sender | CommonField::RekeyTo);
        if hidden {
            return Ok(());
        }
        self.show(DisplayItem::Common(field))
    }

    fn show_app(&mut self, field: AppField) -> ParserResult<()> {
        if self.blind_signing {
            return Ok(());
        }
        self.show(DisplayItem::App(field))
    }

    fn read_type(&mut self) -> ParserResult<TxKind> {
        self.expect_stage(DecodeStage::Start)?;
        self.require(KEY_TYPE)?;
        let tag = self.reader.read_string(MAX_TYPE_LEN)?;
        let kind = TxKind::from_wire(tag).ok_or_else(|| {
            debug!("Unknown transaction type {:?}", String::from_utf8_lossy(tag));
            ParserError::UnknownTransaction
        })?;
        self.kind = Some(kind);
        self.stage = DecodeStage::TypeRead;
        Ok(kind)
    }

    fn read_header(&mut self) -> ParserResult<TxHeader> {
        self.expect_stage(DecodeStage::TypeRead)?;
        let mut header = TxHeader::default();

        self.require(KEY_SENDER)?;
        header.sender = self.reader.read_bin_fixed()?;
        self.show_common(CommonField::Sender)?;

        if self.seek(KEY_LEASE)? {
            header.lease = Some(self.reader.read_bin_fixed()?);
            self.show_common(CommonField::Lease)?;
        }

        if self.seek(KEY_REKEY)? {
            header.rekey = Some(self.reader.read_bin_fixed()?);
            self.show_common(CommonField::RekeyTo)?;
        }

        if self.seek(KEY_FEE)? {
            header.fee = self.reader.read_integer()?;
        }
        self.show_common(CommonField::Fee)?;

        if self.seek(KEY_GENESIS_ID)? {
            let id = self.reader.read_string(MAX_GENESIS_ID_LEN)?;
            header.genesis_id = Some(bounded(id)?);
            self.show_common(CommonField::GenesisId)?;
        }

        self.require(KEY_GENESIS_HASH)?;
        header.genesis_hash = self.reader.read_bin_fixed()?;
        self.show_common(CommonField::GenesisHash)?;

        if self.seek(KEY_GROUP_ID)? {
            header.group_id = Some(self.reader.read_bin_fixed()?);
            self.show_common(CommonField::GroupId)?;
        }

        if self.seek(KEY_NOTE)? {
            let len = self.reader.read_bin_header()?;
            if len > MAX_NOTE_LEN {
                return Err(ParserError::UnexpectedValue);
            }
            header.note = Some(bounded(self.reader.read_bytes(len)?)?);
            self.show_common(CommonField::Note)?;
        }

        // Validity rounds are checked but never reviewed
        self.require(KEY_FIRST_VALID)?;
        header.first_valid = self.reader.read_integer()?;
        self.require(KEY_LAST_VALID)?;
        header.last_valid = self.reader.read_integer()?;

        self.stage = DecodeStage::CommonFieldsRead;
        Ok(header)
    }

    fn read_payload(&mut self) -> ParserResult<TxPayload> {
        self.expect_stage(DecodeStage::CommonFieldsRead)?;
        let kind = self.kind.ok_or(ParserError::FieldOutOfOrder)?;
        let payload = match kind {
            TxKind::Payment => TxPayload::Payment(self.read_payment()?),
            TxKind::KeyRegistration => TxPayload::KeyRegistration(self.read_key_registration()?),
            TxKind::AssetTransfer => TxPayload::AssetTransfer(self.read_asset_transfer()?),
            TxKind::AssetFreeze => TxPayload::AssetFreeze(self.read_asset_freeze()?),
            TxKind::AssetConfig => TxPayload::AssetConfig(self.read_asset_config()?),
            TxKind::ApplicationCall => TxPayload::ApplicationCall(self.read_application()?),
        };
        self.stage = DecodeStage::KindFieldsRead;
        Ok(payload)
    }

    fn read_payment(&mut self) -> ParserResult<Payment> {
        let mut pay = Payment::default();

        self.require(KEY_PAY_RECEIVER)?;
        pay.receiver = self.reader.read_bin_fixed()?;
        self.show(DisplayItem::Payment(PaymentField::Receiver))?;

        if self.seek(KEY_PAY_AMOUNT)? {
            pay.amount = self.reader.read_integer()?;
        }
        self.show(DisplayItem::Payment(PaymentField::Amount))?;

        if self.seek(KEY_PAY_CLOSE)? {
            pay.close_to = self.reader.read_bin_fixed()?;
            self.show(DisplayItem::Payment(PaymentField::CloseTo))?;
        }

        Ok(pay)
    }

    fn read_key_registration(&mut self) -> ParserResult<KeyRegistration> {
        let mut keyreg = KeyRegistration::default();

        if self.seek(KEY_VOTE_PK)? {
            keyreg.vote_pk = self.reader.read_bin_fixed()?;
            self.show(DisplayItem::KeyReg(KeyRegField::VotePk))?;
        }

        if self.seek(KEY_VRF_PK)? {
            keyreg.vrf_pk = self.reader.read_bin_fixed()?;
            self.show(DisplayItem::KeyReg(KeyRegField::VrfPk))?;
        }

        if self.seek(KEY_STATE_PROOF_PK)? {
            keyreg.state_proof_pk = self.reader.read_bin_fixed()?;
            self.show(DisplayItem::KeyReg(KeyRegField::StateProofPk))?;
        }

        // The voting window comes as a pair
        if self.seek(KEY_VOTE_FIRST)? {
            keyreg.vote_first = self.reader.read_integer()?;
            self.show(DisplayItem::KeyReg(KeyRegField::VoteFirst))?;

            self.require(KEY_VOTE_LAST)?;
            keyreg.vote_last = self.reader.read_integer()?;
            self.show(DisplayItem::KeyReg(KeyRegField::VoteLast))?;
        }

        if self.seek(KEY_VOTE_KEY_DILUTION)? {
            keyreg.key_dilution = self.reader.read_integer()?;
            self.show(DisplayItem::KeyReg(KeyRegField::KeyDilution))?;
        }

        if self.seek(KEY_NON_PARTICIPATION)? {
            keyreg.non_participation = self.reader.read_bool()?;
        }
        self.show(DisplayItem::KeyReg(KeyRegField::Participating))?;

        Ok(keyreg)
    }

    fn read_asset_transfer(&mut self) -> ParserResult<AssetTransfer> {
        let mut xfer = AssetTransfer::default();

        self.require(KEY_XFER_ID)?;
        xfer.asset_id = self.reader.read_integer()?;
        self.show(DisplayItem::AssetTransfer(AssetTransferField::AssetId))?;

        if self.seek(KEY_XFER_AMOUNT)? {
            xfer.amount = self.reader.read_integer()?;
        }
        self.show(DisplayItem::AssetTransfer(AssetTransferField::Amount))?;

        self.require(KEY_XFER_RECEIVER)?;
        xfer.receiver = self.reader.read_bin_fixed()?;
        self.show(DisplayItem::AssetTransfer(AssetTransferField::Receiver))?;

        if self.seek(KEY_XFER_SENDER)? {
            xfer.sender = self.reader.read_bin_fixed()?;
            self.show(DisplayItem::AssetTransfer(AssetTransferField::Sender))?;
        }

        if self.seek(KEY_XFER_CLOSE)? {
            xfer.close_to = self.reader.read_bin_fixed()?;
            self.show(DisplayItem::AssetTransfer(AssetTransferField::CloseTo))?;
        }

        Ok(xfer)
    }

    fn read_asset_freeze(&mut self) -> ParserResult<AssetFreeze> {
        let mut freeze = AssetFreeze::default();

        self.require(KEY_FREEZE_ID)?;
        freeze.asset_id = self.reader.read_integer()?;
        self.show(DisplayItem::AssetFreeze(AssetFreezeField::AssetId))?;

        self.require(KEY_FREEZE_ACCOUNT)?;
        freeze.account = self.reader.read_bin_fixed()?;
        self.show(DisplayItem::AssetFreeze(AssetFreezeField::Account))?;

        if self.seek(KEY_FREEZE_FLAG)? {
            freeze.frozen = self.reader.read_bool()?;
        }
        self.show(DisplayItem::AssetFreeze(AssetFreezeField::Flag))?;

        Ok(freeze)
    }

    fn read_asset_config(&mut self) -> ParserResult<AssetConfig> {
        let mut config = AssetConfig::default();

        if self.seek(KEY_CONFIG_ID)? {
            config.asset_id = self.reader.read_integer()?;
        }
        self.show(DisplayItem::AssetConfig(AssetConfigField::AssetId))?;

        if self.seek(KEY_CONFIG_PARAMS)? {
            let (params, present) = self.read_asset_params()?;
            config.params = params;
            for field in ASSET_PARAM_ORDER {
                if present.contains(&field) {
                    self.show(DisplayItem::AssetConfig(field))?;
                }
            }
        }

        Ok(config)
    }

    /// Read the nested `apar` map; returns the params and which were present
    fn read_asset_params(
        &mut self,
    ) -> ParserResult<(AssetParams, ArrayVec<AssetConfigField, 12>)> {
        let entries = self.reader.read_map_size()?;
        if entries > MAX_ASSET_PARAMS {
            return Err(ParserError::UnexpectedNumberItems);
        }

        let mut params = AssetParams::default();
        let mut present: ArrayVec<AssetConfigField, 12> = ArrayVec::new();

        for _ in 0..entries {
            let key = self.reader.read_string(MAX_KEY_LEN)?;
            let field = match key {
                b"t" => {
                    params.total = self.reader.read_integer()?;
                    AssetConfigField::Total
                }
                b"df" => {
                    params.default_frozen = self.reader.read_bool()?;
                    AssetConfigField::DefaultFrozen
                }
                b"un" => {
                    params.unit_name = bounded(self.reader.read_string(MAX_UNIT_NAME_LEN)?)?;
                    AssetConfigField::UnitName
                }
                b"dc" => {
                    let decimals = self.reader.read_integer()?;
                    if decimals > u64::from(MAX_ASSET_DECIMALS) {
                        return Err(ParserError::ValueOutOfRange);
                    }
                    params.decimals = decimals as u8;
                    AssetConfigField::Decimals
                }
                b"an" => {
                    params.asset_name = bounded(self.reader.read_string(MAX_ASSET_NAME_LEN)?)?;
                    AssetConfigField::AssetName
                }
                b"au" => {
                    params.url = bounded(self.reader.read_string(MAX_ASSET_URL_LEN)?)?;
                    AssetConfigField::Url
                }
                b"am" => {
                    params.metadata_hash = self.reader.read_bin_fixed()?;
                    AssetConfigField::MetadataHash
                }
                b"m" => {
                    params.manager = self.reader.read_bin_fixed()?;
                    AssetConfigField::Manager
                }
                b"r" => {
                    params.reserve = self.reader.read_bin_fixed()?;
                    AssetConfigField::Reserve
                }
                b"f" => {
                    params.freeze = self.reader.read_bin_fixed()?;
                    AssetConfigField::Freezer
                }
                b"c" => {
                    params.clawback = self.reader.read_bin_fixed()?;
                    AssetConfigField::Clawback
                }
                other => {
                    debug!(
                        "Skipping unknown asset param {:?}",
                        String::from_utf8_lossy(other)
                    );
                    self.reader.skip_value()?;
                    continue;
                }
            };
            if !present.contains(&field) {
                present
                    .try_push(field)
                    .map_err(|_| ParserError::UnexpectedNumberItems)?;
            }
        }

        Ok((params, present))
    }

    fn read_application(&mut self) -> ParserResult<ApplicationCall> {
        let mut app = ApplicationCall::default();

        if self.seek(KEY_APP_ID)? {
            app.app_id = self.reader.read_integer()?;
        }
        self.show_app(AppField::AppId)?;

        if self.seek(KEY_APP_ON_COMPLETION)? {
            let value = self.reader.read_integer()?;
            app.on_completion =
                OnCompletion::from_u64(value).ok_or(ParserError::ValueOutOfRange)?;
        }
        self.show_app(AppField::OnCompletion)?;

        if self.seek(KEY_APP_BOXES)? {
            app.boxes = self.read_boxes()?;
            for i in 0..app.boxes.len() {
                self.show_app(AppField::Box(i as u8))?;
            }
        }

        if self.seek(KEY_APP_FOREIGN_APPS)? {
            app.foreign_apps = self.read_id_list()?;
            for i in 0..app.foreign_apps.len() {
                self.show_app(AppField::ForeignApp(i as u8))?;
            }
        }

        if self.seek(KEY_APP_FOREIGN_ASSETS)? {
            app.foreign_assets = self.read_id_list()?;
            for i in 0..app.foreign_assets.len() {
                self.show_app(AppField::ForeignAsset(i as u8))?;
            }
        }

        let accounts = if self.seek(KEY_APP_ACCOUNTS)? {
            self.read_accounts()?
        } else {
            ArrayVec::new()
        };
        let referenced = accounts.len() + app.foreign_apps.len() + app.foreign_assets.len();
        if referenced > ACCT_FOREIGN_LIMIT {
            debug!(
                "Application call references {} accounts/apps/assets, limit is {}",
                referenced, ACCT_FOREIGN_LIMIT
            );
            return Err(ParserError::UnexpectedNumberItems);
        }
        app.accounts = accounts;
        for i in 0..app.accounts.len() {
            self.show_app(AppField::Account(i as u8))?;
        }

        // Box references index into the foreign apps, 0 being the called app
        if app
            .boxes
            .iter()
            .any(|b| usize::from(b.app_index) > app.foreign_apps.len())
        {
            return Err(ParserError::ValueOutOfRange);
        }

        if self.seek(KEY_APP_ARGS)? {
            app.args = self.read_args()?;
            for i in 0..app.args.len() {
                self.show_app(AppField::Arg(i as u8))?;
            }
        }

        if self.seek(KEY_APP_GLOBAL_SCHEMA)? {
            app.global_schema = self.read_schema()?;
            self.show_app(AppField::GlobalSchema)?;
        }

        if self.seek(KEY_APP_LOCAL_SCHEMA)? {
            app.local_schema = self.read_schema()?;
            self.show_app(AppField::LocalSchema)?;
        }

        if self.seek(KEY_APP_EXTRA_PAGES)? {
            let pages = self.reader.read_integer()?;
            if pages > u64::from(MAX_EXTRA_PAGES) {
                return Err(ParserError::TooManyExtraPages);
            }
            app.extra_pages = pages as u8;
            self.show_app(AppField::ExtraPages)?;
        }

        if self.seek(KEY_APP_APPROVAL)? {
            app.approval_program = digest(self.reader.read_bin(MAX_PROGRAM_LEN)?);
            self.show_app(AppField::ApprovalProgram)?;
        }

        if self.seek(KEY_APP_CLEAR)? {
            app.clear_program = digest(self.reader.read_bin(MAX_PROGRAM_LEN)?);
            self.show_app(AppField::ClearProgram)?;
        }

        if app.app_id == 0 {
            let program_len = app.approval_program.len + app.clear_program.len;
            let limit = PAGE_LEN * (1 + usize::from(app.extra_pages));
            if program_len > limit {
                return Err(ParserError::ProgramFieldsTooLong);
            }
        }

        Ok(app)
    }

    fn read_id_list<const N: usize>(&mut self) -> ParserResult<ArrayVec<u64, N>> {
        let count = usize::from(self.reader.read_array_size()?);
        if count > N {
            return Err(ParserError::UnexpectedNumberItems);
        }
        let mut ids = ArrayVec::new();
        for _ in 0..count {
            ids.try_push(self.reader.read_integer()?)
                .map_err(|_| ParserError::UnexpectedNumberItems)?;
        }
        Ok(ids)
    }

    fn read_accounts(&mut self) -> ParserResult<ArrayVec<Address, MAX_ACCOUNTS>> {
        let count = usize::from(self.reader.read_array_size()?);
        if count > MAX_ACCOUNTS {
            return Err(ParserError::UnexpectedNumberItems);
        }
        let mut accounts = ArrayVec::new();
        for _ in 0..count {
            accounts
                .try_push(self.reader.read_bin_fixed()?)
                .map_err(|_| ParserError::UnexpectedNumberItems)?;
        }
        Ok(accounts)
    }

    fn read_args(&mut self) -> ParserResult<ArrayVec<Digest, MAX_ARGS>> {
        let count = usize::from(self.reader.read_array_size()?);
        if count > MAX_ARGS {
            return Err(ParserError::UnexpectedNumberItems);
        }
        let mut args = ArrayVec::new();
        let mut total_len = 0usize;
        for _ in 0..count {
            let arg = self.reader.read_bin(MAX_ARG_LEN)?;
            total_len += arg.len();
            if total_len > MAX_ARG_LEN {
                return Err(ParserError::UnexpectedNumberItems);
            }
            args.try_push(digest(arg))
                .map_err(|_| ParserError::UnexpectedNumberItems)?;
        }
        Ok(args)
    }

    fn read_boxes(&mut self) -> ParserResult<ArrayVec<BoxRef, MAX_BOXES>> {
        let count = usize::from(self.reader.read_array_size()?);
        if count > MAX_BOXES {
            return Err(ParserError::UnexpectedNumberItems);
        }
        let mut boxes = ArrayVec::new();
        for _ in 0..count {
            let entries = self.reader.read_map_size()?;
            if entries > 2 {
                return Err(ParserError::UnexpectedNumberItems);
            }
            let mut box_ref = BoxRef::default();
            for _ in 0..entries {
                match self.reader.read_string(MAX_KEY_LEN)? {
                    b"i" => {
                        let index = self.reader.read_integer()?;
                        box_ref.app_index =
                            u8::try_from(index).map_err(|_| ParserError::ValueOutOfRange)?;
                    }
                    b"n" => {
                        box_ref.name = bounded(self.reader.read_bin(MAX_BOX_NAME_LEN)?)?;
                    }
                    _ => return Err(ParserError::UnexpectedKey),
                }
            }
            boxes
                .try_push(box_ref)
                .map_err(|_| ParserError::UnexpectedNumberItems)?;
        }
        Ok(boxes)
    }

    fn read_schema(&mut self) -> ParserResult<StateSchema> {
        let entries = self.reader.read_map_size()?;
        if entries > 2 {
            return Err(ParserError::UnexpectedNumberItems);
        }
        let mut schema = StateSchema::default();
        for _ in 0..entries {
            match self.reader.read_string(MAX_KEY_LEN)? {
                b"nui" => schema.num_uint = self.reader.read_integer()?,
                b"nbs" => schema.num_byteslice = self.reader.read_integer()?,
                _ => return Err(ParserError::UnexpectedKey),
            }
        }
        Ok(schema)
    }
}

/// Copy a length-checked slice into a fixed-capacity buffer
fn bounded<const N: usize>(bytes: &[u8]) -> ParserResult<ArrayVec<u8, N>> {
    let mut out = ArrayVec::new();
    out.try_extend_from_slice(bytes)
        .map_err(|_| ParserError::StrTooBig)?;
    Ok(out)
}

fn digest(bytes: &[u8]) -> Digest {
    Digest {
        len: bytes.len(),
        sha256: crypto::sha256(bytes),
    }
}
