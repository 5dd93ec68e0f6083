use super::{collect_rows, decode_hex, feed, print_rows, DEFAULT_CHUNK_SIZE};
use crate::config::AppConfig;
use crate::crypto::hd_path::HdPath;
use crate::errors::{AppError, AppResult};
use crate::session::{ContentKind, DecoderSession};
use clap::Args;
use tracing::info;

/// Review an arbitrary-data authentication request
#[derive(Args)]
pub struct DataCommand {
    /// Hex-encoded request blob
    pub hex: String,

    /// Public key the device would sign with (32 bytes hex)
    #[arg(long)]
    pub signer_key: String,

    /// Derivation path of the signing key
    #[arg(long, default_value = "m/44'/283'/0'/0/0")]
    pub hd_path: String,

    /// Emit the review rows as JSON
    #[arg(long)]
    pub json: bool,
}

impl DataCommand {
    pub fn run(&self, config: &AppConfig) -> AppResult<()> {
        let key: [u8; 32] = decode_hex(&self.signer_key)?.try_into().map_err(|_| {
            AppError::InvalidInput("--signer-key must be 32 bytes".to_string())
        })?;
        let path: HdPath = self.hd_path.parse()?;
        let message = decode_hex(&self.hex)?;
        info!(
            "Reviewing {} byte arbitrary-data request for {}",
            message.len(),
            path
        );

        let mut session = DecoderSession::new(config.review, config.buffering);
        session.set_hd_path(path);
        session.set_active_public_key(key);

        feed(&mut session, &message, DEFAULT_CHUNK_SIZE)?;
        session.tx_parse(ContentKind::ArbitraryData)?;

        let rows = collect_rows(&session)?;
        print_rows(&rows, self.json)?;

        if let Some(payload) = session.signing_payload() {
            info!("Message to sign: {}", hex::encode(payload.as_bytes()));
        }
        Ok(())
    }
}
