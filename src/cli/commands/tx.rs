use super::{collect_rows, feed, load_message, print_rows, DEFAULT_CHUNK_SIZE};
use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::session::{ContentKind, DecoderSession};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Review a single msgpack-encoded transaction
#[derive(Args)]
pub struct TxCommand {
    /// Hex-encoded transaction
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub hex: Option<String>,

    /// Read the hex-encoded transaction from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Review application calls without per-field detail
    #[arg(long)]
    pub blind_sign: bool,

    /// Bytes per transport chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Emit the review rows as JSON
    #[arg(long)]
    pub json: bool,
}

impl TxCommand {
    pub fn run(&self, config: &AppConfig) -> AppResult<()> {
        let message = load_message(self.hex.as_deref(), self.file.as_deref())?;
        info!("Reviewing {} byte transaction", message.len());

        let mut session = DecoderSession::new(config.review, config.buffering);
        if self.blind_sign {
            session.set_blind_signing(true);
        }

        feed(&mut session, &message, self.chunk_size)?;
        session.tx_parse(ContentKind::Transaction)?;

        let rows = collect_rows(&session)?;
        print_rows(&rows, self.json)?;

        if let Some(payload) = session.signing_payload() {
            info!("Signing payload: {}", hex::encode(payload.as_bytes()));
        }
        Ok(())
    }
}
