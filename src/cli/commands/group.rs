use super::{
    collect_rows, decode_hex, feed, format_row, to_json, ReviewRow, DEFAULT_CHUNK_SIZE,
};
use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::session::{ContentKind, DecoderSession};
use clap::Args;
use serde::Serialize;
use tracing::info;

/// Review the members of an atomic transaction group
#[derive(Args)]
pub struct GroupCommand {
    /// Hex-encoded member transactions, in group order
    #[arg(required = true, num_args = 1..)]
    pub members: Vec<String>,

    /// Bytes per transport chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Emit the review rows as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct MemberReview {
    member: usize,
    rows: Vec<ReviewRow>,
}

impl GroupCommand {
    pub fn run(&self, config: &AppConfig) -> AppResult<()> {
        let count = u8::try_from(self.members.len()).map_err(|_| {
            AppError::InvalidInput(format!("Too many group members: {}", self.members.len()))
        })?;

        let mut session = DecoderSession::new(config.review, config.buffering);
        // Group members are only reviewed as a summary
        session.set_blind_signing(true);
        session.group_mut().initialize();
        session.group_mut().set_expected_count(count)?;
        info!("Reviewing group of {} transactions", count);

        let mut reviews = Vec::with_capacity(self.members.len());
        for (i, member) in self.members.iter().enumerate() {
            let message = decode_hex(member)?;
            feed(&mut session, &message, self.chunk_size)?;
            session.tx_parse(ContentKind::Transaction)?;

            let rows = collect_rows(&session)?;
            if !self.json {
                println!("Transaction {} of {}", i + 1, count);
                for row in &rows {
                    println!("{}", format_row(row));
                }
            }
            reviews.push(MemberReview {
                member: i + 1,
                rows,
            });
        }

        if self.json {
            println!("{}", to_json(&reviews)?);
        }
        Ok(())
    }
}
