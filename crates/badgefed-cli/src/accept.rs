//! # Accept Subcommand
//!
//! Redeems a record's single-use accept token. The check and the state
//! change are one conditional `UPDATE`, so concurrent redemptions of the
//! same token succeed at most once.
//!
//! A wrong token, an unknown record and an already accepted record all
//! print the same message and exit with code 2.

use anyhow::Result;
use clap::Args;

use badgefed_core::{BadgeError, RecordId, Timestamp};
use badgefed_issuance::CredentialRecord;

use crate::context::CliContext;
use crate::db;

/// Exit code for a failed redemption.
pub const EXIT_REDEMPTION_FAILED: u8 = 2;

/// Message shown for every failed redemption.
pub const REDEMPTION_FAILED_MESSAGE: &str = "this link is invalid or already used";

/// Arguments for the `badgefed accept` subcommand.
#[derive(Args, Debug)]
pub struct AcceptArgs {
    /// Record id.
    #[arg(long)]
    pub record: i64,
    /// Accept token delivered to the recipient.
    #[arg(long)]
    pub token: String,
    /// Identity the recipient accepts as.
    #[arg(long = "as")]
    pub claimant: String,
}

/// Execute the accept subcommand.
pub async fn run_accept(args: &AcceptArgs, ctx: &CliContext) -> Result<u8> {
    match redeem(ctx, RecordId(args.record), &args.token, &args.claimant).await {
        Ok(record) => {
            println!("OK: record {} accepted", args.record);
            if let Some(on) = record.accepted_on() {
                println!("  Accepted on: {on}");
            }
            println!("  Issued to: {}", record.issued_to);
            Ok(0)
        }
        Err(e) => {
            let refused = e
                .downcast_ref::<BadgeError>()
                .map_or(false, BadgeError::is_redemption_failure);
            if !refused {
                return Err(e);
            }
            tracing::debug!(record_id = args.record, error = %e, "redemption refused");
            eprintln!("{REDEMPTION_FAILED_MESSAGE}");
            Ok(EXIT_REDEMPTION_FAILED)
        }
    }
}

/// Redeem `token` for record `id` as `claimant`.
///
/// # Errors
///
/// - [`BadgeError::NotFound`] if the record is unknown or the token does not
///   match its pending token.
/// - [`BadgeError::InvalidState`] if another redemption won the race.
pub async fn redeem(
    ctx: &CliContext,
    id: RecordId,
    token: &str,
    claimant: &str,
) -> Result<CredentialRecord> {
    let claimable = db::records::get_by_id(&ctx.pool, id)
        .await?
        .filter(|record| record.acceptance.admits(token));
    if claimable.is_none() {
        return Err(BadgeError::NotFound(format!("claimable record {id}")).into());
    }

    let now = Timestamp::now();
    if !db::records::conditional_accept(&ctx.pool, id, token, claimant, now).await? {
        return Err(BadgeError::InvalidState(format!("{id} is no longer pending")).into());
    }
    tracing::info!(record_id = %id, "record accepted");

    db::records::get_by_id(&ctx.pool, id)
        .await?
        .ok_or_else(|| BadgeError::NotFound(format!("{id}")).into())
}
