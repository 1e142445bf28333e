//! # Sign Subcommand
//!
//! Computes the fingerprint of a stored record with its issuer's private
//! key and stores it on the record. Keys are read from the configured key
//! directory on each invocation.

use anyhow::{bail, Context, Result};
use clap::Args;

use badgefed_core::RecordId;
use badgefed_crypto::{Fingerprint, FingerprintSigner, KeyDirectoryProvider};
use badgefed_issuance::RecordSigner;

use crate::context::{CliContext, Directories};
use crate::db;

/// Arguments for the `badgefed sign` subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Record id.
    #[arg(long)]
    pub record: i64,
}

/// Execute the sign subcommand.
pub async fn run_sign(args: &SignArgs, ctx: &CliContext) -> Result<u8> {
    let fingerprint = sign_record(RecordId(args.record), ctx).await?;
    println!("OK: fingerprinted record {}", args.record);
    println!("  Fingerprint: {fingerprint}");
    Ok(0)
}

/// Fingerprint record `id` and persist the result.
pub async fn sign_record(id: RecordId, ctx: &CliContext) -> Result<Fingerprint> {
    let Some(record) = db::records::get_by_id(&ctx.pool, id).await? else {
        bail!("record {} not found", id.get());
    };

    let dirs = Directories::load(&ctx.pool).await?;
    let signer = FingerprintSigner::new(KeyDirectoryProvider::new(ctx.config.key_dir.clone()));
    let signed = RecordSigner::new(&signer, &dirs.issuers)
        .sign(record)
        .with_context(|| format!("cannot fingerprint record {}", id.get()))?;

    let Some(fingerprint) = signed.fingerprint else {
        bail!("signer returned record {} without a fingerprint", id.get());
    };
    if !db::records::set_fingerprint(&ctx.pool, id, &fingerprint).await? {
        bail!("record {} disappeared while signing", id.get());
    }
    Ok(fingerprint)
}
