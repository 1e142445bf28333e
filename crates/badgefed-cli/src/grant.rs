//! # Grant Subcommand
//!
//! Issues a pending record from a template and stores it. The recipient is
//! given either field by field or as one free-form `--to` identifier, which
//! is classified and looked up among stored recipients.
//!
//! The accept token is printed once on stdout for out-of-band delivery to
//! the recipient. It is never logged.

use anyhow::{Context, Result};
use clap::Args;

use badgefed_core::{Recipient, RecordId, TemplateId};
use badgefed_issuance::{CredentialRecord, IssuanceEngine};

use crate::context::{CliContext, Directories};
use crate::db;

/// Arguments for the `badgefed grant` subcommand.
#[derive(Args, Debug, Default)]
pub struct GrantArgs {
    /// Template id.
    #[arg(long)]
    pub template: i64,
    /// Free-form recipient identifier (email, handle, profile URI or name).
    #[arg(long, conflicts_with_all = ["name", "email", "fediverse", "profile_uri"])]
    pub to: Option<String>,
    /// Recipient display name.
    #[arg(long)]
    pub name: Option<String>,
    /// Recipient email address.
    #[arg(long)]
    pub email: Option<String>,
    /// Recipient fediverse handle.
    #[arg(long)]
    pub fediverse: Option<String>,
    /// Recipient profile URI.
    #[arg(long)]
    pub profile_uri: Option<String>,
}

impl GrantArgs {
    fn explicit_recipient(&self) -> Option<Recipient> {
        let recipient = Recipient {
            id: None,
            name: self.name.clone(),
            email: self.email.clone(),
            fediverse_handle: self.fediverse.clone(),
            profile_uri: self.profile_uri.clone(),
        };
        (recipient != Recipient::default()).then_some(recipient)
    }
}

/// Execute the grant subcommand.
pub async fn run_grant(args: &GrantArgs, ctx: &CliContext) -> Result<u8> {
    let (id, record) = grant(args, ctx).await?;
    let token = record
        .acceptance
        .accept_key()
        .map(|k| k.as_str().to_string())
        .unwrap_or_default();

    println!("OK: granted record {} \"{}\"", id.get(), record.title);
    println!("  Issued to: {}", display_or_dash(&record.issued_to));
    println!("  Accept key: {token}");
    Ok(0)
}

/// Build, store and return a pending record.
pub async fn grant(args: &GrantArgs, ctx: &CliContext) -> Result<(RecordId, CredentialRecord)> {
    let dirs = Directories::load(&ctx.pool).await?;
    let engine = IssuanceEngine::new(&dirs.issuers, &dirs.templates, &dirs.recipients);

    let recipient = match &args.to {
        Some(to) => Some(engine.resolve_recipient(to)?),
        None => args.explicit_recipient(),
    };

    let template_id = TemplateId(args.template);
    let record = engine
        .grant_by_id(template_id, recipient.as_ref())
        .with_context(|| format!("cannot grant from template {}", args.template))?;

    let id = db::records::insert(&ctx.pool, &record)
        .await
        .context("failed to store granted record")?;

    tracing::info!(record_id = %id, template_id = %template_id, "credential granted");
    Ok((id, record))
}

fn display_or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}
