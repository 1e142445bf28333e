//! # Recipient Subcommand
//!
//! - `add` — store a recipient with any of its identifiers.
//! - `resolve` — classify a free-form identifier and look it up.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use badgefed_core::{Recipient, RecipientIdentifier};

use crate::context::CliContext;
use crate::db;

/// Arguments for the `badgefed recipient` subcommand.
#[derive(Args, Debug)]
pub struct RecipientArgs {
    #[command(subcommand)]
    pub command: RecipientCommand,
}

/// Recipient subcommands.
#[derive(Subcommand, Debug)]
pub enum RecipientCommand {
    /// Store a recipient.
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        fediverse: Option<String>,
        #[arg(long)]
        profile_uri: Option<String>,
    },

    /// Classify an identifier and look up the stored recipient it names.
    Resolve {
        /// Email address, fediverse handle, profile URI or display name.
        identifier: String,
    },
}

/// Execute a recipient subcommand.
pub async fn run_recipient(args: &RecipientArgs, ctx: &CliContext) -> Result<u8> {
    match &args.command {
        RecipientCommand::Add {
            name,
            email,
            fediverse,
            profile_uri,
        } => {
            let recipient = Recipient {
                id: None,
                name: name.clone(),
                email: email.clone(),
                fediverse_handle: fediverse.clone(),
                profile_uri: profile_uri.clone(),
            };
            if recipient == Recipient::default() {
                bail!("at least one of --name, --email, --fediverse, --profile-uri is required");
            }
            let id = db::recipients::insert(&ctx.pool, &recipient).await?;
            println!("OK: stored recipient {}", id.get());
            Ok(0)
        }

        RecipientCommand::Resolve { identifier } => {
            let classified = RecipientIdentifier::classify(identifier);
            println!("Kind: {}", classified.kind());
            if !classified.is_resolvable() {
                println!("  Not resolvable (display name only).");
                return Ok(0);
            }
            match db::recipients::find(&ctx.pool, classified.kind(), classified.value()).await? {
                Some(r) => {
                    println!("  Recipient: {}", r.id.map_or(0, |id| id.get()));
                    print_field("Name", r.name.as_deref());
                    print_field("Email", r.email.as_deref());
                    print_field("Fediverse", r.fediverse_handle.as_deref());
                    print_field("Profile", r.profile_uri.as_deref());
                }
                None => println!("  No stored recipient matches {}.", classified.value()),
            }
            Ok(0)
        }
    }
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        println!("  {label}: {v}");
    }
}
