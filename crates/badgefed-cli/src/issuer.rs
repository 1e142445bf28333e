//! # Issuer Subcommand
//!
//! - `add` — register an issuing actor.
//! - `list` — show registered issuers.
//!
//! The private key of issuer `N` is not stored in the database. `sign`
//! reads it from `<key_dir>/N.pem`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::context::CliContext;
use crate::db;
use crate::db::issuers::NewIssuer;

/// Arguments for the `badgefed issuer` subcommand.
#[derive(Args, Debug)]
pub struct IssuerArgs {
    #[command(subcommand)]
    pub command: IssuerCommand,
}

/// Issuer subcommands.
#[derive(Subcommand, Debug)]
pub enum IssuerCommand {
    /// Register an issuing actor.
    Add {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Public actor URI, written onto every record the issuer grants.
        #[arg(long)]
        uri: String,
        /// Domain the issuer is hosted on.
        #[arg(long)]
        domain: String,
        /// PEM file holding the issuer's public key.
        #[arg(long)]
        public_key: Option<PathBuf>,
    },

    /// List registered issuers.
    List,
}

/// Execute an issuer subcommand.
pub async fn run_issuer(args: &IssuerArgs, ctx: &CliContext) -> Result<u8> {
    match &args.command {
        IssuerCommand::Add {
            name,
            uri,
            domain,
            public_key,
        } => {
            let public_key_pem = match public_key {
                Some(path) => Some(std::fs::read_to_string(path).with_context(|| {
                    format!("failed to read public key: {}", path.display())
                })?),
                None => None,
            };
            let issuer = db::issuers::insert(
                &ctx.pool,
                &NewIssuer {
                    name: name.clone(),
                    uri: uri.clone(),
                    domain: domain.clone(),
                    public_key_pem,
                },
            )
            .await
            .with_context(|| format!("failed to register issuer {uri}"))?;

            tracing::info!(issuer = %issuer.id, "issuer registered");
            println!("OK: registered issuer {} ({})", issuer.id.get(), issuer.uri);
            println!(
                "  Private key expected at: {}",
                ctx.config.key_dir.join(format!("{}.pem", issuer.id.get())).display()
            );
            Ok(0)
        }

        IssuerCommand::List => {
            let issuers = db::issuers::load_all(&ctx.pool).await?;
            if issuers.is_empty() {
                println!("No issuers found.");
                return Ok(0);
            }
            println!("Issuers ({}):", issuers.len());
            for issuer in issuers {
                println!("  {}: {} <{}>", issuer.id.get(), issuer.name, issuer.uri);
            }
            Ok(0)
        }
    }
}
