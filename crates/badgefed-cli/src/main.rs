//! # badgefed CLI entry point
//!
//! Parses command-line arguments, loads configuration, opens the database
//! and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use badgefed_cli::accept::{run_accept, AcceptArgs};
use badgefed_cli::db::init_pool;
use badgefed_cli::grant::{run_grant, GrantArgs};
use badgefed_cli::issuer::{run_issuer, IssuerArgs};
use badgefed_cli::recipient::{run_recipient, RecipientArgs};
use badgefed_cli::records::{run_records, RecordsArgs};
use badgefed_cli::sign::{run_sign, SignArgs};
use badgefed_cli::template::{run_template, TemplateArgs};
use badgefed_cli::{CliConfig, CliContext};

/// BadgeFed administrative CLI.
///
/// Registers issuers and templates, grants credentials, fingerprints them
/// with the issuer's RSA key and redeems single-use accept tokens.
#[derive(Parser, Debug)]
#[command(name = "badgefed", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issuing actors.
    Issuer(IssuerArgs),

    /// Credential templates.
    Template(TemplateArgs),

    /// Issue a pending credential record from a template.
    Grant(GrantArgs),

    /// Compute and store a record's fingerprint.
    Sign(SignArgs),

    /// Redeem a record's accept token.
    Accept(AcceptArgs),

    /// Issued credential records.
    Records(RecordsArgs),

    /// Recipients and identifier classification.
    Recipient(RecipientArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("badgefed CLI starting");

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let pool = init_pool(&config).await?;
    let ctx = CliContext::new(pool, config);

    let result = match &cli.command {
        Commands::Issuer(args) => run_issuer(args, &ctx).await,
        Commands::Template(args) => run_template(args, &ctx).await,
        Commands::Grant(args) => run_grant(args, &ctx).await,
        Commands::Sign(args) => run_sign(args, &ctx).await,
        Commands::Accept(args) => run_accept(args, &ctx).await,
        Commands::Records(args) => run_records(args, &ctx).await,
        Commands::Recipient(args) => run_recipient(args, &ctx).await,
    };

    ctx.pool.close().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_grant_with_identifier() {
        let cli = Cli::try_parse_from(["badgefed", "grant", "--template", "3", "--to", "a@b.com"])
            .unwrap();
        if let Commands::Grant(args) = cli.command {
            assert_eq!(args.template, 3);
            assert_eq!(args.to.as_deref(), Some("a@b.com"));
        } else {
            panic!("expected grant");
        }
    }

    #[test]
    fn cli_parse_grant_rejects_mixed_recipient_forms() {
        let parsed = Cli::try_parse_from([
            "badgefed", "grant", "--template", "3", "--to", "a@b.com", "--email", "a@b.com",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn cli_parse_accept_as_flag() {
        let cli = Cli::try_parse_from([
            "badgefed", "accept", "--record", "9", "--token", "t", "--as", "jane@example.social",
        ])
        .unwrap();
        if let Commands::Accept(args) = cli.command {
            assert_eq!(args.record, 9);
            assert_eq!(args.claimant, "jane@example.social");
        } else {
            panic!("expected accept");
        }
    }

    #[test]
    fn cli_parse_template_update() {
        let cli = Cli::try_parse_from([
            "badgefed", "template", "update", "--id", "2", "--title", "Rust", "--issuer", "1",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Template(_)));
    }

    #[test]
    fn cli_parse_verbosity_is_global() {
        let cli = Cli::try_parse_from(["badgefed", "records", "list", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn cli_parse_missing_subcommand_fails() {
        assert!(Cli::try_parse_from(["badgefed"]).is_err());
    }
}
