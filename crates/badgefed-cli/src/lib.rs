//! # badgefed-cli — BadgeFed Administrative CLI
//!
//! Operates the credential protocol against a SQLite database.
//!
//! ## Subcommands
//!
//! - `issuer` — register and list issuing actors
//! - `template` — create, edit, list and delete credential templates
//! - `grant` — issue a pending credential record from a template
//! - `sign` — compute and store a record's fingerprint
//! - `accept` — redeem a record's single-use accept token
//! - `records` — list issued records
//! - `recipient` — register recipients and classify identifiers
//!
//! ## Crate Policy
//!
//! - Argument parsing lives next to each handler; business rules live in
//!   `badgefed-issuance` and `badgefed-state`.
//! - Handlers return `anyhow::Result<u8>` where the `u8` is the process exit
//!   code.

pub mod accept;
pub mod config;
pub mod context;
pub mod db;
pub mod grant;
pub mod issuer;
pub mod recipient;
pub mod records;
pub mod sign;
pub mod template;

pub use config::CliConfig;
pub use context::{CliContext, Directories};
