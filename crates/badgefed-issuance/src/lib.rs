//! # badgefed-issuance — Issuing and Claiming Credentials
//!
//! Ties the core types, the fingerprint signer and the acceptance lifecycle
//! into the credential protocol:
//!
//! ```text
//! grant ──▶ insert ──▶ sign (fingerprint) ──▶ token delivered out-of-band
//!                                                   │
//!                      accepted ◀── conditional_accept ◀── find_claimable
//! ```
//!
//! - **Models** (`template.rs`, `record.rs`): credential templates, issuers,
//!   and issued credential records.
//! - **Stores** (`store.rs`): the template store, issuer directory, record
//!   store and recipient directory interfaces. `memory.rs` implements all
//!   four over `parking_lot` locks.
//! - **Engine** (`engine.rs`): builds pending records from templates.
//! - **Message builder** (`note.rs`): the badge note a record is published
//!   as, and its serialized form.
//! - **Signing** (`signing.rs`): fingerprints a record with its issuer's key.
//! - **Acceptance** (`acceptance.rs`): single-use token redemption.
//!
//! Nothing here persists implicitly. Grant returns a record; storing it is
//! a separate call against a [`RecordStore`].

pub mod acceptance;
pub mod engine;
pub mod memory;
pub mod note;
pub mod record;
pub mod signing;
pub mod store;
pub mod template;

pub use acceptance::{AcceptanceService, Claim};
pub use engine::IssuanceEngine;
pub use memory::{
    InMemoryIssuerDirectory, InMemoryRecipientDirectory, InMemoryRecordStore,
    InMemoryTemplateStore, Store,
};
pub use note::BadgeNote;
pub use record::{CredentialRecord, RecordFilter};
pub use signing::RecordSigner;
pub use store::{IssuerDirectory, RecipientDirectory, RecordStore, TemplateStore};
pub use template::{CredentialTemplate, Issuer, TemplateDraft};
