//! # badgefed-core — Foundational Types for BadgeFed
//!
//! This crate is the leaf of the BadgeFed workspace. It defines the
//! primitives every other crate builds on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `TemplateId`, `IssuerId`,
//!    `RecordId`, `RecipientId` are distinct types over the numeric row id.
//!    A template id cannot be passed where a record id is expected.
//!
//! 2. **`AcceptToken` is a secret.** It is generated from the OS CSPRNG,
//!    compared in constant time, and never printed by `Debug`.
//!
//! 3. **`SerializedMessage` newtype.** Fingerprinting accepts only a
//!    `&SerializedMessage`, the canonical textual form of a credential's
//!    message representation. The signer treats it as opaque.
//!
//! 4. **Closed recipient classification.** `RecipientIdentifier::classify()`
//!    is the single place where a free-form claimant string is mapped to one
//!    of four identifier kinds; every consumer matches exhaustively.
//!
//! 5. **UTC-only timestamps** truncated to seconds.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `badgefed-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod message;
pub mod recipient;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::BadgeError;
pub use identity::{AcceptToken, IssuerId, RecipientId, RecordId, TemplateId};
pub use message::SerializedMessage;
pub use recipient::{Recipient, RecipientIdentifier, RecipientKind};
pub use temporal::Timestamp;
