//! # Store Interfaces
//!
//! The issuance engine, signer and acceptance service reach storage only
//! through these traits. Every method is synchronous and returns
//! [`BadgeError`]; adapters map their own failures into it.
//!
//! The one primitive with a concurrency contract is
//! [`RecordStore::conditional_accept()`]: the check that the record is
//! pending with the expected token and the transition to accepted must be a
//! single atomic step. Two concurrent calls with the same token must never
//! both return `true`.

use badgefed_core::{
    BadgeError, IssuerId, Recipient, RecipientId, RecipientKind, RecordId, TemplateId, Timestamp,
};
use badgefed_crypto::Fingerprint;

use crate::record::{CredentialRecord, RecordFilter};
use crate::template::{CredentialTemplate, Issuer, TemplateDraft};

/// Credential template storage.
pub trait TemplateStore: Send + Sync {
    /// Fetch a template. `NotFound` if absent.
    fn template(&self, id: TemplateId) -> Result<CredentialTemplate, BadgeError>;

    /// Insert a new template (`id = None`) or replace the editable fields of
    /// an existing one. Updating an absent id is `NotFound`.
    fn upsert(
        &self,
        id: Option<TemplateId>,
        draft: TemplateDraft,
    ) -> Result<CredentialTemplate, BadgeError>;

    /// Delete a template. `NotFound` if absent. Records already granted from
    /// it are left untouched.
    fn delete(&self, id: TemplateId) -> Result<(), BadgeError>;

    /// All templates, ordered by id.
    fn list(&self) -> Result<Vec<CredentialTemplate>, BadgeError>;
}

/// Issuer lookup.
pub trait IssuerDirectory: Send + Sync {
    /// Fetch an issuer by internal id. `NotFound` if absent.
    fn issuer(&self, id: IssuerId) -> Result<Issuer, BadgeError>;

    /// Fetch an issuer by public identity URI. `NotFound` if absent.
    fn issuer_by_uri(&self, uri: &str) -> Result<Issuer, BadgeError>;

    /// The issuer that grants `template`.
    fn issuer_of(&self, template: &CredentialTemplate) -> Result<Issuer, BadgeError> {
        self.issuer(template.issued_by)
    }
}

/// Issued credential record storage.
pub trait RecordStore: Send + Sync {
    /// Persist a new record and return its assigned id. The record's `id`
    /// field is ignored.
    fn insert(&self, record: CredentialRecord) -> Result<RecordId, BadgeError>;

    /// Fetch a record. `NotFound` if absent.
    fn get(&self, id: RecordId) -> Result<CredentialRecord, BadgeError>;

    /// Atomically: if record `id` is pending and its token equals
    /// `expected_token`, mark it accepted at `now`, clear the token, and set
    /// its issued-to identity to `claimant`. Returns whether the transition
    /// happened. An absent record yields `false`.
    fn conditional_accept(
        &self,
        id: RecordId,
        expected_token: &str,
        claimant: &str,
        now: Timestamp,
    ) -> Result<bool, BadgeError>;

    /// Store the fingerprint of record `id`. `NotFound` if absent.
    fn set_fingerprint(&self, id: RecordId, fingerprint: &Fingerprint) -> Result<(), BadgeError>;

    /// Records matching `filter`, ordered by id.
    fn list(&self, filter: &RecordFilter) -> Result<Vec<CredentialRecord>, BadgeError>;
}

/// Stored recipients.
pub trait RecipientDirectory: Send + Sync {
    /// The recipient whose `kind` field equals `identifier`, if any.
    fn find(
        &self,
        kind: RecipientKind,
        identifier: &str,
    ) -> Result<Option<Recipient>, BadgeError>;

    /// Store a recipient and return its assigned id.
    fn insert(&self, recipient: Recipient) -> Result<RecipientId, BadgeError>;
}
