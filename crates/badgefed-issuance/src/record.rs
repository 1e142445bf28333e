//! # Issued Credential Records
//!
//! A record is one grant of a template to one recipient. The template's
//! display fields are copied onto it at grant time, so later template edits
//! do not alter credentials already issued.

use serde::{Deserialize, Serialize};

use badgefed_core::{RecordId, TemplateId, Timestamp};
use badgefed_crypto::Fingerprint;
use badgefed_state::AcceptanceState;

/// An issued credential ("badge record").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Store-assigned id; `None` until inserted.
    pub id: Option<RecordId>,
    /// Template the record was granted from.
    pub template_id: TemplateId,
    pub title: String,
    pub description: String,
    pub image: String,
    pub image_alt_text: String,
    pub earning_criteria: String,
    /// Issuer's public identity URI.
    pub issued_by: String,
    pub issued_on: Timestamp,
    /// Pending with a token, or accepted at a time.
    pub acceptance: AcceptanceState,
    /// Hash-of-signature binding to the issuer key, once signed.
    pub fingerprint: Option<Fingerprint>,
    pub issued_to_name: String,
    pub issued_to_email: String,
    pub issued_to_subject_uri: String,
    /// Resolved identity the record is issued to. Overwritten with the
    /// claimant's identity on acceptance.
    pub issued_to: String,
    /// Id of the message representation the record was published as.
    pub issued_using: Option<String>,
}

impl CredentialRecord {
    /// Whether the record is awaiting acceptance.
    pub fn is_pending(&self) -> bool {
        self.acceptance.is_pending()
    }

    /// When the record was accepted, if it has been.
    pub fn accepted_on(&self) -> Option<Timestamp> {
        self.acceptance.accepted_on()
    }
}

/// Selection criteria for listing records. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Exact match on the resolved issued-to identity.
    pub issued_to: Option<String>,
    /// Records granted from this template.
    pub template_id: Option<TemplateId>,
}

impl RecordFilter {
    /// Whether `record` satisfies every set criterion.
    pub fn matches(&self, record: &CredentialRecord) -> bool {
        self.issued_to
            .as_deref()
            .map_or(true, |who| record.issued_to == who)
            && self
                .template_id
                .map_or(true, |id| record.template_id == id)
    }
}
