//! # Badge Note
//!
//! The message representation a credential record is published as, and
//! the source of the serialized form its fingerprint is computed over.
//!
//! Field order is fixed by the struct declaration and `serde_json` writes
//! fields in that order, so the same record content always serializes to
//! the same bytes. Acceptance state and the fingerprint itself are not part
//! of the note.

use serde::Serialize;

use badgefed_core::{BadgeError, SerializedMessage};

use crate::record::CredentialRecord;

const ACTIVITY_STREAMS: &str = "https://www.w3.org/ns/activitystreams";

/// Image attached to a badge note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteImage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub url: String,
    pub name: String,
}

/// Who a badge note was issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecipient {
    pub name: String,
    pub email: String,
    pub subject_uri: String,
}

/// A badge note built from a credential record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeNote {
    #[serde(rename = "@context")]
    pub context: &'static str,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributed_to: String,
    pub published: String,
    pub name: String,
    pub content: String,
    pub image: NoteImage,
    pub earning_criteria: String,
    pub issued_to: NoteRecipient,
}

impl BadgeNote {
    /// Build the note for `record`, published under `note_id`.
    pub fn from_record(record: &CredentialRecord, note_id: impl Into<String>) -> Self {
        Self {
            context: ACTIVITY_STREAMS,
            id: note_id.into(),
            kind: "Note",
            attributed_to: record.issued_by.clone(),
            published: record.issued_on.to_iso8601(),
            name: record.title.clone(),
            content: record.description.clone(),
            image: NoteImage {
                kind: "Image",
                url: record.image.clone(),
                name: record.image_alt_text.clone(),
            },
            earning_criteria: record.earning_criteria.clone(),
            issued_to: NoteRecipient {
                name: record.issued_to_name.clone(),
                email: record.issued_to_email.clone(),
                subject_uri: record.issued_to_subject_uri.clone(),
            },
        }
    }

    /// The note id a record is published under: its `issued_using`
    /// reference when set, otherwise `<issuer uri>/grants/<record id>`.
    ///
    /// # Errors
    ///
    /// [`BadgeError::Validation`] if the record has no `issued_using` and has
    /// not been stored yet.
    pub fn id_for(record: &CredentialRecord) -> Result<String, BadgeError> {
        if let Some(id) = record.issued_using.as_deref().filter(|s| !s.is_empty()) {
            return Ok(id.to_string());
        }
        let record_id = record.id.ok_or_else(|| {
            BadgeError::Validation("record must be stored before it can be published".to_string())
        })?;
        Ok(format!(
            "{}/grants/{}",
            record.issued_by.trim_end_matches('/'),
            record_id.get()
        ))
    }

    /// Serialize to the canonical form.
    pub fn to_message(&self) -> Result<SerializedMessage, BadgeError> {
        SerializedMessage::new(self)
    }
}
