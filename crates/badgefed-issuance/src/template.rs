//! # Credential Templates and Issuers
//!
//! A template ("badge") is the reusable definition a credential is granted
//! from. It references its issuer by internal id; the issuer's public
//! identity URI is what ends up on issued records.

use serde::{Deserialize, Serialize};

use badgefed_core::{IssuerId, TemplateId, Timestamp};

/// The editable fields of a credential template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDraft {
    /// Title shown on the credential.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Image reference (URL or path).
    pub image: String,
    /// Alternative text for the image.
    pub image_alt_text: String,
    /// What the recipient did to earn it.
    pub earning_criteria: String,
    /// Issuer that grants this template.
    pub issued_by: IssuerId,
    /// Free-form badge type tag (e.g. "Badge", "Certificate").
    pub badge_type: String,
}

impl TemplateDraft {
    /// A draft with only a title and issuer; other text fields are empty and
    /// the type tag is `"Badge"`.
    pub fn new(title: impl Into<String>, issued_by: IssuerId) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            image: String::new(),
            image_alt_text: String::new(),
            earning_criteria: String::new(),
            issued_by,
            badge_type: "Badge".to_string(),
        }
    }
}

/// A stored credential template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialTemplate {
    /// Store-assigned identifier.
    pub id: TemplateId,
    /// Title shown on the credential.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Image reference (URL or path).
    pub image: String,
    /// Alternative text for the image.
    pub image_alt_text: String,
    /// What the recipient did to earn it.
    pub earning_criteria: String,
    /// Issuer that grants this template.
    pub issued_by: IssuerId,
    /// Free-form badge type tag.
    pub badge_type: String,
    /// When the template was first stored.
    pub created_at: Timestamp,
    /// When the template was last edited.
    pub updated_at: Timestamp,
}

impl CredentialTemplate {
    /// A new template from `draft`, created and updated at `now`.
    pub fn from_draft(id: TemplateId, draft: TemplateDraft, now: Timestamp) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            image: draft.image,
            image_alt_text: draft.image_alt_text,
            earning_criteria: draft.earning_criteria,
            issued_by: draft.issued_by,
            badge_type: draft.badge_type,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an edit, keeping `id` and `created_at`.
    pub fn apply(&mut self, draft: TemplateDraft, now: Timestamp) {
        self.title = draft.title;
        self.description = draft.description;
        self.image = draft.image;
        self.image_alt_text = draft.image_alt_text;
        self.earning_criteria = draft.earning_criteria;
        self.issued_by = draft.issued_by;
        self.badge_type = draft.badge_type;
        self.updated_at = now;
    }
}

/// An issuing actor's public metadata.
///
/// Carries no private key material; signers obtain it from an
/// `IssuerKeyProvider` for each call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    /// Internal identifier.
    pub id: IssuerId,
    /// Display name.
    pub name: String,
    /// Public identity URI, copied onto issued records.
    pub uri: String,
    /// Domain the issuer publishes under.
    pub domain: String,
    /// PEM-encoded public key, when published.
    pub public_key_pem: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> TemplateDraft {
        TemplateDraft::new(title, IssuerId(42))
    }

    #[test]
    fn from_draft_stamps_both_times() {
        let now = Timestamp::parse("2026-03-01T10:00:00Z").unwrap();
        let t = CredentialTemplate::from_draft(TemplateId(1), draft("Go Certified"), now);
        assert_eq!(t.title, "Go Certified");
        assert_eq!(t.created_at, now);
        assert_eq!(t.updated_at, now);
        assert_eq!(t.issued_by, IssuerId(42));
    }

    #[test]
    fn apply_keeps_identity_and_creation_time() {
        let created = Timestamp::parse("2026-03-01T10:00:00Z").unwrap();
        let edited = Timestamp::parse("2026-03-02T10:00:00Z").unwrap();
        let mut t = CredentialTemplate::from_draft(TemplateId(1), draft("Old"), created);
        t.apply(draft("New"), edited);
        assert_eq!(t.id, TemplateId(1));
        assert_eq!(t.title, "New");
        assert_eq!(t.created_at, created);
        assert_eq!(t.updated_at, edited);
    }
}
