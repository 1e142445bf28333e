//! # Issuance Engine
//!
//! Builds pending credential records from templates. Granting has no side
//! effects: the returned record is not stored until the caller inserts it.

use badgefed_core::{BadgeError, Recipient, RecipientIdentifier, TemplateId, Timestamp};
use badgefed_state::AcceptanceState;

use crate::record::CredentialRecord;
use crate::store::{IssuerDirectory, RecipientDirectory, TemplateStore};
use crate::template::CredentialTemplate;

/// Grants credentials from templates.
pub struct IssuanceEngine<'a> {
    issuers: &'a dyn IssuerDirectory,
    templates: &'a dyn TemplateStore,
    recipients: &'a dyn RecipientDirectory,
}

impl<'a> IssuanceEngine<'a> {
    pub fn new(
        issuers: &'a dyn IssuerDirectory,
        templates: &'a dyn TemplateStore,
        recipients: &'a dyn RecipientDirectory,
    ) -> Self {
        Self {
            issuers,
            templates,
            recipients,
        }
    }

    /// Build a pending record granting `template` to `recipient`.
    ///
    /// Display fields are copied from the template, the issuer's public URI
    /// is resolved, the record is stamped with the current time and given a
    /// fresh accept token. Missing recipient fields become empty strings.
    ///
    /// # Errors
    ///
    /// [`BadgeError::NotFound`] if the template's issuer cannot be resolved.
    pub fn grant(
        &self,
        template: &CredentialTemplate,
        recipient: Option<&Recipient>,
    ) -> Result<CredentialRecord, BadgeError> {
        let issuer = self.issuers.issuer_of(template)?;
        let field = |f: Option<&Option<String>>| f.and_then(|v| v.clone()).unwrap_or_default();

        let record = CredentialRecord {
            id: None,
            template_id: template.id,
            title: template.title.clone(),
            description: template.description.clone(),
            image: template.image.clone(),
            image_alt_text: template.image_alt_text.clone(),
            earning_criteria: template.earning_criteria.clone(),
            issued_by: issuer.uri,
            issued_on: Timestamp::now(),
            acceptance: AcceptanceState::issue(),
            fingerprint: None,
            issued_to_name: field(recipient.map(|r| &r.name)),
            issued_to_email: field(recipient.map(|r| &r.email)),
            issued_to_subject_uri: field(recipient.map(|r| &r.profile_uri)),
            issued_to: recipient
                .map(|r| r.primary_identifier().to_string())
                .unwrap_or_default(),
            issued_using: None,
        };

        tracing::debug!(
            template_id = %template.id,
            issuer = %template.issued_by,
            "granted credential record"
        );
        Ok(record)
    }

    /// [`grant`](Self::grant) from a template id.
    ///
    /// # Errors
    ///
    /// [`BadgeError::NotFound`] if the template or its issuer is absent.
    pub fn grant_by_id(
        &self,
        template_id: TemplateId,
        recipient: Option<&Recipient>,
    ) -> Result<CredentialRecord, BadgeError> {
        let template = self.templates.template(template_id)?;
        self.grant(&template, recipient)
    }

    /// Resolve a free-form "issued to" identifier to a recipient.
    ///
    /// Name-only identifiers never touch the directory. An identifier that
    /// is resolvable but unknown yields an unsaved recipient carrying only
    /// the classified field.
    pub fn resolve_recipient(&self, issued_to: &str) -> Result<Recipient, BadgeError> {
        let identifier = RecipientIdentifier::classify(issued_to);
        if !identifier.is_resolvable() {
            return Ok(Recipient::from_identifier(&identifier));
        }
        let found = self
            .recipients
            .find(identifier.kind(), identifier.value())?;
        Ok(found.unwrap_or_else(|| Recipient::from_identifier(&identifier)))
    }
}
