//! # Serialized Message Representation
//!
//! `SerializedMessage` is the canonical textual form of a credential's
//! federated message representation: the exact string a fingerprint is
//! computed over.
//!
//! ## Invariant
//!
//! Fingerprinting accepts only `&SerializedMessage`. The two constructors
//! are the only ways to obtain one:
//!
//! - [`SerializedMessage::new()`] serializes a typed representation with
//!   `serde_json`. Field order is the declaration order of the type, so a
//!   struct-typed representation always yields the same bytes for the same
//!   field values.
//! - [`SerializedMessage::from_external()`] wraps a form produced by an
//!   external builder. It is taken verbatim; no re-encoding happens.

use serde::Serialize;

use crate::error::BadgeError;

/// The canonical serialized form of a message representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SerializedMessage(String);

impl SerializedMessage {
    /// Serialize a typed message representation to its canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`BadgeError::Serialization`] if `serde_json` rejects the value.
    pub fn new(representation: &impl Serialize) -> Result<Self, BadgeError> {
        Ok(Self(serde_json::to_string(representation)?))
    }

    /// Wrap an externally produced serialized form, unchanged.
    pub fn from_external(serialized: impl Into<String>) -> Self {
        Self(serialized.into())
    }

    /// The serialized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The UTF-8 bytes of the serialized text.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Length of the serialized text in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the serialized text is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<[u8]> for SerializedMessage {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}
