//! # Identifier Newtypes and the Accept Token
//!
//! Newtype wrappers for the numeric row identifiers used across BadgeFed,
//! plus [`AcceptToken`], the single-use secret that permits one claim of
//! one pending credential record.
//!
//! ## Security Invariant
//!
//! - Identifier namespaces are distinct types, so a `TemplateId` can never be
//!   used to look up a record.
//! - `AcceptToken` is generated from the OS CSPRNG (UUID v4, 122 random bits,
//!   rendered as a 36-character string). Its `Debug` output is redacted and
//!   comparison against a presented value runs in constant time.

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Identifier of a credential template ("Badge").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub i64);

/// Identifier of an issuing actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssuerId(pub i64);

/// Identifier of an issued credential record ("BadgeRecord").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

/// Identifier of a stored recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientId(pub i64);

impl TemplateId {
    /// Access the inner row id.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl IssuerId {
    /// Access the inner row id.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl RecordId {
    /// Access the inner row id.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl RecipientId {
    /// Access the inner row id.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "template:{}", self.0)
    }
}

impl std::fmt::Display for IssuerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "issuer:{}", self.0)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record:{}", self.0)
    }
}

impl std::fmt::Display for RecipientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "recipient:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AcceptToken
// ---------------------------------------------------------------------------

/// A single-use accept token.
///
/// Present on a record only while it is pending. The token is delivered to
/// the recipient out-of-band and redeemed exactly once.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcceptToken(String);

impl AcceptToken {
    /// Generate a fresh token from the OS CSPRNG.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a token read back from storage.
    ///
    /// No format validation is applied: stored tokens are matched verbatim.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The token value, for delivery to the recipient and for storage binds.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact, case-sensitive, constant-time comparison against a presented
    /// token. No normalization is applied to either side.
    pub fn matches(&self, presented: &str) -> bool {
        self.0.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

impl std::fmt::Debug for AcceptToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AcceptToken(<redacted>)")
    }
}
