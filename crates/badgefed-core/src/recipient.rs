//! # Recipients and Identifier Classification
//!
//! A recipient is identified by an email address, a fediverse handle, a
//! profile URI, or, as a fallback, a bare display name. When a claimant is
//! known only by a free-form string, [`RecipientIdentifier::classify()`]
//! decides which of the four kinds it is. The decision depends only on the
//! shape of the string.
//!
//! ## Grammar
//!
//! Rules are evaluated in order against the trimmed input:
//!
//! 1. `ProfileUri` — an absolute `http`/`https` URL with a host.
//! 2. `FediverseHandle` — `user@host` with an optional leading `@`, where
//!    `host` contains a `.` separator and every label is non-empty.
//! 3. `Email` — any other `local@domain` with exactly one `@` (addresses on
//!    dotless domains such as `root@localhost`).
//! 4. `NameOnly` — everything else. A name-only identifier is never looked
//!    up in storage.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::identity::RecipientId;

/// The four kinds of recipient identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientKind {
    /// An email address.
    Email,
    /// A fediverse handle (`@user@instance.tld`).
    FediverseHandle,
    /// A profile URI (`https://instance.tld/@user`).
    ProfileUri,
    /// A display name that cannot be resolved to a stored identity.
    NameOnly,
}

impl RecipientKind {
    /// Stable lowercase name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::FediverseHandle => "fediverse",
            Self::ProfileUri => "profileuri",
            Self::NameOnly => "name",
        }
    }
}

impl std::fmt::Display for RecipientKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified claimant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RecipientIdentifier {
    /// An email address.
    Email(String),
    /// A fediverse handle.
    FediverseHandle(String),
    /// A profile URI.
    ProfileUri(String),
    /// A bare display name.
    NameOnly(String),
}

impl RecipientIdentifier {
    /// Classify a free-form identifier string. Total and pure.
    pub fn classify(input: &str) -> Self {
        let trimmed = input.trim();
        let value = trimmed.to_string();
        if is_profile_uri(trimmed) {
            Self::ProfileUri(value)
        } else if is_fediverse_handle(trimmed) {
            Self::FediverseHandle(value)
        } else if is_email(trimmed) {
            Self::Email(value)
        } else {
            Self::NameOnly(value)
        }
    }

    /// The kind of this identifier.
    pub fn kind(&self) -> RecipientKind {
        match self {
            Self::Email(_) => RecipientKind::Email,
            Self::FediverseHandle(_) => RecipientKind::FediverseHandle,
            Self::ProfileUri(_) => RecipientKind::ProfileUri,
            Self::NameOnly(_) => RecipientKind::NameOnly,
        }
    }

    /// The identifier string.
    pub fn value(&self) -> &str {
        match self {
            Self::Email(v) | Self::FediverseHandle(v) | Self::ProfileUri(v) | Self::NameOnly(v) => {
                v
            }
        }
    }

    /// Whether this identifier can be resolved against stored recipients.
    pub fn is_resolvable(&self) -> bool {
        !matches!(self, Self::NameOnly(_))
    }
}

fn is_profile_uri(s: &str) -> bool {
    match Url::parse(s) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().map_or(false, |h| !h.is_empty())
        }
        Err(_) => false,
    }
}

fn is_fediverse_handle(s: &str) -> bool {
    let handle = s.strip_prefix('@').unwrap_or(s);
    match handle.split_once('@') {
        Some((user, host)) => is_address_part(user) && is_address_part(host) && is_dotted(host),
        None => false,
    }
}

fn is_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => is_address_part(local) && is_address_part(domain),
        None => false,
    }
}

fn is_address_part(part: &str) -> bool {
    !part.is_empty() && !part.contains('@') && !part.chars().any(char::is_whitespace)
}

fn is_dotted(host: &str) -> bool {
    host.contains('.') && host.split('.').all(|label| !label.is_empty())
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// A credential recipient. Every field is optional; absent fields are
/// rendered as empty strings when copied onto a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Storage id, when the recipient is known to the recipient directory.
    pub id: Option<RecipientId>,
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Fediverse handle.
    pub fediverse_handle: Option<String>,
    /// Profile URI.
    pub profile_uri: Option<String>,
}

impl Recipient {
    /// Build an unsaved recipient carrying only the classified field.
    pub fn from_identifier(identifier: &RecipientIdentifier) -> Self {
        let value = Some(identifier.value().to_string());
        match identifier {
            RecipientIdentifier::Email(_) => Self {
                email: value,
                ..Self::default()
            },
            RecipientIdentifier::FediverseHandle(_) => Self {
                fediverse_handle: value,
                ..Self::default()
            },
            RecipientIdentifier::ProfileUri(_) => Self {
                profile_uri: value,
                ..Self::default()
            },
            RecipientIdentifier::NameOnly(_) => Self {
                name: value,
                ..Self::default()
            },
        }
    }

    /// Recipient with only an email address.
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// The field matching `kind`, if set.
    pub fn identifier(&self, kind: RecipientKind) -> Option<&str> {
        let field = match kind {
            RecipientKind::Email => &self.email,
            RecipientKind::FediverseHandle => &self.fediverse_handle,
            RecipientKind::ProfileUri => &self.profile_uri,
            RecipientKind::NameOnly => &self.name,
        };
        field.as_deref().filter(|v| !v.is_empty())
    }

    /// The identifier a record is "issued to": email, then fediverse handle,
    /// then profile URI, then name. Empty when nothing is set.
    pub fn primary_identifier(&self) -> &str {
        [
            RecipientKind::Email,
            RecipientKind::FediverseHandle,
            RecipientKind::ProfileUri,
            RecipientKind::NameOnly,
        ]
        .into_iter()
        .find_map(|kind| self.identifier(kind))
        .unwrap_or("")
    }
}
