//! # Acceptance State Machine
//!
//! ```text
//! PENDING ──▶ ACCEPTED (terminal)
//! ```
//!
//! A pending record holds its accept token; an accepted record holds the
//! time of acceptance and no token. Accepting twice is an error, and there
//! is no way back to pending.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use badgefed_core::{AcceptToken, BadgeError, Timestamp};

// ─── Acceptance State ────────────────────────────────────────────────

/// The acceptance state of an issued credential record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AcceptanceState {
    /// Issued, awaiting redemption of `accept_key`.
    Pending {
        /// The single-use token that permits acceptance.
        accept_key: AcceptToken,
    },
    /// Accepted by the recipient (terminal).
    Accepted {
        /// When the record was accepted.
        accepted_on: Timestamp,
    },
}

impl AcceptanceState {
    /// Pending with a freshly generated token.
    pub fn issue() -> Self {
        Self::Pending {
            accept_key: AcceptToken::generate(),
        }
    }

    /// Rebuild the state from its storage columns.
    ///
    /// An empty token string is treated as absent.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::InvalidColumns`] when both columns are set or both
    /// are absent.
    pub fn from_columns(
        accept_key: Option<String>,
        accepted_on: Option<Timestamp>,
    ) -> Result<Self, LifecycleError> {
        let accept_key = accept_key.filter(|k| !k.is_empty());
        match (accept_key, accepted_on) {
            (Some(key), None) => Ok(Self::Pending {
                accept_key: AcceptToken::from_stored(key),
            }),
            (None, Some(accepted_on)) => Ok(Self::Accepted { accepted_on }),
            (Some(_), Some(_)) => Err(LifecycleError::InvalidColumns(
                "record has both an accept key and an acceptance time".to_string(),
            )),
            (None, None) => Err(LifecycleError::InvalidColumns(
                "record has neither an accept key nor an acceptance time".to_string(),
            )),
        }
    }

    /// The storage columns `(accept_key, accepted_on)` for this state.
    pub fn to_columns(&self) -> (Option<&str>, Option<Timestamp>) {
        match self {
            Self::Pending { accept_key } => (Some(accept_key.as_str()), None),
            Self::Accepted { accepted_on } => (None, Some(*accepted_on)),
        }
    }

    /// Whether the record is awaiting acceptance.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// Whether the record has been accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// The accept token, while pending.
    pub fn accept_key(&self) -> Option<&AcceptToken> {
        match self {
            Self::Pending { accept_key } => Some(accept_key),
            Self::Accepted { .. } => None,
        }
    }

    /// The acceptance time, once accepted.
    pub fn accepted_on(&self) -> Option<Timestamp> {
        match self {
            Self::Pending { .. } => None,
            Self::Accepted { accepted_on } => Some(*accepted_on),
        }
    }

    /// Whether `presented` redeems this state: pending, and the token
    /// matches exactly.
    pub fn admits(&self, presented: &str) -> bool {
        self.accept_key().map_or(false, |k| k.matches(presented))
    }

    /// Transition PENDING → ACCEPTED, discarding the token.
    pub fn accept(&mut self, now: Timestamp) -> Result<(), LifecycleError> {
        if let Self::Accepted { accepted_on } = self {
            return Err(LifecycleError::AlreadyAccepted {
                accepted_on: *accepted_on,
            });
        }
        *self = Self::Accepted { accepted_on: now };
        Ok(())
    }
}

impl std::fmt::Display for AcceptanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending { .. } => "PENDING",
            Self::Accepted { .. } => "ACCEPTED",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from the acceptance lifecycle.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// The record is already in the terminal ACCEPTED state.
    #[error("record already accepted at {accepted_on}")]
    AlreadyAccepted {
        /// When the record was accepted.
        accepted_on: Timestamp,
    },

    /// Stored columns do not describe a valid state.
    #[error("inconsistent acceptance columns: {0}")]
    InvalidColumns(String),
}

impl From<LifecycleError> for BadgeError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::AlreadyAccepted { .. } => BadgeError::InvalidState(err.to_string()),
            LifecycleError::InvalidColumns(msg) => BadgeError::CorruptRecord(msg),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
