//! # Error Types — Credential Error Taxonomy
//!
//! Defines the error type surfaced by every core credential operation.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - `NotFound`, `InvalidState`, `KeyError` and `Crypto` are the four
//!   conditions a caller is expected to branch on. They are distinct
//!   variants and are never folded into one another.
//! - Nothing in the core retries. Retries are caller policy.
//! - Messages never contain accept tokens or key material.

use thiserror::Error;

/// Top-level error type for BadgeFed credential operations.
#[derive(Error, Debug)]
pub enum BadgeError {
    /// A referenced template, issuer, key, recipient or record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The requested transition violates the Pending → Accepted lifecycle.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Private key material is malformed or cannot be parsed.
    #[error("key error: {0}")]
    KeyError(String),

    /// A signing operation failed.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// A persisted row could not be mapped to a typed record.
    #[error("corrupt record: {0}")]
    CorruptRecord(String),

    /// Input failed validation (timestamps, identifiers).
    #[error("validation error: {0}")]
    Validation(String),

    /// Serialization of a message representation failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BadgeError {
    /// Whether this error is one of the two redemption failures that must be
    /// presented to end users as the same "invalid or already used" outcome.
    pub fn is_redemption_failure(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidState(_))
    }
}
